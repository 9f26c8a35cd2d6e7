//! Bindings for the disk toolbox: block devices, partitions, mounts and LVM.
//!
//! Unlike the stream endpoints, LVM removals identify their target in the JSON
//! body of the `DELETE` request rather than in the path.

use crate::api::dispatch;
use crate::api::request::ApiRequest;
use crate::api::transport::Transport;
use crate::domain::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

const BASE: &str = "/toolbox_disk";

/// Filesystems the panel knows how to create.
///
/// [`ToolboxDisk::format`] takes a plain string and does not check it against
/// this list; the enum exists for callers that want to build the value safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsType {
    Ext4,
    Ext3,
    Xfs,
    Btrfs,
}

impl FsType {
    pub const ALL: [Self; 4] = [Self::Ext4, Self::Ext3, Self::Xfs, Self::Btrfs];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ext4 => "ext4",
            Self::Ext3 => "ext3",
            Self::Xfs => "xfs",
            Self::Btrfs => "btrfs",
        }
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FsType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fs| fs.as_str() == s)
            .ok_or_else(|| format!("unsupported filesystem type: {s}"))
    }
}

/// Disk toolbox endpoint group, obtained from [`PanelClient::disk`](crate::api::PanelClient::disk).
///
/// Device arguments are kernel names without the `/dev/` prefix (`sdb1`), while
/// logical volume arguments are full paths (`/dev/data/www`). Sizes are in GiB.
#[derive(Debug)]
pub struct ToolboxDisk<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ToolboxDisk<'a, T> {
    pub(crate) const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Block devices as reported by `lsblk`.
    pub async fn list(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{BASE}/list"))).await
    }

    pub async fn partitions(&self, device: &str) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/partitions")).with_body(json!({ "device": device }));
        dispatch(self.transport, request).await
    }

    /// Mounts `device` on `path`; the server creates the mount point if needed.
    pub async fn mount(&self, device: &str, path: &str) -> Result<Value> {
        let request =
            ApiRequest::post(format!("{BASE}/mount")).with_body(json!({ "device": device, "path": path }));
        dispatch(self.transport, request).await
    }

    pub async fn umount(&self, path: &str) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/umount")).with_body(json!({ "path": path }));
        dispatch(self.transport, request).await
    }

    /// Creates a filesystem on `device`. Destroys existing data.
    pub async fn format(&self, device: &str, fs_type: &str) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/format"))
            .with_body(json!({ "device": device, "fs_type": fs_type }));
        dispatch(self.transport, request).await
    }

    /// Physical volumes, volume groups and logical volumes (`pvs`, `vgs`, `lvs`).
    pub async fn lvm_info(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{BASE}/lvm"))).await
    }

    pub async fn create_pv(&self, device: &str) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/lvm/pv")).with_body(json!({ "device": device }));
        dispatch(self.transport, request).await
    }

    pub async fn remove_pv(&self, device: &str) -> Result<Value> {
        let request = ApiRequest::delete(format!("{BASE}/lvm/pv")).with_body(json!({ "device": device }));
        dispatch(self.transport, request).await
    }

    pub async fn create_vg(&self, name: &str, devices: &[String]) -> Result<Value> {
        let request =
            ApiRequest::post(format!("{BASE}/lvm/vg")).with_body(json!({ "name": name, "devices": devices }));
        dispatch(self.transport, request).await
    }

    pub async fn remove_vg(&self, name: &str) -> Result<Value> {
        let request = ApiRequest::delete(format!("{BASE}/lvm/vg")).with_body(json!({ "name": name }));
        dispatch(self.transport, request).await
    }

    pub async fn create_lv(&self, name: &str, vg_name: &str, size: f64) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/lvm/lv"))
            .with_body(json!({ "name": name, "vg_name": vg_name, "size": size }));
        dispatch(self.transport, request).await
    }

    pub async fn remove_lv(&self, path: &str) -> Result<Value> {
        let request = ApiRequest::delete(format!("{BASE}/lvm/lv")).with_body(json!({ "path": path }));
        dispatch(self.transport, request).await
    }

    /// Grows the volume at `path` by `size` GiB, optionally resizing its filesystem.
    pub async fn extend_lv(&self, path: &str, size: f64, resize: bool) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/lvm/lv/extend"))
            .with_body(json!({ "path": path, "size": size, "resize": resize }));
        dispatch(self.transport, request).await
    }
}
