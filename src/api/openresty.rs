//! Bindings for the OpenResty app: status, main config, error log and the
//! stream (layer 4) servers and upstreams.
//!
//! Stream resources are addressed by name in the path, including on delete.

use crate::api::dispatch;
use crate::api::request::ApiRequest;
use crate::api::transport::Transport;
use crate::domain::error::Result;
use serde::Serialize;
use serde_json::{json, Value};

const BASE: &str = "/apps/openresty";
const STREAM_SERVERS: &str = "/apps/openresty/stream/servers";
const STREAM_UPSTREAMS: &str = "/apps/openresty/stream/upstreams";

/// OpenResty endpoint group, obtained from [`PanelClient::openresty`](crate::api::PanelClient::openresty).
#[derive(Debug)]
pub struct OpenResty<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> OpenResty<'a, T> {
    pub(crate) const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Worker and connection load statistics.
    pub async fn load(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{BASE}/load"))).await
    }

    /// Current main configuration file contents.
    pub async fn config(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{BASE}/config"))).await
    }

    /// Replaces the main configuration file.
    pub async fn save_config(&self, config: &str) -> Result<Value> {
        let request = ApiRequest::post(format!("{BASE}/config")).with_body(json!({ "config": config }));
        dispatch(self.transport, request).await
    }

    /// Tail of the error log.
    pub async fn error_log(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{BASE}/error_log"))).await
    }

    /// Truncates the error log.
    pub async fn clear_error_log(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::post(format!("{BASE}/clear_error_log"))).await
    }

    /// Stream server and upstream bindings.
    #[must_use]
    pub const fn stream(&self) -> Stream<'a, T> {
        Stream {
            transport: self.transport,
        }
    }
}

/// Stream server/upstream CRUD.
///
/// Payloads are forwarded as-is; their shape is defined by the panel.
#[derive(Debug)]
pub struct Stream<'a, T: ?Sized> {
    transport: &'a T,
}

impl<T: Transport + ?Sized> Stream<'_, T> {
    /// All stream servers.
    pub async fn list_servers(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(STREAM_SERVERS)).await
    }

    /// Creates a stream server from `data`.
    pub async fn create_server<D: Serialize + ?Sized>(&self, data: &D) -> Result<Value> {
        let request = ApiRequest::post(STREAM_SERVERS).with_json(data)?;
        dispatch(self.transport, request).await
    }

    /// The stream server called `name`.
    pub async fn get_server(&self, name: &str) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{STREAM_SERVERS}/{name}"))).await
    }

    /// Updates the server called `name`; the payload may rename it.
    pub async fn update_server<D: Serialize + ?Sized>(&self, name: &str, data: &D) -> Result<Value> {
        let request = ApiRequest::put(format!("{STREAM_SERVERS}/{name}")).with_json(data)?;
        dispatch(self.transport, request).await
    }

    /// Deletes the stream server called `name`.
    pub async fn delete_server(&self, name: &str) -> Result<Value> {
        dispatch(self.transport, ApiRequest::delete(format!("{STREAM_SERVERS}/{name}"))).await
    }

    /// All stream upstreams.
    pub async fn list_upstreams(&self) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(STREAM_UPSTREAMS)).await
    }

    /// Creates a stream upstream from `data`.
    pub async fn create_upstream<D: Serialize + ?Sized>(&self, data: &D) -> Result<Value> {
        let request = ApiRequest::post(STREAM_UPSTREAMS).with_json(data)?;
        dispatch(self.transport, request).await
    }

    /// The stream upstream called `name`.
    pub async fn get_upstream(&self, name: &str) -> Result<Value> {
        dispatch(self.transport, ApiRequest::get(format!("{STREAM_UPSTREAMS}/{name}"))).await
    }

    /// Updates the upstream called `name`.
    pub async fn update_upstream<D: Serialize + ?Sized>(&self, name: &str, data: &D) -> Result<Value> {
        let request = ApiRequest::put(format!("{STREAM_UPSTREAMS}/{name}")).with_json(data)?;
        dispatch(self.transport, request).await
    }

    /// Deletes the upstream called `name`.
    pub async fn delete_upstream(&self, name: &str) -> Result<Value> {
        dispatch(self.transport, ApiRequest::delete(format!("{STREAM_UPSTREAMS}/{name}"))).await
    }
}
