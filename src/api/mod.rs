//! API binding layer for the panel's REST endpoints.
//!
//! Each binding turns one typed call into one [`ApiRequest`] and hands it to a
//! [`Transport`]. Bindings never validate arguments, inspect responses, retry or
//! translate errors: the returned future resolves to exactly what the transport
//! produced.
//!
//! # Modules
//!
//! - `request`: HTTP verb and request description types
//! - `transport`: the [`Transport`] seam
//! - `http`: `reqwest` transport decoding the panel envelope
//! - `openresty`: OpenResty status, config, error log and stream bindings
//! - `disk`: disk, partition, mount and LVM bindings
//!
//! # Example
//!
//! ```no_run
//! use panel_client::api::{HttpTransport, PanelClient};
//! use std::time::Duration;
//!
//! # async fn run() -> panel_client::Result<()> {
//! let transport = HttpTransport::new("http://127.0.0.1:8888/api", Duration::from_secs(30))?;
//! let client = PanelClient::new(transport);
//!
//! let upstreams = client.openresty().stream().list_upstreams().await?;
//! client.disk().mount("sdb1", "/data").await?;
//! # let _ = upstreams;
//! # Ok(())
//! # }
//! ```

pub mod disk;
pub mod http;
pub mod openresty;
pub mod request;
pub mod transport;

pub use disk::{FsType, ToolboxDisk};
pub use http::HttpTransport;
pub use openresty::{OpenResty, Stream};
pub use request::{ApiRequest, Method};
pub use transport::Transport;

use crate::domain::error::Result;
use serde_json::Value;

/// Entry point to every endpoint group.
///
/// Owns the transport; endpoint groups borrow it, so a single client can serve
/// any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct PanelClient<T> {
    transport: T,
}

impl<T: Transport> PanelClient<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// OpenResty app bindings.
    pub const fn openresty(&self) -> OpenResty<'_, T> {
        OpenResty::new(&self.transport)
    }

    /// Disk toolbox bindings.
    pub const fn disk(&self) -> ToolboxDisk<'_, T> {
        ToolboxDisk::new(&self.transport)
    }

    /// Sends a hand-built request through the same path the bindings use.
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        dispatch(&self.transport, request).await
    }
}

/// Forwards one request to the transport, tracing it on the way.
pub(crate) async fn dispatch<T: Transport + ?Sized>(transport: &T, request: ApiRequest) -> Result<Value> {
    tracing::debug!(
        method = %request.method,
        path = %request.path,
        has_body = request.body.is_some(),
        "dispatching panel request"
    );
    transport.send(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::recording::RecordingTransport;
    use futures_util::FutureExt;
    use serde_json::json;

    #[test]
    fn raw_send_issues_one_request() {
        let client = PanelClient::new(RecordingTransport::replying(json!("ok")));
        let request = ApiRequest::get("/apps/openresty/load");
        let value = client.send(request.clone()).now_or_never().unwrap().unwrap();
        assert_eq!(value, json!("ok"));
        assert_eq!(client.transport().single(), request);
    }

    #[test]
    fn bindings_are_lazy_until_polled() {
        let client = PanelClient::new(RecordingTransport::default());
        let disk = client.disk();
        let pending = disk.list();
        assert!(client.transport().requests().is_empty());
        drop(pending);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn shared_transport_via_reference() {
        let transport = RecordingTransport::default();
        let client = PanelClient::new(&transport);
        client.openresty().config().now_or_never().unwrap().unwrap();
        assert_eq!(transport.single().path, "/apps/openresty/config");
    }
}
