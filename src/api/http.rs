//! `reqwest` based transport speaking the panel's JSON envelope.
//!
//! Every panel response looks like:
//!
//! ```json
//! { "msg": "success", "data": { ... } }
//! ```
//!
//! Successful calls resolve to `data`. Failed calls resolve to
//! [`PanelError::Api`] carrying the status and `msg`.

use crate::api::request::ApiRequest;
use crate::api::transport::Transport;
use crate::domain::error::{PanelError, Result};
use futures_util::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Response envelope returned by every panel endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// HTTP transport for a panel instance.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`, for example `http://127.0.0.1:8888/api`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] if `base_url` is empty or not an `http(s)` URL,
    /// and [`PanelError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PanelError::Config(format!("base_url must be an http(s) URL, got {base_url:?}")));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "http transport ready");

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Root URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        let mut builder = self.client.request(request.method.into(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            bytes = text.len(),
            "response received"
        );

        decode_response(status.as_u16(), &text)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>> {
        self.execute(request).boxed()
    }
}

/// Maps a status code and raw body onto the envelope contract.
fn decode_response(status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&status);
    let envelope = serde_json::from_str::<Envelope>(body);

    match (success, envelope) {
        (true, Ok(envelope)) => Ok(envelope.data),
        (true, Err(_)) if body.trim().is_empty() => Ok(Value::Null),
        (true, Err(e)) => Err(PanelError::Transport(format!("failed to decode response: {e}"))),
        (false, Ok(envelope)) if !envelope.msg.is_empty() => Err(PanelError::Api {
            status,
            message: envelope.msg,
        }),
        (false, _) => Err(PanelError::Api {
            status,
            message: body.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_returns_data_member() {
        let body = r#"{"msg":"success","data":{"pvs":[],"vgs":[],"lvs":[]}}"#;
        assert_eq!(
            decode_response(200, body).unwrap(),
            json!({ "pvs": [], "vgs": [], "lvs": [] })
        );
    }

    #[test]
    fn success_without_data_is_null() {
        assert_eq!(decode_response(200, r#"{"msg":"success"}"#).unwrap(), Value::Null);
        assert_eq!(decode_response(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn error_status_uses_envelope_message() {
        let err = decode_response(422, r#"{"msg":"unsupported filesystem type: ntfs"}"#).unwrap_err();
        match err {
            PanelError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "unsupported filesystem type: ntfs");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_envelope_keeps_raw_body() {
        let err = decode_response(502, "Bad Gateway\n").unwrap_err();
        assert!(matches!(err, PanelError::Api { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn malformed_success_body_is_transport_error() {
        let err = decode_response(200, "<html>").unwrap_err();
        assert!(matches!(err, PanelError::Transport(_)));
    }

    #[test]
    fn base_url_is_normalized() {
        let transport = HttpTransport::new("http://127.0.0.1:8888/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:8888/api");
        assert_eq!(
            transport.url_for("/toolbox_disk/list"),
            "http://127.0.0.1:8888/api/toolbox_disk/list"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpTransport::new("ftp://panel", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }

    /// What the stub server saw for one request.
    struct Captured {
        request_line: String,
        headers: Vec<String>,
        body: String,
    }

    /// Serves exactly one HTTP exchange on a loopback port, answering with `status` and `reply`.
    fn serve_once(status: u16, reply: &'static str) -> (String, std::thread::JoinHandle<Captured>) {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];

            let header_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                raw.extend_from_slice(&chunk[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8(raw[..header_end].to_vec()).unwrap();
            let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
            let request_line = lines.next().unwrap().to_string();
            let headers: Vec<String> = lines.map(str::to_ascii_lowercase).collect();
            let content_length = headers
                .iter()
                .find_map(|h| h.strip_prefix("content-length:"))
                .map_or(0, |v| v.trim().parse::<usize>().unwrap());

            while raw.len() < header_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before body was complete");
                raw.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8(raw[header_end..header_end + content_length].to_vec()).unwrap();

            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            );
            stream.write_all(response.as_bytes()).unwrap();

            Captured {
                request_line,
                headers,
                body,
            }
        });

        (format!("http://{addr}/api/"), handle)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn delete_with_body_reaches_the_wire() {
        let (base_url, server) = serve_once(200, r#"{"msg":"success","data":{"ok":true}}"#);
        let client = crate::api::PanelClient::new(HttpTransport::new(&base_url, Duration::from_secs(5)).unwrap());

        let value = client.disk().remove_pv("sdc").await.unwrap();
        assert_eq!(value, json!({ "ok": true }));

        let seen = server.join().unwrap();
        assert_eq!(seen.request_line, "DELETE /api/toolbox_disk/lvm/pv HTTP/1.1");
        assert!(seen.headers.iter().any(|h| h.starts_with("content-type: application/json")));
        let body: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, json!({ "device": "sdc" }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn get_without_body_sends_none() {
        let (base_url, server) = serve_once(200, r#"{"msg":"success","data":[]}"#);
        let client = crate::api::PanelClient::new(HttpTransport::new(&base_url, Duration::from_secs(5)).unwrap());

        let value = client.openresty().stream().list_upstreams().await.unwrap();
        assert_eq!(value, json!([]));

        let seen = server.join().unwrap();
        assert_eq!(seen.request_line, "GET /api/apps/openresty/stream/upstreams HTTP/1.1");
        assert!(seen.body.is_empty());
        assert!(!seen.headers.iter().any(|h| h.starts_with("content-type:")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn error_status_surfaces_panel_message() {
        let (base_url, server) = serve_once(422, r#"{"msg":"unsupported filesystem type: ntfs"}"#);
        let client = crate::api::PanelClient::new(HttpTransport::new(&base_url, Duration::from_secs(5)).unwrap());

        let err = client.disk().format("sdb1", "ntfs").await.unwrap_err();
        assert!(
            matches!(err, PanelError::Api { status: 422, ref message } if message == "unsupported filesystem type: ntfs")
        );

        let seen = server.join().unwrap();
        assert_eq!(seen.request_line, "POST /api/toolbox_disk/format HTTP/1.1");
    }
}
