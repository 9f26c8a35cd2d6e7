//! Request descriptions produced by the API bindings.
//!
//! An [`ApiRequest`] is everything a transport needs to perform one HTTP
//! exchange: the verb, the path below the API root and an optional JSON body.
//! Bindings build these values and nothing else.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the panel API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case verb as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// Description of a single HTTP request against the panel API.
///
/// `path` is relative to the API root configured on the transport and always
/// starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,

    /// Path below the API root, identifiers already interpolated.
    pub path: String,

    /// JSON body, `None` for requests that send no body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Shorthand for a bodiless `GET`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a bodiless `POST`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a bodiless `PUT`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Shorthand for a bodiless `DELETE`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attaches an already-built JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `payload` and attaches it as the body.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Serialization`](crate::PanelError::Serialization) if the
    /// payload cannot be represented as JSON (for example a map with non-string keys).
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> crate::Result<Self> {
        Ok(self.with_body(serde_json::to_value(payload)?))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn shorthands_carry_no_body() {
        let req = ApiRequest::delete("/apps/openresty/stream/servers/tcp");
        assert_eq!(req.method, Method::Delete);
        assert!(req.body.is_none());
        assert_eq!(req.to_string(), "DELETE /apps/openresty/stream/servers/tcp");
    }

    #[test]
    fn with_json_serializes_payload() {
        let req = ApiRequest::post("/toolbox_disk/umount")
            .with_json(&json!({ "path": "/mnt/data" }))
            .unwrap();
        assert_eq!(req.body, Some(json!({ "path": "/mnt/data" })));
    }

    #[test]
    fn with_json_rejects_non_string_keys() {
        let mut payload = HashMap::new();
        payload.insert(vec![1u8], "value");
        let err = ApiRequest::post("/x").with_json(&payload).unwrap_err();
        assert!(matches!(err, crate::PanelError::Serialization(_)));
    }
}
