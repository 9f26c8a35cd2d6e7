//! Transport abstraction behind the API bindings.
//!
//! This module defines the [`Transport`] trait that turns an [`ApiRequest`] into a
//! pending JSON result. Bindings only ever talk to this trait, so the HTTP stack can
//! be swapped for a recording double in tests.
//!
//! Error translation, timeouts and retry policy belong to implementations. The
//! bindings pass whatever the transport resolves to straight back to the caller.

use crate::api::request::ApiRequest;
use crate::domain::error::Result;
use futures_util::future::BoxFuture;
use serde_json::Value;

/// Abstraction over the HTTP client that executes panel requests.
///
/// # Implementations
///
/// - [`HttpTransport`](crate::api::HttpTransport): `reqwest` based client (default)
pub trait Transport: Send + Sync {
    /// Sends one request and resolves to the response payload.
    ///
    /// The returned future is lazy with respect to the caller: nothing is
    /// guaranteed to happen until it is polled.
    ///
    /// # Errors
    ///
    /// Resolves to an error if the exchange fails or the panel rejects the request.
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>> {
        (**self).send(request)
    }
}
