//! Error types for the panel client.
//!
//! This module defines the centralized error type [`PanelError`] and a type alias
//! [`Result`] used by the API bindings, the HTTP transport and the view-state store.
//! All errors are implemented using the `thiserror` crate.

use thiserror::Error;

/// The main error type for panel client operations.
///
/// Bindings never construct transport or API errors themselves; they only pass
/// along what the [`Transport`](crate::api::Transport) resolves to. The store only
/// produces storage errors internally and logs them instead of returning them from
/// its actions.
///
/// # Examples
///
/// ```
/// use panel_client::PanelError;
///
/// fn reject() -> Result<(), PanelError> {
///     Err(PanelError::Api { status: 422, message: "device is required".to_string() })
/// }
/// ```
#[derive(Debug, Error)]
pub enum PanelError {
    /// The HTTP exchange itself failed.
    ///
    /// Covers connection failures, timeouts and response bodies that could not
    /// be read or decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The panel answered with a non-success status.
    ///
    /// `message` carries the `msg` member of the panel's response envelope, or
    /// the raw body when the response was not an envelope.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server supplied message.
        message: String,
    },

    /// A request payload could not be turned into JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A specialized `Result` type for panel client operations.
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_message() {
        let err = PanelError::Api {
            status: 500,
            message: "failed to reload nginx".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): failed to reload nginx");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PanelError = io.into();
        assert!(matches!(err, PanelError::Io(_)));
    }
}
