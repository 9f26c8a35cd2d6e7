//! Domain layer for the panel client.
//!
//! Holds the error type shared by every other layer. The API bindings and the
//! view-state store depend on this module, never the other way around.
//!
//! # Examples
//!
//! ```
//! use panel_client::domain::{PanelError, Result};
//!
//! fn read_setting() -> Result<String> {
//!     Err(PanelError::Config("base_url is empty".to_string()))
//! }
//! ```

pub mod error;

pub use error::{PanelError, Result};
