//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where persisted state lives on the current platform.

pub mod paths;

pub use paths::{default_state_file, expand_tilde, get_data_dir};
