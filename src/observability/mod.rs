//! Structured logging setup.
//!
//! The library emits `tracing` spans and events everywhere; this module only
//! offers a ready-made subscriber for binaries that do not bring their own.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`

mod init;

pub use init::init_tracing;
