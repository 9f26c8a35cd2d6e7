//! Client-side UI state stores and their persistence backends.
//!
//! # Modules
//!
//! - `models`: persisted record types ([`FileState`], [`ViewType`])
//! - `file`: the file-browser store ([`FileStore`])
//! - `backend`: the [`Persister`] trait
//! - `json`: JSON file persister with atomic writes
//! - `memory`: in-process and no-op persisters

pub mod backend;
pub mod file;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::Persister;
pub use file::{FileStore, STORE_KEY};
pub use json::JsonPersister;
pub use memory::{MemoryPersister, NoopPersister};
pub use models::{FileState, ViewType, DEFAULT_PATH};
