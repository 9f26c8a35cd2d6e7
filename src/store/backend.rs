//! Persistence backend abstraction for UI state stores.
//!
//! This module defines the [`Persister`] trait that stores hold to write their
//! state through on every mutation. Records are opaque JSON values addressed by
//! a namespace key (`"file"` for the file browser), so one backend can serve
//! several stores.

use crate::domain::error::Result;
use serde_json::Value;

/// Durable key/value storage for serialized store state.
///
/// # Implementations
///
/// - [`JsonPersister`](crate::store::JsonPersister): JSON file with atomic writes (default)
/// - [`MemoryPersister`](crate::store::MemoryPersister): shared in-process map
/// - [`NoopPersister`](crate::store::NoopPersister): forgets everything
pub trait Persister: Send {
    /// Reads the record stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous record.
    ///
    /// The write is durable when this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Deletes the record under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}
