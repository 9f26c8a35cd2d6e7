//! In-process persistence backends.

use crate::domain::error::Result;
use crate::store::backend::Persister;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Map-backed persister whose clones share the same records.
///
/// Handing a clone to a store and keeping the original lets a caller drop the
/// store and open a new one over the same records, which is how a page reload
/// looks from the store's point of view.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersister {
    records: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryPersister {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the record under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.records().get(key).cloned()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Persister for MemoryPersister {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.records().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records().remove(key);
        Ok(())
    }
}

/// Persister that stores nothing. Every store opened on it starts from defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersister;

impl Persister for NoopPersister {
    fn load(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &Value) -> Result<()> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_records() {
        let original = MemoryPersister::new();
        let mut handle = original.clone();
        handle.save("file", &json!({ "sub": true })).unwrap();
        assert_eq!(original.load("file").unwrap(), Some(json!({ "sub": true })));

        handle.remove("file").unwrap();
        assert!(original.get("file").is_none());
    }

    #[test]
    fn noop_forgets() {
        let mut persister = NoopPersister;
        persister.save("file", &json!(1)).unwrap();
        assert!(persister.load("file").unwrap().is_none());
    }
}
