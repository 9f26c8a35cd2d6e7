//! JSON file-based persistence backend.
//!
//! All namespaced records live in one human-readable JSON document. Writes go to
//! a temporary sibling file which is then renamed over the target, so a crash
//! never leaves a half-written document behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": 1760000000,
//!   "records": {
//!     "file": {
//!       "path": "/opt",
//!       "keyword": "",
//!       "sub": false,
//!       "showHidden": false,
//!       "viewType": "list"
//!     }
//!   }
//! }
//! ```

use crate::domain::error::{PanelError, Result};
use crate::store::backend::Persister;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current document format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level document serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedData {
    /// Version of the document format for future migrations.
    version: u32,

    /// Unix timestamp of the last successful write.
    #[serde(default)]
    saved_at: i64,

    /// Store records keyed by namespace.
    #[serde(default)]
    records: BTreeMap<String, Value>,
}

impl Default for PersistedData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: 0,
            records: BTreeMap::new(),
        }
    }
}

/// JSON file persistence backend.
///
/// The whole document is cached in memory and rewritten on every change.
///
/// # Thread Safety
///
/// `Send` but not `Sync`: a store owns its persister exclusively.
#[derive(Debug)]
pub struct JsonPersister {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the document.
    data: PersistedData,

    /// Set when the in-memory copy is ahead of the file (a write failed).
    dirty: bool,
}

impl JsonPersister {
    /// Opens the document at `file_path`, creating parent directories as needed.
    ///
    /// A missing file is treated as an empty document; nothing is written until
    /// the first `save`.
    ///
    /// A document that exists but cannot be decoded (corrupt, or written by a newer
    /// version) is logged, renamed to `<name>.json.bak` and replaced by an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use panel_client::store::JsonPersister;
    ///
    /// let persister = JsonPersister::new("/tmp/panel-client/state.json")?;
    /// # Ok::<(), panel_client::PanelError>(())
    /// ```
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON persister");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            match Self::load_from_file(&file_path) {
                Ok(data) => data,
                Err(PanelError::Storage(reason)) => {
                    tracing::warn!(path = ?file_path, reason = %reason, "unreadable state document, starting empty");
                    Self::set_aside(&file_path);
                    PersistedData::default()
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::debug!("no persisted state yet");
            PersistedData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Moves an unreadable document to `<name>.bak` so it is not overwritten.
    fn set_aside(path: &Path) {
        let backup = path.with_extension("json.bak");
        if let Err(e) = std::fs::rename(path, &backup) {
            tracing::warn!(error = %e, backup = ?backup, "failed to keep a copy of the unreadable document");
        }
    }

    /// Reads and validates the document.
    ///
    /// Content problems (bad UTF-8, bad JSON, newer format) are reported as
    /// [`PanelError::Storage`]; anything else is a real I/O failure.
    fn load_from_file(path: &Path) -> Result<PersistedData> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(PanelError::Storage(format!("state file is not UTF-8: {e}")));
            }
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(PersistedData::default());
        }

        let data: PersistedData = serde_json::from_str(&contents)
            .map_err(|e| PanelError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            return Err(PanelError::Storage(format!(
                "state file version {} is newer than supported version {FORMAT_VERSION}",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            records = data.records.len(),
            "loaded persisted state"
        );

        Ok(data)
    }

    /// Writes the document atomically if it has unsaved changes.
    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        self.data.saved_at = chrono::Utc::now().timestamp();
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| PanelError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "state saved");
        Ok(())
    }
}

impl Persister for JsonPersister {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let record = self.data.records.get(key).cloned();
        tracing::debug!(key = %key, found = record.is_some(), "record lookup");
        Ok(record)
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        let _span = tracing::debug_span!("json_persist_save", key = %key).entered();

        self.data.records.insert(key.to_string(), value.clone());
        self.dirty = true;
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_persist_remove", key = %key).entered();

        if self.data.records.remove(key).is_none() && !self.dirty {
            return Ok(());
        }
        self.dirty = true;
        self.flush()
    }
}

impl Drop for JsonPersister {
    /// Retries a write that failed earlier so the last state is not lost.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty state on drop");
            if let Err(e) = self.flush() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persister = JsonPersister::new(dir.path().join("nested/state.json")).unwrap();
        assert!(persister.load("file").unwrap().is_none());
        assert!(dir.path().join("nested").is_dir());
        assert!(!persister.path().exists());
    }

    #[test]
    fn save_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut persister = JsonPersister::new(&path).unwrap();
        persister.save("file", &json!({ "path": "/var" })).unwrap();
        persister.save("other", &json!([1, 2])).unwrap();
        drop(persister);

        let reopened = JsonPersister::new(&path).unwrap();
        assert_eq!(reopened.load("file").unwrap(), Some(json!({ "path": "/var" })));
        assert_eq!(reopened.load("other").unwrap(), Some(json!([1, 2])));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn document_layout_is_namespaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut persister = JsonPersister::new(&path).unwrap();
        persister.save("file", &json!({ "sub": true })).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert!(raw["saved_at"].as_i64().unwrap() > 0);
        assert_eq!(raw["records"]["file"], json!({ "sub": true }));
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut persister = JsonPersister::new(&path).unwrap();
        persister.save("file", &json!(1)).unwrap();
        persister.save("keep", &json!(2)).unwrap();
        persister.remove("file").unwrap();
        persister.remove("never-written").unwrap();
        drop(persister);

        let reopened = JsonPersister::new(&path).unwrap();
        assert!(reopened.load("file").unwrap().is_none());
        assert_eq!(reopened.load("keep").unwrap(), Some(json!(2)));
    }

    #[test]
    fn corrupt_file_starts_empty_and_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let mut persister = JsonPersister::new(&path).unwrap();
        assert!(persister.load("file").unwrap().is_none());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("state.json.bak")).unwrap(),
            "{ truncated"
        );

        persister.save("file", &json!({ "path": "/srv" })).unwrap();
        drop(persister);
        let reopened = JsonPersister::new(&path).unwrap();
        assert_eq!(reopened.load("file").unwrap(), Some(json!({ "path": "/srv" })));
    }

    #[test]
    fn non_utf8_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let persister = JsonPersister::new(&path).unwrap();
        assert!(persister.load("file").unwrap().is_none());
    }

    #[test]
    fn unreadable_path_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(JsonPersister::new(&path), Err(PanelError::Io(_))));
    }

    #[test]
    fn newer_format_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"version": 99, "records": {"file": {}}}"#).unwrap();

        let persister = JsonPersister::new(&path).unwrap();
        assert!(persister.load("file").unwrap().is_none());
        assert!(dir.path().join("state.json.bak").exists());
    }
}
