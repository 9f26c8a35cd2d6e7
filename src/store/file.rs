//! File-browser view-state store.
//!
//! [`FileStore`] owns the browser's [`FileState`] and writes it through to a
//! [`Persister`] after every action. UI code reads the state through
//! [`FileStore::state`] and changes it only through the store's actions.
//!
//! # Example
//!
//! ```rust
//! use panel_client::store::{FileStore, MemoryPersister, ViewType};
//!
//! let storage = MemoryPersister::new();
//! let mut store = FileStore::open(storage.clone());
//! store.toggle_view_type();
//! drop(store);
//!
//! let store = FileStore::open(storage);
//! assert_eq!(store.state().view_type, ViewType::Grid);
//! ```

use crate::domain::error::Result;
use crate::store::backend::Persister;
use crate::store::memory::NoopPersister;
use crate::store::models::FileState;

/// Namespace key the file browser's record is persisted under.
pub const STORE_KEY: &str = "file";

/// Owning container for the file browser's view preferences.
pub struct FileStore {
    state: FileState,
    persister: Box<dyn Persister>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("state", &self.state).finish_non_exhaustive()
    }
}

impl FileStore {
    /// Opens the store, rehydrating the last persisted state.
    ///
    /// Falls back to [`FileState::default`] when nothing was persisted, the
    /// backend cannot be read, or the record does not decode. Fallbacks are
    /// logged and never written back until the first action.
    pub fn open(persister: impl Persister + 'static) -> Self {
        let _span = tracing::debug_span!("file_store_open", key = STORE_KEY).entered();

        let state = match persister.load(STORE_KEY) {
            Ok(Some(record)) => serde_json::from_value::<FileState>(record).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "persisted file state is invalid, using defaults");
                FileState::default()
            }),
            Ok(None) => {
                tracing::debug!("no persisted file state, using defaults");
                FileState::default()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load file state, using defaults");
                FileState::default()
            }
        };

        tracing::debug!(path = %state.path, view_type = ?state.view_type, "file store ready");

        Self {
            state,
            persister: Box::new(persister),
        }
    }

    /// A store that starts from defaults and persists nothing.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::open(NoopPersister)
    }

    /// Current view state, for rendering.
    #[must_use]
    pub const fn state(&self) -> &FileState {
        &self.state
    }

    /// Replaces every field with `info`. Values are taken as-is.
    pub fn set(&mut self, info: FileState) {
        self.mutate("set", |state| *state = info);
    }

    pub fn toggle_show_hidden(&mut self) {
        self.mutate("toggle_show_hidden", |state| state.show_hidden = !state.show_hidden);
    }

    /// Switches between list and grid layout.
    pub fn toggle_view_type(&mut self) {
        self.mutate("toggle_view_type", |state| state.view_type = state.view_type.toggled());
    }

    /// Navigates to `path`, leaving the filter untouched.
    pub fn set_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.mutate("set_path", |state| state.path = path);
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.mutate("set_keyword", |state| state.keyword = keyword);
    }

    pub fn set_sub(&mut self, sub: bool) {
        self.mutate("set_sub", |state| state.sub = sub);
    }

    /// Restores the defaults and persists them.
    pub fn reset(&mut self) {
        self.mutate("reset", |state| *state = FileState::default());
    }

    /// Deletes the persisted record and restores defaults in memory only.
    ///
    /// The next action writes a fresh record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to delete the record. The in-memory
    /// state is reset either way.
    pub fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("file_store_clear").entered();
        self.state = FileState::default();
        self.persister.remove(STORE_KEY)
    }

    /// Applies `change` and writes the result through to the persister.
    ///
    /// Persistence failures are logged; the in-memory change is kept.
    fn mutate(&mut self, action: &'static str, change: impl FnOnce(&mut FileState)) {
        let _span = tracing::debug_span!("file_store_mutate", action = action).entered();

        change(&mut self.state);

        let record = match serde_json::to_value(&self.state) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize file state");
                return;
            }
        };

        if let Err(e) = self.persister.save(STORE_KEY, &record) {
            tracing::error!(error = %e, "failed to persist file state");
        }
    }
}
