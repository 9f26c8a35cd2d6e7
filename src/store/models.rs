//! Persisted view-state records.
//!
//! Field names on the wire are camelCase (`showHidden`, `viewType`) so that
//! records written by earlier web builds of the file browser load unchanged.

use serde::{Deserialize, Serialize};

/// Directory the file browser opens when nothing has been persisted yet.
pub const DEFAULT_PATH: &str = "/opt";

/// How directory entries are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// One entry per row with details.
    #[default]
    List,

    /// Icon grid.
    Grid,
}

impl ViewType {
    /// The other layout.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }
}

/// File-browser view preferences.
///
/// Missing fields fall back to their defaults when deserializing, which lets
/// records persisted before `viewType` existed rehydrate as `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileState {
    /// Directory currently being browsed.
    pub path: String,

    /// Active filename filter, empty when not filtering.
    pub keyword: String,

    /// Whether the keyword filter recurses into subdirectories.
    pub sub: bool,

    /// Whether dotfiles are listed.
    pub show_hidden: bool,

    pub view_type: ViewType,
}

impl Default for FileState {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            keyword: String::new(),
            sub: false,
            show_hidden: false,
            view_type: ViewType::List,
        }
    }
}
