//! Platform locations for persisted client state.

use std::path::PathBuf;

/// Directory name used under the platform data directory.
const APP_DIR: &str = "panel-client";

/// Returns the data directory for panel client state.
///
/// Resolves to the platform data directory from `dirs::data_dir()`
/// (`~/.local/share/panel-client` on Linux), or to the system temp directory
/// when no home directory can be determined.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Default location of the JSON state document.
#[must_use]
pub fn default_state_file() -> PathBuf {
    get_data_dir().join("state.json")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, and all paths when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use panel_client::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/etc/panel.toml"), PathBuf::from("/etc/panel.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
