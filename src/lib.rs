//! panel-client: typed bindings and UI state for a server management panel.
//!
//! The crate provides:
//! - Async bindings for the panel's OpenResty and disk toolbox REST endpoints
//! - A pluggable transport, with a `reqwest` implementation that understands the
//!   panel's `{msg, data}` response envelope
//! - The file browser's view-state store, written through to a JSON file on every
//!   change and rehydrated on startup

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐     ┌───────────────────────────┐
//! │ API bindings (api/)       │     │ View-state store (store/) │
//! │ - OpenResty / Stream      │     │ - FileStore actions       │
//! │ - Toolbox disk / LVM      │     │ - Scoped write-through    │
//! └───────────────────────────┘     └───────────────────────────┘
//!              │                                 │
//! ┌───────────────────────────┐     ┌───────────────────────────┐
//! │ Transport trait           │     │ Persister trait           │
//! │ - HttpTransport (reqwest) │     │ - JsonPersister (file)    │
//! └───────────────────────────┘     │ - Memory / Noop           │
//!                                   └───────────────────────────┘
//!              │                                 │
//! ┌─────────────────────────────────────────────────────────────┐
//! │  domain/ (PanelError), infrastructure/ (paths),             │
//! │  observability/ (tracing subscriber)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two halves never call each other; UI code drives both.
//!
//! # Modules
//!
//! - [`api`]: request model, transport seam and endpoint bindings
//! - [`store`]: file-browser state store and persistence backends
//! - [`domain`]: error type
//! - [`infrastructure`]: platform paths
//! - [`observability`]: tracing subscriber setup
//!
//! # Configuration
//!
//! ```toml
//! # panel.toml
//! base_url = "https://panel.example.com:8888/api"
//! state_file = "~/.local/share/panel-client/state.json"
//! request_timeout_secs = 30
//! trace_level = "panel_client=debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use panel_client::{initialize, Config};
//!
//! # async fn run() -> panel_client::Result<()> {
//! let config = Config::from_toml_file("panel.toml")?;
//! let mut panel = initialize(&config)?;
//!
//! panel.files.toggle_show_hidden();
//! let info = panel.client.disk().lvm_info().await?;
//! # let _ = info;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod store;

pub use api::{ApiRequest, HttpTransport, Method, PanelClient, Transport};
pub use domain::{PanelError, Result};
pub use store::{FileState, FileStore, JsonPersister, Persister, ViewType};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
///
/// Loaded from a TOML file with [`Config::from_toml_file`] or from flat key/value
/// pairs with [`Config::from_map`]. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Panel API root every request path is appended to.
    ///
    /// Default: `http://127.0.0.1:8888/api`
    pub base_url: String,

    /// Where the view-state document is stored.
    ///
    /// A leading `~` is expanded. Default: `<data dir>/panel-client/state.json`
    pub state_file: Option<PathBuf>,

    /// Per-request timeout in seconds. Default: 30
    pub request_timeout_secs: u64,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or a full
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state_file: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from flat string pairs, such as environment-style
    /// settings forwarded by a host application.
    ///
    /// # Parsing Rules
    ///
    /// - `base_url`: used when non-empty
    /// - `state_file`: `~` expanded
    /// - `request_timeout_secs`: `u64`, falls back to 30 on parse error or 0
    /// - `trace_level`: taken verbatim
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use panel_client::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("base_url".to_string(), "https://panel.local/api".to_string());
    /// map.insert("request_timeout_secs".to_string(), "5".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.base_url, "https://panel.local/api");
    /// assert_eq!(config.request_timeout_secs, 5);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let base_url = config
            .get("base_url")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = config
            .get("request_timeout_secs")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            state_file: config
                .get("state_file")
                .map(|p| infrastructure::expand_tilde(p.trim())),
            request_timeout_secs,
            trace_level: config.get("trace_level").cloned(),
        }
    }

    /// Reads configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Io`] if the file cannot be read and
    /// [`PanelError::Config`] if it is not valid TOML for this struct.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| PanelError::Config(format!("{}: {e}", path.display())))?;

        config.state_file = config.state_file.take().map(expand_state_file);

        if config.request_timeout_secs == 0 {
            tracing::warn!(path = %path.display(), "request_timeout_secs = 0 would fail every request, using default");
            config.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }

        tracing::debug!(path = %path.display(), base_url = %config.base_url, "configuration loaded");
        Ok(config)
    }

    /// State document location, resolving the platform default.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(infrastructure::default_state_file)
    }

    /// Per-request timeout. A zero setting means the default, never an instant timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

/// Expands a leading `~` in a configured state path.
///
/// Non-UTF-8 paths are kept as-is.
fn expand_state_file(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(text) => infrastructure::expand_tilde(text),
        None => path,
    }
}

/// Everything a panel UI session needs: the API client and the file store.
#[derive(Debug)]
pub struct Panel {
    pub client: PanelClient<HttpTransport>,
    pub files: FileStore,
}

/// Initializes tracing, the HTTP client and the persisted file store.
///
/// # Errors
///
/// Returns an error if the base URL is invalid, the HTTP client cannot be built,
/// or the state document exists but cannot be read.
///
/// # Example
///
/// ```no_run
/// use panel_client::{initialize, Config};
///
/// let panel = initialize(&Config::default())?;
/// println!("browsing {}", panel.files.state().path);
/// # Ok::<(), panel_client::PanelError>(())
/// ```
pub fn initialize(config: &Config) -> Result<Panel> {
    observability::init_tracing(config);
    tracing::debug!("initializing panel client");

    let transport = HttpTransport::new(&config.base_url, config.request_timeout())?;
    let persister = JsonPersister::new(config.state_file())?;

    Ok(Panel {
        client: PanelClient::new(transport),
        files: FileStore::open(persister),
    })
}
