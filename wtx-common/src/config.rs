//! Bootstrap configuration loading
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The TOML file is optional. A missing or unreadable file logs a warning
//! and the compiled defaults apply; it never stops a service from starting.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "WTX_CONFIG";

/// Environment variable holding the storage connection string
pub const DATABASE_URL_ENV_VAR: &str = "WTX_DATABASE_URL";

/// Bootstrap configuration read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Storage connection string (sqlx SQLite URL)
    pub database_url: Option<String>,
    pub persistence: PersistenceConfig,
    pub proxy: ProxyConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Persistence service (wtx-sd) listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub host: String,
    pub port: u16,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Extraction proxy (wtx-xp) listener and forwarding rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Path prefix stripped before forwarding
    pub prefix: String,
    /// Origin requests are forwarded to
    pub upstream_origin: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5173,
            prefix: "/api".to_string(),
            upstream_origin: "https://openai-api.karmalive.pro".to_string(),
        }
    }
}

/// Endpoints used by the client (wtx-ui)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub extract_url: String,
    pub save_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            extract_url: "http://127.0.0.1:5173/api/extract-details".to_string(),
            save_url: "http://127.0.0.1:5000/api/save-details".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where the active configuration came from
///
/// Kept separate from loading so binaries can report it once tracing is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// No config file located
    Defaults,
    /// Loaded from this file
    File(PathBuf),
    /// File located but unusable; defaults apply
    Fallback { path: PathBuf, reason: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => info!("No config file found, using compiled defaults"),
            ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigSource::Fallback { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason);
                warn!("Using compiled defaults");
            }
        }
    }
}

impl TomlConfig {
    /// Load the config file resolved from `cli_arg`, falling back to defaults
    pub fn load(cli_arg: Option<&Path>) -> (Self, ConfigSource) {
        let Some(path) = resolve_config_path(cli_arg) else {
            return (Self::default(), ConfigSource::Defaults);
        };

        match load_toml_config(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (
                Self::default(),
                ConfigSource::Fallback {
                    path,
                    reason: e.to_string(),
                },
            ),
        }
    }

    /// [`TomlConfig::load`], logging the outcome immediately
    pub fn load_or_default(cli_arg: Option<&Path>) -> Self {
        let (config, source) = Self::load(cli_arg);
        source.log();
        config
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Locate the config file
///
/// An explicit CLI path or `WTX_CONFIG` is returned even if it does not
/// exist, so the failure gets logged. Platform locations are only used when
/// present: `~/.config/wtx/config.toml`, then `/etc/wtx/config.toml`.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("wtx").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/wtx/config.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Resolve the storage connection string
pub fn resolve_database_url(cli_arg: Option<&str>, config: &TomlConfig) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg {
        return url.to_string();
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(DATABASE_URL_ENV_VAR) {
        if !url.is_empty() {
            return url;
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = &config.database_url {
        return url.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_database_url()
}

/// SQLite database under the platform's local data directory
pub fn default_database_url() -> String {
    let path = dirs::data_local_dir()
        .map(|d| d.join("wtx"))
        .unwrap_or_else(|| PathBuf::from("./wtx_data"))
        .join("wtx.db");
    format!("sqlite://{}?mode=rwc", path.display())
}
