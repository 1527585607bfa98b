//! # Configuration System
//!
//! YAML configuration for the calculation service:
//!
//! - HTTP bind address and optional static web assets
//! - the explanation service (endpoint, key, timeout)
//! - logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `RFCALC_CONFIG` environment variable
//! 2. `./rfcalc.yaml` (current directory)
//! 3. the platform config dir, e.g. `~/.config/rfcalc/config.yaml`
//! 4. `/etc/rfcalc/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0:8000"
//!   static_dir: "./frontend"
//!
//! explainer:
//!   enable: true
//!   timeout_secs: 30
//!
//! logging:
//!   level: debug
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::LogConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RFCALC_CONFIG";

/// Hosted model endpoint used when none is configured.
pub const DEFAULT_EXPLAINER_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Error type for configuration operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),
    #[error("failed to read config: {0}")]
    ReadError(String),
    #[error("failed to parse config: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Directory holding `welcome.html`, `index.html` and `static/`
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("bind '{}': {}", self.bind, e)))
    }
}

/// Explanation service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    pub enable: bool,
    pub endpoint: String,
    /// Access key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            enable: true,
            endpoint: DEFAULT_EXPLAINER_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ExplainerConfig {
    /// Enabled and holding a non-empty key.
    pub fn is_usable(&self) -> bool {
        self.enable && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfcalcConfig {
    pub version: String,
    pub server: ServerConfig,
    pub explainer: ExplainerConfig,
    pub logging: LogConfig,
}

impl Default for RfcalcConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            server: ServerConfig::default(),
            explainer: ExplainerConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl RfcalcConfig {
    /// Load from the first file on the search path, or defaults.
    ///
    /// A path given in `RFCALC_CONFIG` that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./rfcalc.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "rfcalc") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/rfcalc/config.yaml"));
        paths
    }

    /// Fill the explainer key from `var` when the file left it empty.
    pub fn with_api_key_from_env(mut self, var: &str) -> Self {
        let missing = self
            .explainer
            .api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty());
        if missing {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    self.explainer.api_key = Some(key);
                }
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.explainer.enable {
            if self.explainer.timeout_secs == 0 {
                return Err(ConfigError::ValidationError(
                    "explainer.timeout_secs must be > 0".to_string(),
                ));
            }
            if !self.explainer.endpoint.starts_with("http://")
                && !self.explainer.endpoint.starts_with("https://")
            {
                return Err(ConfigError::ValidationError(format!(
                    "explainer.endpoint '{}' is not an http(s) URL",
                    self.explainer.endpoint
                )));
            }
        }

        if let Some(ref dir) = self.server.static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::NotFound(format!(
                    "static_dir {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    pub fn example_yaml() -> String {
        let config = Self {
            server: ServerConfig {
                bind: "0.0.0.0:8000".to_string(),
                static_dir: Some(PathBuf::from("./frontend")),
            },
            explainer: ExplainerConfig {
                api_key: Some("<your key>".to_string()),
                ..Default::default()
            },
            logging: LogConfig::production(),
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
