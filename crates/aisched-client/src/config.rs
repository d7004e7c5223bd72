//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/aisched/config.toml` by default.
//!
//! The `api_key` value supports secret references:
//! - `pass::path/in/store`: resolved via `pass show`
//! - `env::VAR_NAME`: resolved from the environment
//! - plain text: used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use aisched_providers::{DEFAULT_MODEL, Mode, ProviderError};

use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the aisched client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Vendor API key (supports `pass::` and `env::` prefixes).
    pub api_key: Option<String>,

    /// Model identifier; [`DEFAULT_MODEL`] when unset.
    pub model: Option<String>,

    /// What the model is asked to produce.
    pub mode: Mode,

    /// Where generated files go.
    pub output: OutputSettings,

    /// Desktop notification settings.
    pub notifications: NotificationSettings,

    /// HTTP settings.
    pub http: HttpSettings,
}

/// Output settings for generated files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for downloaded calendar files. Defaults to the user's
    /// download directory.
    pub download_dir: Option<PathBuf>,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Show desktop notifications on failure.
    pub enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout: 60 }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path. A missing file yields
    /// the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aisched")
    }

    /// Returns the configured model, or [`DEFAULT_MODEL`].
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Returns the directory generated files are written to.
    pub fn download_dir(&self) -> PathBuf {
        self.output
            .download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout.max(1))
    }

    /// Resolves the API key, expanding `pass::` and `env::` references.
    ///
    /// # Errors
    ///
    /// Returns a `MissingCredential` provider error when no key is configured,
    /// the key is blank, or its reference cannot be resolved.
    pub fn resolve_api_key(&self) -> ClientResult<String> {
        let raw = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::missing_credential(format!(
                    "no API key configured. Run `aisched config set-key` or add \
                     api_key to {}",
                    Self::default_path().display()
                ))
            })?;

        let key = crate::secret::resolve(raw).map_err(|e| {
            ClientError::from(ProviderError::missing_credential(format!(
                "failed to resolve api_key: {}",
                e
            )))
        })?;

        if key.trim().is_empty() {
            return Err(ProviderError::missing_credential("api_key resolved to an empty value").into());
        }
        Ok(key.trim().to_string())
    }

    /// Returns a copy safe to print, with the API key masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api_key = copy.api_key.as_deref().map(crate::secret::redact);
        copy
    }
}
