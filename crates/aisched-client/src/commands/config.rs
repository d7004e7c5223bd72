//! Configuration commands.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use aisched_providers::{Mode, resolve, supported_models};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Keys accepted by `config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "api_key",
    "model",
    "mode",
    "output.download_dir",
    "notifications.enabled",
    "http.timeout",
];

/// Dump the current configuration to stdout, API key masked.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    resolve(config.model())?;
    println!("Model {} is supported.", config.model());

    config.resolve_api_key()?;
    println!("API key is set.");

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

/// Store the API key, reading it from stdin when not given.
pub fn set_key(path: &Path, key: Option<String>) -> ClientResult<()> {
    let key = match key {
        Some(key) => key,
        None => {
            eprintln!("Enter API key:");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line
        }
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ClientError::Config("API key must not be empty".into()));
    }

    update_file(path, "api_key", key)?;
    println!("API key saved to {}", path.display());
    Ok(())
}

/// Set one configuration value, keeping comments and other keys.
pub fn set(path: &Path, key: &str, value: &str) -> ClientResult<()> {
    update_file(path, key, value)?;
    println!("{} updated in {}", key, path.display());
    Ok(())
}

fn update_file(path: &Path, key: &str, value: &str) -> ClientResult<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let updated = apply_setting(&content, key, value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated)?;
    info!(key, path = %path.display(), "configuration updated");
    Ok(())
}

/// Returns `content` with `key` set to `value`.
///
/// The value is checked against the key's type, and the whole document must
/// still load as a [`ClientConfig`].
pub fn apply_setting(content: &str, key: &str, value: &str) -> ClientResult<String> {
    let item = setting_value(key, value)?;

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;

    match key.split_once('.') {
        None => doc[key] = item,
        Some((table, field)) => {
            if !doc.contains_key(table) {
                doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
            }
            let table = doc[table]
                .as_table_mut()
                .ok_or_else(|| ClientError::Config(format!("`{}` is not a table", table)))?;
            table[field] = item;
        }
    }

    let updated = doc.to_string();
    toml::from_str::<ClientConfig>(&updated)
        .map_err(|e| ClientError::Config(format!("resulting config is invalid: {}", e)))?;
    Ok(updated)
}

fn setting_value(key: &str, value: &str) -> ClientResult<toml_edit::Item> {
    let item = match key {
        "api_key" | "output.download_dir" => toml_edit::value(value),
        "model" => {
            resolve(value).map_err(|_| {
                let known: Vec<&str> = supported_models().map(|(m, _)| m).collect();
                ClientError::Config(format!(
                    "unsupported model `{}` (expected one of: {})",
                    value,
                    known.join(", ")
                ))
            })?;
            toml_edit::value(value)
        }
        "mode" => {
            let mode: Mode = value
                .parse()
                .map_err(|e: aisched_providers::UnknownMode| ClientError::Config(e.to_string()))?;
            toml_edit::value(mode.as_str())
        }
        "notifications.enabled" => {
            let enabled: bool = value.parse().map_err(|_| {
                ClientError::Config(format!("`{}` must be true or false", key))
            })?;
            toml_edit::value(enabled)
        }
        "http.timeout" => {
            let secs: u64 = value
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    ClientError::Config(format!("`{}` must be a positive number of seconds", key))
                })?;
            toml_edit::value(secs as i64)
        }
        _ => {
            return Err(ClientError::Config(format!(
                "unknown key `{}` (expected one of: {})",
                key,
                SETTABLE_KEYS.join(", ")
            )));
        }
    };
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_comments_and_other_keys() {
        let content = "# my settings\nmodel = \"gpt-4o\" # fast\n\n[http]\ntimeout = 30\n";
        let updated = apply_setting(content, "mode", "auto").unwrap();
        assert!(updated.contains("# my settings"));
        assert!(updated.contains("model = \"gpt-4o\" # fast"));
        assert!(updated.contains("mode = \"auto\""));

        let config: ClientConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.mode, Mode::Auto);
        assert_eq!(config.http.timeout, 30);
    }

    #[test]
    fn set_creates_missing_table() {
        let updated = apply_setting("", "notifications.enabled", "false").unwrap();
        let config: ClientConfig = toml::from_str(&updated).unwrap();
        assert!(!config.notifications.enabled);
    }

    #[test]
    fn set_replaces_existing_value() {
        let updated = apply_setting("[http]\ntimeout = 30\n", "http.timeout", "5").unwrap();
        let config: ClientConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.http.timeout, 5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(apply_setting("", "model", "gpt-5").is_err());
        assert!(apply_setting("", "mode", "popup").is_err());
        assert!(apply_setting("", "notifications.enabled", "yes").is_err());
        assert!(apply_setting("", "http.timeout", "0").is_err());
        assert!(apply_setting("", "colour", "blue").is_err());
    }

    #[test]
    fn rejects_non_table_parent() {
        assert!(apply_setting("http = 5\n", "http.timeout", "5").is_err());
    }

    #[test]
    fn set_key_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aisched").join("config.toml");

        set_key(&path, Some("  env::OPENAI_API_KEY \n".into())).unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("env::OPENAI_API_KEY"));
    }

    #[test]
    fn set_key_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_key(&path, Some("   ".into())).is_err());
        assert!(!path.exists());
    }
}
