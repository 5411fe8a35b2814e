//! Server configuration.
//!
//! Handles loading, validating, and merging an optional TOML config file.
//! Stock defaults are the base layer; a user file overrides just the values it
//! names; command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "127.0.0.1"        # Address to bind
//! port = 8000               # Port to bind
//! open_browser = true       # Open the gallery in the default browser on start
//!
//! [history]
//! enabled = true            # Remember served directories
//! file = "history.txt"      # Where to remember them (relative to the cwd)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [server]
//! port = 9000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalaConfig {
    /// Network binding and startup behavior.
    pub server: ServerConfig,
    /// Served-directory history log.
    pub history: HistoryConfig,
}

impl GalaConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.host must not be empty".into(),
            ));
        }
        if self.history.enabled && self.history.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "history.file must not be empty when history is enabled".into(),
            ));
        }
        Ok(())
    }

    /// `http://host:port/`
    pub fn server_url(&self) -> String {
        format!("http://{}:{}/", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub file: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: PathBuf::from("history.txt"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    // GalaConfig has only strings, integers, booleans and tables.
    toml::Value::try_from(GalaConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Lay a sparse user file over the stock defaults.
///
/// Sections are merged key by key, so `[server] port = 9000` keeps the
/// default host. Any other value in the user file replaces the default.
pub fn merge_toml(defaults: toml::Value, user: toml::Value) -> toml::Value {
    match (defaults, user) {
        (toml::Value::Table(mut merged), toml::Value::Table(user)) => {
            for (key, value) in user {
                let value = match merged.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, user) => user,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalaConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(user) => merge_toml(base, user),
        None => base,
    };
    let config: GalaConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or the stock defaults when no path is given.
///
/// A path that is given but missing is an error.
pub fn load_config(path: Option<&Path>) -> Result<GalaConfig, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(overlay)
}

/// Returns a fully-commented stock config file.
pub fn stock_config_toml() -> &'static str {
    r##"# gala configuration
# ==================
#
# Every key is optional. Values shown are the defaults.
# Command-line flags (--host, --port, --no-open) override this file.

[server]
# Address to bind. Keep this on a local interface: there is no authentication.
host = "127.0.0.1"
# Port to bind.
port = 8000
# Open the gallery in the default browser once the server is listening.
open_browser = true

[history]
# Remember every directory served (other than ".") in a text file,
# most recent first.
enabled = true
# Relative paths are resolved against the working directory.
file = "history.txt"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_binds_locally() {
        let config = GalaConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.open_browser);
    }

    #[test]
    fn default_history_settings() {
        let config = GalaConfig::default();
        assert!(config.history.enabled);
        assert_eq!(config.history.file, PathBuf::from("history.txt"));
    }

    #[test]
    fn server_url_format() {
        let mut config = GalaConfig::default();
        config.server.host = "0.0.0.0".into();
        config.server.port = 9000;
        assert_eq!(config.server_url(), "http://0.0.0.0:9000/");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 9000
"#;
        let config: GalaConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        // Defaults preserved
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.history.enabled);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: GalaConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, GalaConfig::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_without_path_is_default() {
        let config = load_config(None).unwrap();
        assert_eq!(config, GalaConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gala.toml");
        fs::write(
            &path,
            r#"
[server]
host = "192.168.1.10"
open_browser = false

[history]
file = "/tmp/gala-history.txt"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.server.host, "192.168.1.10");
        assert!(!config.server.open_browser);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.history.file, PathBuf::from("/tmp/gala-history.txt"));
    }

    #[test]
    fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(tmp.path().join("nope.toml").as_path()));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gala.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(path.as_path()));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gala.toml");
        fs::write(&path, "[server]\nprot = 9000\n").unwrap();

        assert!(matches!(load_config(Some(path.as_path())), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml = "[database]\nurl = \"x\"\n";
        let result: Result<GalaConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_port_rejected() {
        let toml = "[server]\nport = 70000\n";
        let result: Result<GalaConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GalaConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_host() {
        let mut config = GalaConfig::default();
        config.server.host = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_history_file_only_when_enabled() {
        let mut config = GalaConfig::default();
        config.history.file = PathBuf::new();
        assert!(config.validate().is_err());

        config.history.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gala.toml");
        fs::write(&path, "[server]\nhost = \"\"\n").unwrap();

        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn user_port_keeps_default_host() {
        let user: toml::Value = toml::from_str("[server]\nport = 9000").unwrap();
        let merged = merge_toml(stock_defaults_value(), user);
        assert_eq!(merged["server"]["host"].as_str(), Some("127.0.0.1"));
        assert_eq!(merged["server"]["port"].as_integer(), Some(9000));
        assert_eq!(merged["history"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn user_history_section_overrides_only_named_keys() {
        let user: toml::Value = toml::from_str("[history]\nenabled = false").unwrap();
        let config: GalaConfig = merge_toml(stock_defaults_value(), user).try_into().unwrap();
        assert!(!config.history.enabled);
        assert_eq!(config.history.file, PathBuf::from("history.txt"));
        assert_eq!(config.server, ServerConfig::default());
    }
}
