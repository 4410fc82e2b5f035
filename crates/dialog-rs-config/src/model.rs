//! Configuration schema for the dialog manager.

use crate::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory created under the user's documents folder when no storage path is set.
pub const DEFAULT_STORAGE_DIR: &str = "saved_dialogs";
/// Display name used when none is configured.
pub const DEFAULT_SERVER_NAME: &str = "Dialog Manager";

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Root config for the dialog manager.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DialogConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

impl DialogConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> DialogConfigBuilder {
        DialogConfigBuilder::new()
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::invalid("server.name", "must not be empty"));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("unknown level `{}`", self.logging.level),
            ));
        }
        if let Some(path) = &self.storage.path
            && path.trim().is_empty()
        {
            return Err(ConfigError::invalid("storage.path", "must not be empty"));
        }
        if self.query.default_limit == 0 {
            return Err(ConfigError::invalid(
                "query.default_limit",
                "must be greater than zero",
            ));
        }
        if let Some(max_limit) = self.query.max_limit {
            if max_limit == 0 {
                return Err(ConfigError::invalid(
                    "query.max_limit",
                    "must be greater than zero",
                ));
            }
            if self.query.default_limit > max_limit {
                return Err(ConfigError::invalid(
                    "query.default_limit",
                    format!("exceeds query.max_limit ({max_limit})"),
                ));
            }
        }
        Ok(())
    }

    /// Resolve the storage root, expanding `~` and falling back to the documents folder.
    pub fn storage_root(&self) -> PathBuf {
        match &self.storage.path {
            Some(path) => expand_home(path),
            None => default_storage_root(),
        }
    }
}

/// Builder for assembling a `DialogConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct DialogConfigBuilder {
    config: DialogConfig,
}

impl DialogConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: DialogConfig::default(),
        }
    }

    /// Set the server display name.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.config.server.name = name.into();
        self
    }

    /// Set the log verbosity.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Set the storage root.
    pub fn storage_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.storage.path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Replace the query limits.
    pub fn query(mut self, query: QueryConfig) -> Self {
        self.config.query = query;
        self
    }

    /// Finalize and return the built `DialogConfig`.
    pub fn build(self) -> DialogConfig {
        self.config
    }
}

/// Identity of the tool server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    DEFAULT_SERVER_NAME.to_string()
}

/// Log verbosity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where dialog records live on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<String>,
}

/// Result-list sizing for list-style queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default)]
    pub max_limit: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: None,
        }
    }
}

fn default_limit() -> usize {
    20
}

/// Default storage root: `<Documents>/saved_dialogs`.
pub fn default_storage_root() -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => match dirs.document_dir() {
            Some(documents) => documents.join(DEFAULT_STORAGE_DIR),
            None => dirs.home_dir().join("Documents").join(DEFAULT_STORAGE_DIR),
        },
        None => PathBuf::from(DEFAULT_STORAGE_DIR),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, UserDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogConfig, QueryConfig};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        let config = DialogConfig::default();
        config.validate().expect("valid");
        assert_eq!(config.server.name, "Dialog Manager");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.query.default_limit, 20);
        assert_eq!(config.query.max_limit, None);
        assert!(config.storage_root().ends_with("saved_dialogs"));
    }

    #[test]
    fn builder_sets_explicit_storage_root() {
        let config = DialogConfig::builder()
            .storage_path("/tmp/dialogs")
            .server_name("Archive")
            .build();
        assert_eq!(config.storage_root(), PathBuf::from("/tmp/dialogs"));
        assert_eq!(config.server.name, "Archive");
    }

    #[test]
    fn rejects_default_limit_above_max() {
        let config = DialogConfig::builder()
            .query(QueryConfig {
                default_limit: 50,
                max_limit: Some(10),
            })
            .build();
        let err = config.validate().expect_err("invalid");
        assert!(err.to_string().contains("query.default_limit"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = DialogConfig::builder().log_level("loud").build();
        let err = config.validate().expect_err("invalid");
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let config = DialogConfig::builder().log_level("DEBUG").build();
        config.validate().expect("valid");
    }
}
