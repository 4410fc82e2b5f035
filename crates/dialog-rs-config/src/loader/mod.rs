//! Config discovery: optional JSON5 file plus environment overrides.

#[cfg(test)]
mod tests;

use crate::{ConfigError, DialogConfig};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Path to a JSON5 config file.
pub const ENV_CONFIG_PATH: &str = "DIALOG_CONFIG";
/// Overrides `server.name`.
pub const ENV_SERVER_NAME: &str = "DIALOG_SERVER_NAME";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "DIALOG_LOG_LEVEL";
/// Overrides `storage.path`.
pub const ENV_STORAGE_PATH: &str = "DIALOG_STORAGE_PATH";
/// Overrides `query.default_limit`.
pub const ENV_DEFAULT_LIMIT: &str = "DIALOG_DEFAULT_LIMIT";
/// Overrides `query.max_limit`.
pub const ENV_MAX_LIMIT: &str = "DIALOG_MAX_LIMIT";

/// Effective config plus the file it was read from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged, validated config.
    pub config: DialogConfig,
    /// Config file that contributed to the result.
    pub source: Option<PathBuf>,
}

/// Options controlling config discovery and overrides.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; takes precedence over `DIALOG_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Storage root override applied after the environment.
    pub storage_path: Option<PathBuf>,
    /// Log level override applied after the environment.
    pub log_level: Option<String>,
}

impl DialogConfig {
    /// Parse and validate a config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let config = parse_layer(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = read_layer(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Load config using the process environment.
    pub fn load(options: LoadOptions) -> Result<LoadedConfig, ConfigError> {
        Self::load_with_env(options, |key| std::env::var(key).ok())
    }

    /// Load config with an explicit environment lookup.
    ///
    /// Precedence (low -> high): defaults, config file, environment, options.
    pub fn load_with_env<F>(options: LoadOptions, lookup: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = options
            .config_path
            .clone()
            .or_else(|| lookup(ENV_CONFIG_PATH).map(PathBuf::from));
        let mut config = match &source {
            Some(path) => read_layer(path)?,
            None => DialogConfig::default(),
        };
        config.apply_env(&lookup)?;

        if let Some(path) = options.storage_path {
            config.storage.path = Some(path.to_string_lossy().to_string());
        }
        if let Some(level) = options.log_level {
            config.logging.level = level;
        }
        config.validate()?;
        info!(
            "loaded config (source={}, storage={})",
            source
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "defaults".to_string()),
            config.storage_root().display()
        );
        Ok(LoadedConfig { config, source })
    }

    /// Apply `DIALOG_*` overrides from the provided lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = non_empty(lookup(ENV_SERVER_NAME)) {
            debug!("env override (key={ENV_SERVER_NAME})");
            self.server.name = name;
        }
        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            debug!("env override (key={ENV_LOG_LEVEL})");
            self.logging.level = level;
        }
        if let Some(path) = non_empty(lookup(ENV_STORAGE_PATH)) {
            debug!("env override (key={ENV_STORAGE_PATH})");
            self.storage.path = Some(path);
        }
        if let Some(limit) = non_empty(lookup(ENV_DEFAULT_LIMIT)) {
            self.query.default_limit = parse_limit(&limit, "query.default_limit")?;
        }
        if let Some(limit) = non_empty(lookup(ENV_MAX_LIMIT)) {
            self.query.max_limit = Some(parse_limit(&limit, "query.max_limit")?);
        }
        Ok(())
    }
}

/// Read a file layer; validation waits until every layer is merged.
fn read_layer(path: &Path) -> Result<DialogConfig, ConfigError> {
    debug!("loading config file (path={})", path.display());
    let contents = fs::read_to_string(path)?;
    parse_layer(&contents)
}

fn parse_layer(contents: &str) -> Result<DialogConfig, ConfigError> {
    debug!("loading config from raw contents (len={})", contents.len());
    let value: Value = json5::from_str(contents)?;
    if !value.is_object() {
        return Err(ConfigError::invalid("<root>", "expected an object"));
    }
    Ok(serde_json::from_value(value)?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_limit(raw: &str, path: &str) -> Result<usize, ConfigError> {
    raw.parse::<usize>()
        .map_err(|err| ConfigError::invalid(path, format!("`{raw}` is not a count: {err}")))
}
