//! Configuration models and loading for the dialog manager.
//!
//! Settings come from built-in defaults, an optional JSON5 file, and
//! `DIALOG_*` environment variables, in that order of precedence.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Loader options and the environment variable names it reads.
pub use loader::{
    ENV_CONFIG_PATH, ENV_DEFAULT_LIMIT, ENV_LOG_LEVEL, ENV_MAX_LIMIT, ENV_SERVER_NAME,
    ENV_STORAGE_PATH, LoadOptions, LoadedConfig,
};
/// Configuration schema models.
pub use model::*;
