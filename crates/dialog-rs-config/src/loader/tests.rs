//! Tests for config file loading and environment overrides.

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use tempfile::TempDir;

/// Build a lookup function over a fixed set of variables.
fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = DialogConfig::load_from_str("{}").expect("config");
    assert_eq!(config, DialogConfig::default());
}

/// JSON5 syntax (comments, unquoted keys, trailing commas) is accepted.
#[test]
fn parse_json5_config() {
    let json5 = r#"{
        // archive settings
        server: { name: "Notes" },
        storage: { path: "/srv/dialogs" },
        query: { default_limit: 5, max_limit: 50, },
    }"#;
    let config = DialogConfig::load_from_str(json5).expect("config");
    assert_eq!(config.server.name, "Notes");
    assert_eq!(config.storage.path.as_deref(), Some("/srv/dialogs"));
    assert_eq!(config.query.default_limit, 5);
    assert_eq!(config.query.max_limit, Some(50));
}

/// Reject unexpected keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = DialogConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown field"));
}

/// Reject a zero limit with the offending path in the message.
#[test]
fn rejects_zero_max_limit() {
    let err = DialogConfig::load_from_str(r#"{ query: { max_limit: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("query.max_limit"));
}

/// Environment values override the defaults.
#[test]
fn env_overrides_defaults() {
    let loaded = DialogConfig::load_with_env(
        LoadOptions::default(),
        env(&[
            (ENV_SERVER_NAME, "Env Server"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_STORAGE_PATH, "/var/dialogs"),
            (ENV_DEFAULT_LIMIT, "7"),
            (ENV_MAX_LIMIT, "70"),
        ]),
    )
    .expect("load");
    let config = loaded.config;
    assert_eq!(loaded.source, None);
    assert_eq!(config.server.name, "Env Server");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.storage_root(), PathBuf::from("/var/dialogs"));
    assert_eq!(config.query.default_limit, 7);
    assert_eq!(config.query.max_limit, Some(70));
}

/// Blank environment values are ignored.
#[test]
fn blank_env_values_are_ignored() {
    let loaded = DialogConfig::load_with_env(
        LoadOptions::default(),
        env(&[(ENV_SERVER_NAME, "  "), (ENV_DEFAULT_LIMIT, "")]),
    )
    .expect("load");
    assert_eq!(loaded.config, DialogConfig::default());
}

/// Non-numeric limits are reported against their config path.
#[test]
fn env_rejects_non_numeric_limit() {
    let err = DialogConfig::load_with_env(
        LoadOptions::default(),
        env(&[(ENV_DEFAULT_LIMIT, "many")]),
    )
    .unwrap_err();
    assert!(format!("{err}").contains("query.default_limit"));
}

/// File from `DIALOG_CONFIG` is loaded, env beats file, options beat env.
#[test]
fn precedence_file_env_options() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("dialogs.json5");
    fs::write(
        &path,
        r#"{ server: { name: "File" }, storage: { path: "/from/file" }, logging: { level: "warn" } }"#,
    )
    .expect("write");
    let path_str = path.to_string_lossy().to_string();

    let options = LoadOptions {
        storage_path: Some(PathBuf::from("/from/options")),
        ..LoadOptions::default()
    };
    let loaded = DialogConfig::load_with_env(
        options,
        env(&[
            (ENV_CONFIG_PATH, path_str.as_str()),
            (ENV_LOG_LEVEL, "trace"),
        ]),
    )
    .expect("load");

    assert_eq!(loaded.source, Some(path));
    assert_eq!(loaded.config.server.name, "File");
    assert_eq!(loaded.config.logging.level, "trace");
    assert_eq!(
        loaded.config.storage_root(),
        PathBuf::from("/from/options")
    );
}

/// A missing explicit config file is an error, not a silent default.
#[test]
fn missing_config_file_fails() {
    let temp = TempDir::new().expect("tmp");
    let options = LoadOptions {
        config_path: Some(temp.path().join("absent.json5")),
        ..LoadOptions::default()
    };
    let err = DialogConfig::load_with_env(options, env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

/// A file layer that is only valid once env overrides apply still loads.
#[test]
fn file_validated_after_env_overrides() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("dialogs.json5");
    fs::write(&path, r#"{ query: { max_limit: 5 } }"#).expect("write");
    let options = LoadOptions {
        config_path: Some(path.clone()),
        ..LoadOptions::default()
    };

    let loaded = DialogConfig::load_with_env(options.clone(), env(&[(ENV_DEFAULT_LIMIT, "3")]))
        .expect("load");
    assert_eq!(loaded.config.query.default_limit, 3);
    assert_eq!(loaded.config.query.max_limit, Some(5));

    let err = DialogConfig::load_with_env(options, env(&[])).unwrap_err();
    assert!(format!("{err}").contains("query.default_limit"));
    assert!(DialogConfig::load_from_path(&path).is_err());
}
