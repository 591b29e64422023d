//! Tests for backend configuration loading and validation

use std::sync::Mutex;

use reqchat_providers::{BackendConfig, BackendError};

// Env-mutating tests run in parallel threads; serialize them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn defaults_match_the_local_backend() {
    let config = BackendConfig::default();
    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.timeout_secs, 900);
}

#[test]
fn normalize_trims_trailing_slashes() {
    let mut config = BackendConfig {
        base_url: "http://backend:8000///".to_string(),
        ..BackendConfig::default()
    };
    config.normalize();
    assert_eq!(config.base_url, "http://backend:8000");
}

#[test]
fn normalize_leaves_clean_urls_alone() {
    let mut config = BackendConfig::default();
    config.normalize();
    assert_eq!(config.base_url, "http://localhost:8000");
}

#[test]
fn merge_from_file_overrides_only_present_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend:\n  base_url: http://staging:9000\n").unwrap();

    let mut config = BackendConfig::default();
    config.merge_from_file(&path).unwrap();
    assert_eq!(config.base_url, "http://staging:9000");
    // timeout untouched
    assert_eq!(config.timeout_secs, 900);
}

#[test]
fn merge_from_file_skips_missing_files() {
    let mut config = BackendConfig::default();
    config
        .merge_from_file(&std::path::PathBuf::from("/nonexistent/config.yaml"))
        .unwrap();
    assert_eq!(config, BackendConfig::default());
}

#[test]
fn merge_from_file_rejects_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend: [not: valid").unwrap();

    let mut config = BackendConfig::default();
    let err = config.merge_from_file(&path).unwrap_err();
    assert!(matches!(err, BackendError::Config(_)));
}

#[test]
fn env_overrides_existing_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("REQCHAT_BACKEND_URL", "http://env-backend:7000");
    std::env::set_var("REQCHAT_TIMEOUT_SECS", "120");

    let mut config = BackendConfig::default();
    config.load_from_env();

    std::env::remove_var("REQCHAT_BACKEND_URL");
    std::env::remove_var("REQCHAT_TIMEOUT_SECS");

    assert_eq!(config.base_url, "http://env-backend:7000");
    assert_eq!(config.timeout_secs, 120);
}

#[test]
fn invalid_env_timeout_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("REQCHAT_TIMEOUT_SECS", "not-a-number");

    let mut config = BackendConfig::default();
    config.load_from_env();

    std::env::remove_var("REQCHAT_TIMEOUT_SECS");

    assert_eq!(config.timeout_secs, 900);
}

#[test]
fn validate_rejects_empty_url() {
    let config = BackendConfig {
        base_url: String::new(),
        ..BackendConfig::default()
    };
    assert!(matches!(config.validate(), Err(BackendError::Config(_))));
}

#[test]
fn validate_rejects_non_http_url() {
    let config = BackendConfig {
        base_url: "ftp://backend:8000".to_string(),
        ..BackendConfig::default()
    };
    assert!(matches!(config.validate(), Err(BackendError::Config(_))));
}

#[test]
fn validate_rejects_zero_timeout() {
    let config = BackendConfig {
        timeout_secs: 0,
        ..BackendConfig::default()
    };
    assert!(matches!(config.validate(), Err(BackendError::Config(_))));
}

#[test]
fn validate_accepts_defaults() {
    assert!(BackendConfig::default().validate().is_ok());
}
