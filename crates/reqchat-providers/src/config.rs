//! Backend client configuration
//!
//! Handles loading and validating backend configuration from:
//! 1. Environment variables (highest priority)
//! 2. Project config file (.reqchat/config.yaml)
//! 3. Global config file (~/.reqchat/config.yaml)
//! 4. Built-in defaults (lowest priority)

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BackendError;

/// Extraction backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL for the extraction backend (default: http://localhost:8000)
    pub base_url: String,
    /// Request timeout in seconds (default: 900; extraction runs are slow)
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 900,
        }
    }
}

impl BackendConfig {
    /// Load backend configuration with proper precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Project config (.reqchat/config.yaml)
    /// 3. Global config (~/.reqchat/config.yaml)
    /// 4. Built-in defaults (lowest priority)
    pub fn load_with_precedence() -> Result<Self, BackendError> {
        let mut config = Self::default();

        let global_config_path = Self::get_global_config_path();
        if global_config_path.exists() {
            debug!("Loading global backend config from {:?}", global_config_path);
            config.merge_from_file(&global_config_path)?;
        }

        let project_config_path = Self::get_project_config_path();
        if project_config_path.exists() {
            debug!(
                "Loading project backend config from {:?}",
                project_config_path
            );
            config.merge_from_file(&project_config_path)?;
        }

        config.load_from_env();

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Get the global configuration path (~/.reqchat/config.yaml)
    pub fn get_global_config_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".reqchat/config.yaml")
    }

    /// Get the project configuration path (.reqchat/config.yaml)
    pub fn get_project_config_path() -> PathBuf {
        PathBuf::from(".reqchat/config.yaml")
    }

    /// Load configuration from environment variables
    /// Environment variables override any existing configuration
    pub fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("REQCHAT_BACKEND_URL") {
            debug!("Loading REQCHAT_BACKEND_URL from environment: {}", url);
            self.base_url = url;
        }

        if let Ok(timeout_str) = std::env::var("REQCHAT_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                debug!("Loading REQCHAT_TIMEOUT_SECS from environment: {}", timeout);
                self.timeout_secs = timeout;
            } else {
                warn!("Invalid REQCHAT_TIMEOUT_SECS value: {}", timeout_str);
            }
        }
    }

    /// Merge configuration from a YAML file
    /// This preserves existing configuration and only overrides specified values
    pub fn merge_from_file(&mut self, path: &PathBuf) -> Result<(), BackendError> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BackendError::Config(format!("Failed to read backend config file: {}", e))
        })?;

        let file_config: BackendFileConfig = serde_yaml::from_str(&content).map_err(|e| {
            BackendError::Config(format!("Failed to parse backend config file: {}", e))
        })?;

        if let Some(backend) = file_config.backend {
            if let Some(base_url) = backend.base_url {
                self.base_url = base_url;
            }
            if let Some(timeout_secs) = backend.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
        }

        Ok(())
    }

    /// Strip trailing slashes from the base URL so request paths can be
    /// appended verbatim
    pub fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.base_url.is_empty() {
            return Err(BackendError::Config(
                "Backend base URL cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(BackendError::Config(format!(
                "Backend base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(BackendError::Config(
                "Backend timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// YAML file structure for backend configuration
#[derive(Debug, Deserialize)]
struct BackendFileConfig {
    backend: Option<BackendFileSettings>,
}

/// Backend settings from YAML file (all fields optional)
#[derive(Debug, Deserialize)]
struct BackendFileSettings {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}
