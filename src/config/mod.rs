// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_BACKEND_BASE_URL, DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_MS,
};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Processing backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Status poll cadence in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Connection settings for the processing backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CoreConfig {
    /// Parse YAML with `${VAR_NAME}` environment variable substitution.
    ///
    /// Every referenced variable must be set; an unset variable is a hard
    /// error rather than a silent empty string.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        // Now perform the substitution (we know all vars exist)
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap() // Safe because we checked above
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend.base_url.is_empty() {
            return Err("Backend base_url cannot be empty".to_string());
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(format!(
                "Backend base_url '{}' must start with http:// or https://",
                self.backend.base_url
            ));
        }
        if self.backend.timeout_secs == 0 {
            return Err("Backend timeout_secs must be greater than 0".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
