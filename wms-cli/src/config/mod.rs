//! Configuration for the import CLI
//!
//! Settings come from `<config dir>/wms-cli/config.toml` when it exists, then
//! environment variables override individual values. A `.env` file is loaded
//! into the environment before this runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

pub const ENV_API_URL: &str = "WMS_API_URL";
pub const ENV_API_TOKEN: &str = "WMS_API_TOKEN";
pub const ENV_IMPORT_PATH: &str = "WMS_IMPORT_PATH";
pub const ENV_TIMEOUT_SECS: &str = "WMS_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetrySettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub import_path: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            import_path: "/api/orders/bulk-import".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Full URL of the bulk-import endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.import_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wms-cli").join("config.toml"))
    }

    /// Load from the default path (if present) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// A zero timeout would make reqwest fail every request immediately
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1 second");
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty(ENV_API_TOKEN) {
            self.api.token = Some(token);
        }
        if let Some(path) = non_empty(ENV_IMPORT_PATH) {
            self.api.import_path = path;
        }
        if let Some(timeout) = non_empty(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
            if self.api.timeout_secs == 0 {
                anyhow::bail!("{} must be at least 1 second", ENV_TIMEOUT_SECS);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [api]
            base_url = "https://wms.example.com"

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://wms.example.com");
        assert_eq!(config.api.import_path, "/api/orders/bulk-import");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
        assert!(config.retry.jitter);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://staging.example.com/"),
            (ENV_API_TOKEN, "secret"),
            (ENV_TIMEOUT_SECS, " 5 "),
            (ENV_IMPORT_PATH, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(
            config.api.endpoint(),
            "https://staging.example.com/api/orders/bulk-import"
        );
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "0".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("at least 1"), "{err}");

        let err = Config::from_toml_str("[api]\ntimeout_secs = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("at least 1"), "{err:#}");
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let api = ApiConfig {
            base_url: "http://wms:9000".into(),
            import_path: "orders/import".into(),
            ..ApiConfig::default()
        };
        assert_eq!(api.endpoint(), "http://wms:9000/orders/import");
    }
}
