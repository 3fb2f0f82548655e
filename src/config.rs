//! Configuration loaded from drift_harness.toml and environment variables

use serde::{Deserialize, Serialize};

/// Main configuration structure. File values are env-overridable; secrets
/// live only in [`RuntimeConfig`] and never in the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Inference-service parameters. Model and endpoint are opaque strings
/// passed through to the service unmodified.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub model: String,
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_ms: 60_000,
            max_output_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            log_level: "drift_harness=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    fn load_from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(level) = std::env::var("DRIFT_LOG") {
            config.log_level = level;
        }
        config
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses DRIFT_HARNESS_CONFIG or defaults to "drift_harness.toml".
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("DRIFT_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("DRIFT_HARNESS_CONFIG")
            .unwrap_or_else(|_| "drift_harness.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Env-first overrides
        if let Ok(model) = std::env::var("DRIFT_MODEL") {
            config.system.model = model;
        }
        if let Ok(endpoint) = std::env::var("DRIFT_ENDPOINT") {
            config.system.endpoint = endpoint;
        }
        if let Some(timeout_ms) = std::env::var("DRIFT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.system.request_timeout_ms = timeout_ms;
        }

        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.system.model.is_empty() {
            anyhow::bail!("model must not be empty");
        }
        if !self.system.endpoint.starts_with("http://")
            && !self.system.endpoint.starts_with("https://")
        {
            anyhow::bail!(
                "endpoint '{}' must start with http:// or https://",
                self.system.endpoint
            );
        }
        if self.system.request_timeout_ms == 0 {
            anyhow::bail!("request_timeout_ms must be > 0");
        }
        if !(0.0..=2.0).contains(&self.system.temperature) {
            anyhow::bail!("temperature must be between 0.0 and 2.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn bad_endpoint_rejected() {
        let mut config = Config::default();
        config.system.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_parse() {
        let config: Config = toml::from_str(
            r#"
            [system]
            model = "gemini-2.5-pro"
            request_timeout_ms = 30000
            "#,
        )
        .unwrap();
        assert_eq!(config.system.model, "gemini-2.5-pro");
        assert_eq!(config.system.request_timeout_ms, 30_000);
        // untouched fields keep defaults
        assert_eq!(config.system.max_output_tokens, 1024);
    }
}
