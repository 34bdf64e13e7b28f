//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; API keys and the predictor URL
//! can only be supplied (or overridden) through the environment.
//!
//! # Example
//!
//! ```no_run
//! use pantry::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analytics::AnalyticsConfig;
use super::assistant::AssistantConfig;
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::predictor::PredictorConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `predictor.url`.
pub const PREDICTOR_URL_VAR: &str = "PANTRY_PREDICTOR_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// When unset, the CLI uses `~/.pantry/pantry.db`.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Demand model endpoint.
    #[serde(default)]
    pub predictor: PredictorConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Parse configuration from TOML content and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(PREDICTOR_URL_VAR) {
            if !url.trim().is_empty() {
                config.predictor.url = Some(url);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if let Some(database) = &self.database {
            if database.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "database",
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }

        let llm = self.llm.active();
        if llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "llm.model" }.into());
        }
        if llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature",
                reason: "must be between 0 and 2".to_string(),
            }
            .into());
        }

        if self.assistant.transaction_context == 0 {
            return Err(ConfigError::InvalidValue {
                field: "assistant.transaction_context",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.predictor.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "predictor.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.analytics.most_wasted_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analytics.most_wasted_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.analytics.expiring_within_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analytics.expiring_within_days",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::llm::LlmProvider;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        config.validate().unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.active().model, "gpt-4o-mini");
        assert!(config.assistant.enabled);
        assert_eq!(config.assistant.transaction_context, 20);
        assert_eq!(config.predictor.timeout_secs, 10);
        assert_eq!(config.analytics.most_wasted_limit, 10);
        assert_eq!(config.analytics.expiring_within_days, 7);
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
database = "/tmp/kitchen.db"

[llm]
provider = "anthropic"

[llm.anthropic]
temperature = 0.1

[analytics]
most_wasted_limit = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.database.as_deref(), Some("/tmp/kitchen.db"));
        let active = config.llm.active();
        assert_eq!(active.model, "claude-sonnet-4-5");
        assert!((active.temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.analytics.most_wasted_limit, 5);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config: Config = toml::from_str("[analytics]\nmost_wasted_limit = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "analytics.most_wasted_limit",
                ..
            })
        ));
    }

    #[test]
    fn zero_expiry_window_is_rejected() {
        let config: Config = toml::from_str("[analytics]\nexpiring_within_days = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let config: Config = toml::from_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse_toml("database = [").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
