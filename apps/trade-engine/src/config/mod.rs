//! Configuration module for the trade engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the engine components.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("risk-free rate: {}", config.pricing.risk_free_rate);
//! ```

mod aggregation;
mod ingestion;
mod observability;
mod pricing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use aggregation::AggregationConfig;
pub use ingestion::IngestionConfig;
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pricing model configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Trade aggregation configuration.
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Ingestion queue configuration.
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let pricing = &config.pricing;
    if !(0.0..=1.0).contains(&pricing.risk_free_rate) {
        return Err(ConfigError::ValidationError(
            "risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if pricing.iv_tolerance <= 0.0 || !pricing.iv_tolerance.is_finite() {
        return Err(ConfigError::ValidationError(
            "iv_tolerance must be positive".to_string(),
        ));
    }

    if pricing.iv_max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "iv_max_iterations must be at least 1".to_string(),
        ));
    }

    if pricing
        .default_historical_volatility
        .is_some_and(|hv| hv <= 0.0 || !hv.is_finite())
    {
        return Err(ConfigError::ValidationError(
            "default_historical_volatility must be positive".to_string(),
        ));
    }

    if config.aggregation.adjustment_window_minutes < 0 {
        return Err(ConfigError::ValidationError(
            "adjustment_window_minutes must not be negative".to_string(),
        ));
    }

    if config.aggregation.bond_lot_size == 0 {
        return Err(ConfigError::ValidationError(
            "bond_lot_size must be positive".to_string(),
        ));
    }

    if config.ingestion.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "queue_capacity must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::pricing::GreeksModel;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!((config.pricing.risk_free_rate - 0.0175).abs() < f64::EPSILON);
        assert_eq!(config.pricing.iv_max_iterations, 100);
        assert_eq!(config.aggregation.adjustment_window_minutes, 10);
        assert_eq!(config.aggregation.bond_lot_size, 1000);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert_eq!(config.pricing.greeks_model(), None);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert!((config.pricing.iv_tolerance - 1e-4).abs() < f64::EPSILON);
        assert_eq!(config.ingestion.queue_capacity, 1024);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${TRADE_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-debug}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "level: debug");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${TRADE_ENGINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "level: ");
    }

    #[test]
    fn test_validation_invalid_risk_free_rate() {
        let yaml = r"
pricing:
  risk_free_rate: 1.5
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid risk_free_rate");
        };
        assert!(err.to_string().contains("risk_free_rate"));
    }

    #[test]
    fn test_validation_zero_lot_size() {
        let yaml = r"
aggregation:
  bond_lot_size: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for bond_lot_size");
        };
        assert!(err.to_string().contains("bond_lot_size"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
pricing:
  risk_free_rate: 0.04
  iv_tolerance: 0.00001
  iv_max_iterations: 50
  default_historical_volatility: 0.3

aggregation:
  adjustment_window_minutes: 5
  bond_lot_size: 100

ingestion:
  queue_capacity: 16

observability:
  logging:
    level: "${TRADE_ENGINE_CONFIG_TEST_LEVEL:-debug}"
    format: "pretty"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert!((config.pricing.risk_free_rate - 0.04).abs() < f64::EPSILON);
        assert_eq!(config.pricing.solver_config().max_iterations, 50);
        assert_eq!(config.pricing.default_historical_volatility, Some(0.3));
        assert_eq!(
            config.pricing.greeks_model(),
            Some(GreeksModel::new(0.3, 0.04))
        );
        assert_eq!(config.aggregation.adjustment_window_minutes, 5);
        assert_eq!(config.ingestion.queue_capacity, 16);
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "aggregation:\n  adjustment_window_minutes: 15").unwrap();

        let path = file.path().to_str().unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.aggregation.adjustment_window_minutes, 15);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let Err(err) = load_config(Some("/nonexistent/trade-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
