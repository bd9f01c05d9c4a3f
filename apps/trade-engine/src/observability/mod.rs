//! Observability module for structured logging.
//!
//! Logging goes through `tracing`; this module installs the subscriber.
//! `RUST_LOG` takes precedence over the configured level. Logs go to stderr
//! so the binary's stdout stays machine-readable.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Errors installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TracingInitError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log level '{level}': {message}")]
    InvalidLevel {
        /// Configured level.
        level: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("Tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingInitError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TracingInitError::InvalidLevel {
        level: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingInitError> {
    let filter = build_env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| TracingInitError::AlreadyInstalled(e.to_string()))
}
