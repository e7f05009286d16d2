//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber for binaries
//! - Pick the log level from the environment or the config
//!
//! # Design Decisions
//! - Pretty format by default, JSON when configured

use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::schema::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Build the level filter: `RUST_LOG` wins over `config.log_level`.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.log_level)?),
    }
}

/// Install the global subscriber. Call once per process.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(config.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.json).then(|| tracing_subscriber::fmt::layer()))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ObservabilityConfig {
            log_level: "route_transit=verbose".to_string(),
            json: false,
        };
        assert!(matches!(env_filter(&config), Err(LoggingError::Filter(_))));
    }

    #[test]
    fn test_default_level_parses() {
        assert!(env_filter(&ObservabilityConfig::default()).is_ok());
    }
}
