//! Tracing subscriber setup

use crate::config::{ConfigError, ConfigResult, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber for `config`
///
/// `RUST_LOG` takes precedence over `config.level` when it is set. Only
/// one subscriber can be installed per process; later calls return
/// [`ConfigError::Invalid`].
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ConfigError::Invalid(format!("log level '{}': {}", config.level, e)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .map_err(|e| ConfigError::Invalid(format!("logging already initialized: {}", e)))
}
