//! Configuration module for memory-reader
//!
//! Provides configuration loading, validation, and default settings
//! for the scan engine.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator, LOG_LEVELS};

// Re-export the configuration structures
pub use loader::{CacheConfig, Config, DisplayConfig, LoggingConfig, MemoryConfig, ScannerConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_module_exports() {
        let _config = default_config();
        let _loader = ConfigLoader::new("test.toml");
        let _validator = ConfigValidator;

        let result: ConfigResult<String> = Ok("test".to_string());
        assert!(result.is_ok());

        let error_result: ConfigResult<String> = Err(ConfigError::Invalid("test".to_string()));
        assert!(error_result.is_err());
    }

    #[test]
    fn test_validate_config_export() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    #[cfg_attr(miri, ignore = "miri does not support file I/O")]
    fn test_load_config_export() {
        // Falls back to defaults when memory-reader.toml is absent
        if !std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            assert_eq!(load_config().unwrap(), Config::default());
        }
    }

    #[test]
    fn test_config_error_from_io() {
        use std::io;
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_error: ConfigError = io_error.into();
        assert!(matches!(config_error, ConfigError::Io(_)));
    }
}
