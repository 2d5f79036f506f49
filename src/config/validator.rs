//! Configuration validator for memory-reader
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{CacheConfig, Config, ConfigError, DisplayConfig, LoggingConfig, MemoryConfig, ScannerConfig};
use tracing::warn;

/// Accepted `logging.level` values
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Upper bound for `display.bytes_per_line`
pub const MAX_BYTES_PER_LINE: usize = 64;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_scanner(&config.scanner)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_display(&config.display)?;
        Self::validate_cache(&config.cache)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates scanner configuration
    fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        if scanner.start_address >= scanner.end_address {
            return Err(ConfigError::Invalid(format!(
                "Scan start address 0x{:X} must be below end address 0x{:X}",
                scanner.start_address, scanner.end_address
            )));
        }

        if scanner.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "Chunk size must be greater than 0".to_string(),
            ));
        }

        if scanner.max_results == 0 {
            return Err(ConfigError::Invalid(
                "Maximum results must be at least 1".to_string(),
            ));
        }

        if scanner.end_address > scanner.max_address {
            warn!(
                end = scanner.end_address,
                max = scanner.max_address,
                "scan range extends past the maximum valid address"
            );
        }

        Ok(())
    }

    /// Validates memory configuration
    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_read_size == 0 {
            return Err(ConfigError::Invalid(
                "Maximum read size must be greater than 0".to_string(),
            ));
        }

        if memory.default_read_size > memory.max_read_size {
            return Err(ConfigError::Invalid(format!(
                "Default read size {} exceeds maximum read size {}",
                memory.default_read_size, memory.max_read_size
            )));
        }

        // Very large reads are allowed but usually a mistake (>100MB)
        if memory.max_read_size > 104857600 {
            warn!(max_read_size = memory.max_read_size, "maximum read size exceeds 100MB");
        }

        Ok(())
    }

    /// Validates hex dump configuration
    fn validate_display(display: &DisplayConfig) -> Result<(), ConfigError> {
        if display.bytes_per_line == 0 || display.bytes_per_line > MAX_BYTES_PER_LINE {
            return Err(ConfigError::Invalid(format!(
                "Bytes per line must be between 1 and {}",
                MAX_BYTES_PER_LINE
            )));
        }
        Ok(())
    }

    /// Validates cache configuration
    fn validate_cache(cache: &CacheConfig) -> Result<(), ConfigError> {
        if cache.enabled && cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "Cache max entries must be at least 1 when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, LOG_LEVELS
            )));
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
