//! Configuration loader for memory-reader
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File read by [`load_config`]
pub const DEFAULT_CONFIG_FILE: &str = "memory-reader.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scanner")]
    pub scanner: ScannerConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_display")]
    pub display: DisplayConfig,

    #[serde(default = "default_cache")]
    pub cache: CacheConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_start_address")]
    pub start_address: u64,
    #[serde(default = "default_end_address")]
    pub end_address: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Exclusive upper bound for valid addresses
    #[serde(default = "default_max_address")]
    pub max_address: u64,
    #[serde(default = "default_boundary_overlap")]
    pub boundary_overlap: bool,
}

/// Memory access configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_read_size")]
    pub default_read_size: usize,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default = "default_max_string_length")]
    pub max_string_length: usize,
}

/// Hex dump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_bytes_per_line")]
    pub bytes_per_line: usize,
    #[serde(default = "default_show_ascii")]
    pub show_ascii: bool,
}

/// Address cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        debug!(path = %self.config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads configuration or returns defaults if file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            debug!(path = %self.config_path.display(), error = %e, "using default configuration");
            Config::default()
        })
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
///
/// A missing file yields the defaults; a file that exists but does not
/// parse is an error.
pub fn load_config() -> Result<Config, ConfigError> {
    let loader = ConfigLoader::new(DEFAULT_CONFIG_FILE);
    match loader.load() {
        Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
        other => other,
    }
}

// Default functions for serde
fn default_scanner() -> ScannerConfig {
    let defaults = default_config().scanner;
    ScannerConfig {
        start_address: defaults.start_address,
        end_address: defaults.end_address,
        chunk_size: defaults.chunk_size,
        max_results: defaults.max_results,
        max_address: defaults.max_address,
        boundary_overlap: defaults.boundary_overlap,
    }
}

fn default_memory() -> MemoryConfig {
    let defaults = default_config().memory;
    MemoryConfig {
        default_read_size: defaults.default_read_size,
        max_read_size: defaults.max_read_size,
        max_string_length: defaults.max_string_length,
    }
}

fn default_display() -> DisplayConfig {
    let defaults = default_config().display;
    DisplayConfig {
        bytes_per_line: defaults.bytes_per_line,
        show_ascii: defaults.show_ascii,
    }
}

fn default_cache() -> CacheConfig {
    let defaults = default_config().cache;
    CacheConfig {
        enabled: defaults.enabled,
        max_entries: defaults.max_entries,
    }
}

fn default_logging() -> LoggingConfig {
    let defaults = default_config().logging;
    LoggingConfig {
        level: defaults.level,
        with_target: defaults.with_target,
    }
}

// Individual field defaults
fn default_start_address() -> u64 {
    default_config().scanner.start_address
}

fn default_end_address() -> u64 {
    default_config().scanner.end_address
}

fn default_chunk_size() -> u32 {
    default_config().scanner.chunk_size
}

fn default_max_results() -> usize {
    default_config().scanner.max_results
}

fn default_max_address() -> u64 {
    default_config().scanner.max_address
}

fn default_boundary_overlap() -> bool {
    default_config().scanner.boundary_overlap
}

fn default_read_size() -> usize {
    default_config().memory.default_read_size
}

fn default_max_read_size() -> usize {
    default_config().memory.max_read_size
}

fn default_max_string_length() -> usize {
    default_config().memory.max_string_length
}

fn default_bytes_per_line() -> usize {
    default_config().display.bytes_per_line
}

fn default_show_ascii() -> bool {
    default_config().display.show_ascii
}

fn default_cache_enabled() -> bool {
    default_config().cache.enabled
}

fn default_cache_max_entries() -> usize {
    default_config().cache.max_entries
}

fn default_log_level() -> String {
    default_config().logging.level
}

fn default_with_target() -> bool {
    default_config().logging.with_target
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scanner: default_scanner(),
            memory: default_memory(),
            display: default_display(),
            cache: default_cache(),
            logging: default_logging(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        default_scanner()
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        default_memory()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        default_display()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        default_cache()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        default_logging()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scanner.start_address, 0x10000);
        assert_eq!(config.scanner.chunk_size, 1024 * 1024);
        assert_eq!(config.display.bytes_per_line, 16);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let result = loader.load();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_or_default() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let config = loader.load_or_default();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "miri does not support file I/O")]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.scanner.boundary_overlap = true;
        config.display.show_ascii = false;
        let loader = ConfigLoader::new(&config_path);

        loader.save(&config).unwrap();
        assert!(config_path.exists());

        let loaded = loader.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
            [scanner]
            start_address = 0x400000
            chunk_size = 4096

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scanner.start_address, 0x400000);
        assert_eq!(config.scanner.chunk_size, 4096);
        assert_eq!(config.logging.level, "debug");
        // Check defaults are applied
        assert_eq!(config.scanner.end_address, 0x7FFF_FFFF);
        assert_eq!(config.scanner.max_results, 100);
        assert_eq!(config.memory.max_read_size, 10485760);
        assert!(config.cache.enabled);
    }

    #[test]
    #[cfg_attr(miri, ignore = "miri does not support file I/O")]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[scanner\nchunk_size = ").unwrap();

        let result = ConfigLoader::new(&config_path).load();
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
