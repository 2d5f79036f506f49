//! Default configuration values for memory-reader

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub memory: MemoryDefaults,
    pub display: DisplayDefaults,
    pub cache: CacheDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub start_address: u64,
    pub end_address: u64,
    pub chunk_size: u32,
    pub max_results: usize,
    pub max_address: u64,
    pub boundary_overlap: bool,
}

/// Default memory access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub default_read_size: usize,
    pub max_read_size: usize,
    pub max_string_length: usize,
}

/// Default hex dump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayDefaults {
    pub bytes_per_line: usize,
    pub show_ascii: bool,
}

/// Default address cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDefaults {
    pub enabled: bool,
    pub max_entries: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub with_target: bool,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            start_address: 0x10000,
            end_address: 0x7FFF_FFFF,
            chunk_size: 1024 * 1024, // 1MB
            max_results: 100,
            max_address: 0x7FFF_FFFF_FFFF_FFFF,
            boundary_overlap: false,
        },
        memory: MemoryDefaults {
            default_read_size: 1024,
            max_read_size: 10485760, // 10MB
            max_string_length: 256,
        },
        display: DisplayDefaults {
            bytes_per_line: 16,
            show_ascii: true,
        },
        cache: CacheDefaults {
            enabled: true,
            max_entries: 1000,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            with_target: false,
        },
    }
}
