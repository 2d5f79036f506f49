//! Core module containing fundamental types for memory-reader
//!
//! This module provides the foundational building blocks used throughout
//! the crate, including address handling, memory values, scan ranges and
//! results, module descriptors, and error types.

pub mod types;

pub use types::{
    Address, MemoryError, MemoryResult, MemoryValue, ModuleInfo, ScanRange, ScanResult,
    StringEncoding, ValueType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
