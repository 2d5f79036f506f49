//! memory-reader: scanning core for process-memory inspection
//!
//! Searches a process's address space for typed values and wildcard byte
//! patterns, reads and writes single values, follows pointer chains and
//! renders hex dumps. Access to the target process goes through the
//! [`ProcessMemory`] trait.

pub mod config;
pub mod core;
pub mod logging;
pub mod memory;

// Re-export main types from core module
pub use crate::core::types::{
    Address, MemoryError, MemoryResult, MemoryValue, ModuleInfo, ScanRange, ScanResult,
    StringEncoding, ValueType,
};

pub use memory::{
    AddressCache, HexDumpRenderer, Pattern, ProcessMemory, ScanEngine, ScanOptions,
    SnapshotMemory,
};

// Re-export core directly for full access
pub use crate::core::*;
