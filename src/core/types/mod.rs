//! Core type definitions for memory-reader
//!
//! Addresses, typed values, module descriptors, scan ranges and results,
//! and the error type shared by every operation.

mod address;
mod error;
mod module_info;
mod scan_result;
mod value;

pub use address::{Address, DEFAULT_MAX_ADDRESS};
pub use error::{MemoryError, MemoryResult};
pub use module_info::ModuleInfo;
pub use scan_result::{
    ScanRange, ScanResult, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESULTS, DEFAULT_SCAN_END,
    DEFAULT_SCAN_START,
};
pub use value::{MemoryValue, StringEncoding, ValueType};
