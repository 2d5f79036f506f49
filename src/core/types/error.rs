//! Custom error types for memory-reader

use std::fmt;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid pattern format: {0}")]
    MalformedPattern(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid memory address: {0}")]
    AddressInvalid(String),

    #[error("Cannot access memory at {address}: {reason}")]
    Access { address: String, reason: String },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Pointer chain broken at level {level}: {reason}")]
    PointerChainBroken { level: usize, reason: String },

    #[error("Read of {requested} bytes exceeds the limit of {limit} bytes")]
    ReadTooLarge { requested: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an access error for an address
    pub fn access(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::Access {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a pointer chain broken error
    pub fn pointer_chain_broken(level: usize, reason: impl Into<String>) -> Self {
        MemoryError::PointerChainBroken {
            level,
            reason: reason.into(),
        }
    }

    /// Creates an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MemoryError::InvalidArgument(reason.into())
    }

    /// Whether the error came from the memory access primitive
    pub fn is_access(&self) -> bool {
        matches!(self, MemoryError::Access { .. })
    }
}
