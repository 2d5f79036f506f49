//! Process memory access primitives
//!
//! The scanner never talks to the operating system directly. Whatever owns
//! the attached process handle implements [`ProcessMemory`] and the rest of
//! the crate works against that trait.

use crate::core::types::{Address, MemoryResult, ModuleInfo};

/// Raw access to the memory of one attached process
///
/// Implementations must report an unmapped, protected or vanished region
/// as [`MemoryError::Access`](crate::core::types::MemoryError::Access).
/// Reads are expected to be safe to issue concurrently.
pub trait ProcessMemory {
    /// Read exactly `length` bytes starting at `address`
    fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>>;

    /// Write all of `data` starting at `address`
    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()>;

    /// List the modules mapped into the process
    fn list_modules(&self) -> MemoryResult<Vec<ModuleInfo>>;
}

impl<T: ProcessMemory + ?Sized> ProcessMemory for &T {
    fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        (**self).read_bytes(address, length)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        (**self).write_bytes(address, data)
    }

    fn list_modules(&self) -> MemoryResult<Vec<ModuleInfo>> {
        (**self).list_modules()
    }
}

impl<T: ProcessMemory + ?Sized> ProcessMemory for Box<T> {
    fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        (**self).read_bytes(address, length)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        (**self).write_bytes(address, data)
    }

    fn list_modules(&self) -> MemoryResult<Vec<ModuleInfo>> {
        (**self).list_modules()
    }
}
