//! Scan range and scan result types

use super::{Address, MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Default first address swept by a search
pub const DEFAULT_SCAN_START: Address = Address(0x10000);
/// Default end (exclusive) of a search
pub const DEFAULT_SCAN_END: Address = Address(0x7FFF_FFFF);
/// Default chunk size, 1 MiB
pub const DEFAULT_CHUNK_SIZE: u32 = 1024 * 1024;
/// Default result cap
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// The `[start, end)` interval swept by a search, read `chunk_size` bytes at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanRange {
    start: Address,
    end: Address,
    chunk_size: u32,
}

impl ScanRange {
    /// Creates a range, rejecting `start >= end` and a zero chunk size
    pub fn new(start: Address, end: Address, chunk_size: u32) -> MemoryResult<Self> {
        if start >= end {
            return Err(MemoryError::invalid_argument(format!(
                "empty scan range: start {} is not below end {}",
                start, end
            )));
        }
        if chunk_size == 0 {
            return Err(MemoryError::invalid_argument(
                "chunk size must be greater than 0",
            ));
        }
        Ok(ScanRange {
            start,
            end,
            chunk_size,
        })
    }

    /// Range covering `size` bytes from `base`, with the default chunk size
    pub fn from_base_and_size(base: Address, size: u64) -> MemoryResult<Self> {
        Self::new(base, base.add(size), DEFAULT_CHUNK_SIZE)
    }

    /// Same bounds with a different chunk size
    pub fn with_chunk_size(self, chunk_size: u32) -> MemoryResult<Self> {
        Self::new(self.start, self.end, chunk_size)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Number of bytes covered by the range
    pub fn len(&self) -> u64 {
        self.end.0 - self.start.0
    }

    /// Always false: a constructed range is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of chunks the walker will attempt
    pub fn chunk_count(&self) -> u64 {
        self.len().div_ceil(u64::from(self.chunk_size))
    }

    /// Checks whether an address lies inside the range
    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }
}

impl Default for ScanRange {
    fn default() -> Self {
        ScanRange {
            start: DEFAULT_SCAN_START,
            end: DEFAULT_SCAN_END,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Addresses found by one search, in discovery order, plus walk statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub addresses: Vec<Address>,
    /// Chunks successfully read and matched
    pub chunks_scanned: u64,
    /// Chunks skipped because the read failed
    pub chunks_skipped: u64,
    /// The result cap was reached and the walk stopped early
    pub limit_reached: bool,
    /// The caller's cancellation check fired
    pub cancelled: bool,
}

impl ScanResult {
    /// Creates an empty result
    pub fn new() -> Self {
        ScanResult::default()
    }

    /// Consumes the result, keeping only the addresses
    pub fn into_addresses(self) -> Vec<Address> {
        self.addresses
    }

    /// First address found, if any
    pub fn first(&self) -> Option<Address> {
        self.addresses.first().copied()
    }
}

impl Deref for ScanResult {
    type Target = [Address];

    fn deref(&self) -> &Self::Target {
        &self.addresses
    }
}

impl IntoIterator for ScanResult {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}
