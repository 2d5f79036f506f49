//! In-memory process image
//!
//! [`SnapshotMemory`] implements [`ProcessMemory`] over a set of sparse
//! mapped regions. Use it to scan a raw memory dump offline, or as a
//! stand-in process in tests.

use super::access::ProcessMemory;
use crate::core::types::{Address, MemoryError, MemoryResult, ModuleInfo};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Sparse memory regions plus a module list
///
/// A read or write must fall entirely inside one region, otherwise it
/// fails with [`MemoryError::Access`] just like an unmapped page would.
#[derive(Debug, Default)]
pub struct SnapshotMemory {
    regions: RwLock<BTreeMap<u64, Vec<u8>>>,
    modules: Vec<ModuleInfo>,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        SnapshotMemory::default()
    }

    /// Load a raw dump file and map it at `base`
    pub fn from_dump_file(path: impl AsRef<Path>, base: Address) -> MemoryResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        info!(path = %path.display(), %base, size = data.len(), "loaded memory dump");
        Ok(SnapshotMemory::new().with_region(base, data))
    }

    /// Builder form of [`add_region`](Self::add_region)
    pub fn with_region(self, base: Address, data: Vec<u8>) -> Self {
        // A fresh lock cannot be poisoned
        if let Ok(mut regions) = self.regions.write() {
            regions.insert(base.as_u64(), data);
        }
        self
    }

    pub fn with_module(mut self, module: ModuleInfo) -> Self {
        self.modules.push(module);
        self
    }

    /// Map `data` at `base`, replacing any region that starts there
    pub fn add_region(&self, base: Address, data: Vec<u8>) -> MemoryResult<()> {
        debug!(%base, size = data.len(), "mapping region");
        self.write_lock(base)?.insert(base.as_u64(), data);
        Ok(())
    }

    pub fn region_count(&self) -> usize {
        self.regions.read().map(|r| r.len()).unwrap_or(0)
    }

    /// A poisoned lock reports as an access failure at the requested address
    fn read_lock(
        &self,
        address: Address,
    ) -> MemoryResult<RwLockReadGuard<'_, BTreeMap<u64, Vec<u8>>>> {
        self.regions
            .read()
            .map_err(|_| MemoryError::access(address, "snapshot lock poisoned"))
    }

    fn write_lock(
        &self,
        address: Address,
    ) -> MemoryResult<RwLockWriteGuard<'_, BTreeMap<u64, Vec<u8>>>> {
        self.regions
            .write()
            .map_err(|_| MemoryError::access(address, "snapshot lock poisoned"))
    }
}

/// Base of the region holding `[address, address + length)` and the offset into it
fn locate(
    regions: &BTreeMap<u64, Vec<u8>>,
    address: Address,
    length: usize,
) -> MemoryResult<(u64, usize)> {
    let start = address.as_u64();
    let end = start
        .checked_add(length as u64)
        .ok_or_else(|| MemoryError::access(address, "range overflows the address space"))?;

    let (&base, data) = regions
        .range(..=start)
        .next_back()
        .ok_or_else(|| MemoryError::access(address, "address not mapped"))?;

    if end > base + data.len() as u64 {
        return Err(MemoryError::access(address, "range not mapped"));
    }
    Ok((base, (start - base) as usize))
}

impl ProcessMemory for SnapshotMemory {
    fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        let regions = self.read_lock(address)?;
        let (base, offset) = locate(&regions, address, length)?;
        let data = regions
            .get(&base)
            .ok_or_else(|| MemoryError::access(address, "address not mapped"))?;
        Ok(data[offset..offset + length].to_vec())
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        let mut regions = self.write_lock(address)?;
        let (base, offset) = locate(&regions, address, data.len())?;
        let region = regions
            .get_mut(&base)
            .ok_or_else(|| MemoryError::access(address, "address not mapped"))?;
        region[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn list_modules(&self) -> MemoryResult<Vec<ModuleInfo>> {
        Ok(self.modules.clone())
    }
}
