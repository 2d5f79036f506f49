//! Loaded module descriptors reported by the memory access backend

use super::Address;
use serde::{Deserialize, Serialize};

/// A module mapped into the target process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub base_address: Address,
    pub size: u32,
}

impl ModuleInfo {
    /// Creates a new module descriptor
    pub fn new(name: impl Into<String>, base_address: Address, size: u32) -> Self {
        ModuleInfo {
            name: name.into(),
            base_address,
            size,
        }
    }

    /// First address past the end of the module image
    pub fn end_address(&self) -> Address {
        self.base_address.add(u64::from(self.size))
    }

    /// Checks if an address falls within this module
    pub fn contains_address(&self, address: Address) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Case-insensitive name comparison, as module names are on Windows
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
