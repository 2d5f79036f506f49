//! Memory address wrapper type with hex parsing and validation

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound (exclusive) for addresses considered valid by default
pub const DEFAULT_MAX_ADDRESS: Address = Address(0x7FFF_FFFF_FFFF_FFFF);

/// Represents an address in the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Checks `0 < address < max`
    pub const fn is_valid(&self, max: Address) -> bool {
        self.0 > 0 && self.0 < max.0
    }

    /// Validates the address against `max`, returning it unchanged when valid
    pub fn validate(self, max: Address) -> MemoryResult<Self> {
        if self.is_valid(max) {
            Ok(self)
        } else {
            Err(MemoryError::AddressInvalid(format!(
                "{} is outside (0x0, {})",
                self, max
            )))
        }
    }

    /// Adds an unsigned offset, saturating at `u64::MAX`
    pub const fn add(&self, offset: u64) -> Self {
        Address(self.0.saturating_add(offset))
    }

    /// Adds a signed offset, wrapping on overflow
    pub const fn offset(&self, offset: i64) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Distance from `base` to this address, if this address is not below it
    pub const fn distance_from(&self, base: Address) -> Option<u64> {
        self.0.checked_sub(base.0)
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if let Some(hex) = s.strip_prefix('$') {
            u64::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            u64::from_str_radix(s, 16)
        } else {
            s.parse::<u64>()
        };

        value
            .map(Address::new)
            .map_err(|_| MemoryError::AddressInvalid(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<Address> for u64 {
    fn from(address: Address) -> Self {
        address.0
    }
}
