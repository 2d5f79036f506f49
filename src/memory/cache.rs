//! Bounded history of interesting addresses

use crate::config::CacheConfig;
use crate::core::types::Address;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Default number of remembered addresses
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Insertion-ordered set of addresses with a fixed capacity
///
/// Recording a new address into a full cache evicts the oldest one.
/// Recording an address already present is a no-op and does not refresh
/// its position.
#[derive(Debug, Clone)]
pub struct AddressCache {
    order: VecDeque<Address>,
    members: HashSet<Address>,
    capacity: usize,
}

impl Default for AddressCache {
    fn default() -> Self {
        AddressCache::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl AddressCache {
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        AddressCache {
            order: VecDeque::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
            members: HashSet::new(),
            capacity,
        }
    }

    /// `None` when caching is disabled in the configuration
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config.enabled.then(|| AddressCache::new(config.max_entries))
    }

    /// Remember `address`; returns false if it was already present
    pub fn record(&mut self, address: Address) -> bool {
        if self.members.contains(&address) {
            return false;
        }

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
                trace!(address = %oldest, "evicted from address cache");
            }
        }

        self.order.push_back(address);
        self.members.insert(address);
        true
    }

    /// Record every address yielded, in order
    pub fn extend<I>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = Address>,
    {
        for address in addresses {
            self.record(address);
        }
    }

    pub fn contains(&self, address: Address) -> bool {
        self.members.contains(&address)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}
