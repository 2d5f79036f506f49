//! Memory operations: scanning, value encoding and dumping
//!
//! This module provides:
//! - The [`ProcessMemory`] access primitive and an in-memory implementation
//! - Byte encoding of typed values
//! - Wildcard byte patterns and sliding-window matching
//! - Chunked sweeps over large address ranges
//! - The [`ScanEngine`] tying those together, plus hex dump rendering

pub mod access;
pub mod cache;
pub mod codec;
pub mod hexdump;
pub mod matcher;
pub mod pattern;
pub mod scanner;
pub mod snapshot;
pub mod walker;

pub use access::ProcessMemory;
pub use cache::AddressCache;
pub use hexdump::HexDumpRenderer;
pub use matcher::{find_all, find_first};
pub use pattern::{Pattern, PatternByte};
pub use scanner::{ScanEngine, ScanOptions};
pub use snapshot::SnapshotMemory;
pub use walker::{Chunk, ChunkedRegionWalker, WalkSignal, WalkStats};
