//! Chunked sweep over an address range
//!
//! The range is cut into `chunk_size` windows, each read with one call to
//! the access primitive. Unreadable windows are skipped and the sweep goes
//! on: large address spaces are mostly unmapped, so a failed read is an
//! expected outcome rather than an error.

use super::access::ProcessMemory;
use crate::core::types::{Address, ScanRange};
use tracing::{debug, trace};

/// Chunks between two progress log lines
const PROGRESS_INTERVAL: u64 = 100;

/// What the visitor wants the walker to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkSignal {
    Continue,
    StopEarly,
}

/// One successfully read chunk
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'d> {
    /// Absolute address of `data[0]`
    pub start: Address,
    /// Bytes read; may extend past the chunk into the next one when an
    /// overlap is configured
    pub data: &'d [u8],
    /// Length of the chunk proper; offsets at or past this belong to the
    /// next chunk
    pub len: usize,
}

impl Chunk<'_> {
    /// Whether a match starting at `offset` belongs to this chunk
    pub fn owns_offset(&self, offset: usize) -> bool {
        offset < self.len
    }
}

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub chunks_read: u64,
    pub chunks_skipped: u64,
    pub stopped_early: bool,
    pub cancelled: bool,
}

impl WalkStats {
    pub fn chunks_attempted(&self) -> u64 {
        self.chunks_read + self.chunks_skipped
    }
}

/// Walks a [`ScanRange`] chunk by chunk through a [`ProcessMemory`]
pub struct ChunkedRegionWalker<'a, P: ProcessMemory + ?Sized> {
    memory: &'a P,
    overlap: usize,
}

impl<'a, P: ProcessMemory + ?Sized> ChunkedRegionWalker<'a, P> {
    pub fn new(memory: &'a P) -> Self {
        ChunkedRegionWalker { memory, overlap: 0 }
    }

    /// Read `overlap` extra bytes past each chunk (clamped to the range end)
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Walk the whole range
    pub fn walk<F>(&self, range: &ScanRange, visit: F) -> WalkStats
    where
        F: FnMut(&Chunk<'_>) -> WalkSignal,
    {
        self.walk_cancellable(range, &|| false, visit)
    }

    /// Walk the range, checking `cancel` before every chunk
    pub fn walk_cancellable<F>(
        &self,
        range: &ScanRange,
        cancel: &dyn Fn() -> bool,
        mut visit: F,
    ) -> WalkStats
    where
        F: FnMut(&Chunk<'_>) -> WalkSignal,
    {
        let chunk_size = u64::from(range.chunk_size());
        let mut stats = WalkStats::default();
        let mut current = range.start();

        while current < range.end() {
            if cancel() {
                stats.cancelled = true;
                break;
            }

            let remaining = range.end().as_u64() - current.as_u64();
            let len = chunk_size.min(remaining);

            match self.read_chunk(current, len, remaining) {
                Some(data) => {
                    stats.chunks_read += 1;
                    let chunk = Chunk {
                        start: current,
                        data: &data,
                        len: len as usize,
                    };
                    if visit(&chunk) == WalkSignal::StopEarly {
                        stats.stopped_early = true;
                        break;
                    }
                }
                None => stats.chunks_skipped += 1,
            }

            if stats.chunks_attempted() % PROGRESS_INTERVAL == 0 {
                debug!(
                    address = %current,
                    read = stats.chunks_read,
                    skipped = stats.chunks_skipped,
                    "scan progress"
                );
            }

            // Saturates at u64::MAX, which is never below `end`
            current = current.add(chunk_size);
        }

        stats
    }

    fn read_chunk(&self, address: Address, len: u64, remaining: u64) -> Option<Vec<u8>> {
        let extended = len.saturating_add(self.overlap as u64).min(remaining);

        if extended > len {
            match self.memory.read_bytes(address, extended as usize) {
                Ok(data) => return Some(data),
                Err(e) => trace!(%address, error = %e, "overlapping read failed, retrying plain chunk"),
            }
        }

        match self.memory.read_bytes(address, len as usize) {
            Ok(data) => Some(data),
            Err(e) => {
                trace!(%address, len, error = %e, "chunk unreadable, skipping");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MemoryError, MemoryResult, ModuleInfo};
    use std::cell::RefCell;

    /// Every read succeeds except those starting inside `holes`; reads are logged
    struct Recorder {
        holes: Vec<(u64, u64)>,
        reads: RefCell<Vec<(u64, usize)>>,
    }

    impl Recorder {
        fn new(holes: Vec<(u64, u64)>) -> Self {
            Recorder {
                holes,
                reads: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessMemory for Recorder {
        fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
            self.reads.borrow_mut().push((address.as_u64(), length));
            let end = address.as_u64() + length as u64;
            if self
                .holes
                .iter()
                .any(|&(lo, hi)| address.as_u64() < hi && end > lo)
            {
                return Err(MemoryError::access(address, "unmapped"));
            }
            Ok(vec![0u8; length])
        }

        fn write_bytes(&self, address: Address, _data: &[u8]) -> MemoryResult<()> {
            Err(MemoryError::access(address, "read only"))
        }

        fn list_modules(&self) -> MemoryResult<Vec<ModuleInfo>> {
            Ok(Vec::new())
        }
    }

    fn range(start: u64, end: u64, chunk: u32) -> ScanRange {
        ScanRange::new(Address::new(start), Address::new(end), chunk).unwrap()
    }

    #[test]
    fn test_walk_covers_range_with_clamped_last_chunk() {
        let memory = Recorder::new(vec![]);
        let mut visited = Vec::new();

        let stats = ChunkedRegionWalker::new(&memory).walk(&range(0x1000, 0x3800, 0x1000), |c| {
            visited.push((c.start.as_u64(), c.data.len()));
            WalkSignal::Continue
        });

        assert_eq!(
            visited,
            vec![(0x1000, 0x1000), (0x2000, 0x1000), (0x3000, 0x800)]
        );
        assert_eq!(stats.chunks_read, 3);
        assert_eq!(stats.chunks_skipped, 0);
        assert!(!stats.stopped_early);
    }

    #[test]
    fn test_walk_skips_unreadable_chunks() {
        let memory = Recorder::new(vec![(0x2000, 0x3000)]);
        let mut visited = Vec::new();

        let stats = ChunkedRegionWalker::new(&memory).walk(&range(0x1000, 0x4000, 0x1000), |c| {
            visited.push(c.start.as_u64());
            WalkSignal::Continue
        });

        assert_eq!(visited, vec![0x1000, 0x3000]);
        assert_eq!(stats.chunks_skipped, 1);
        assert_eq!(memory.reads.borrow().len(), 3);
    }

    #[test]
    fn test_walk_stops_early() {
        let memory = Recorder::new(vec![]);
        let mut count = 0;

        let stats = ChunkedRegionWalker::new(&memory).walk(&range(0, 0x10000, 0x1000), |_| {
            count += 1;
            if count == 2 {
                WalkSignal::StopEarly
            } else {
                WalkSignal::Continue
            }
        });

        assert_eq!(count, 2);
        assert!(stats.stopped_early);
        assert_eq!(memory.reads.borrow().len(), 2);
    }

    #[test]
    fn test_walk_cancellation_is_checked_per_chunk() {
        let memory = Recorder::new(vec![]);
        let checks = RefCell::new(0);
        let cancel = || {
            *checks.borrow_mut() += 1;
            *checks.borrow() > 3
        };

        let stats = ChunkedRegionWalker::new(&memory).walk_cancellable(
            &range(0, 0x10000, 0x1000),
            &cancel,
            |_| WalkSignal::Continue,
        );

        assert!(stats.cancelled);
        assert_eq!(stats.chunks_read, 3);
        assert_eq!(*checks.borrow(), 4);
    }

    #[test]
    fn test_overlap_reads_extend_into_next_chunk() {
        let memory = Recorder::new(vec![]);
        let mut seen = Vec::new();

        ChunkedRegionWalker::new(&memory)
            .with_overlap(3)
            .walk(&range(0, 0x2002, 0x1000), |c| {
                seen.push((c.start.as_u64(), c.data.len(), c.len));
                WalkSignal::Continue
            });

        assert_eq!(
            seen,
            vec![(0, 0x1003, 0x1000), (0x1000, 0x1002, 0x1000), (0x2000, 2, 2)]
        );
    }

    #[test]
    fn test_overlap_falls_back_when_extension_is_unreadable() {
        // Second chunk unmapped: the extended read of the first fails, the plain read works
        let memory = Recorder::new(vec![(0x1000, 0x2000)]);
        let mut seen = Vec::new();

        let stats = ChunkedRegionWalker::new(&memory)
            .with_overlap(4)
            .walk(&range(0, 0x2000, 0x1000), |c| {
                seen.push((c.start.as_u64(), c.data.len()));
                WalkSignal::Continue
            });

        assert_eq!(seen, vec![(0, 0x1000)]);
        assert_eq!(stats.chunks_skipped, 1);
    }

    #[test]
    fn test_walk_near_top_of_address_space_terminates() {
        let memory = Recorder::new(vec![]);
        let mut visited = 0;
        ChunkedRegionWalker::new(&memory).walk(&range(u64::MAX - 0x10, u64::MAX, 0x1000), |c| {
            visited += 1;
            assert_eq!(c.data.len(), 0x10);
            WalkSignal::Continue
        });
        assert_eq!(visited, 1);
    }
}
