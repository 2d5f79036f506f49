//! Memory scanning: typed value search, wildcard pattern search and
//! single-address reads and writes
//!
//! A [`ScanEngine`] borrows a [`ProcessMemory`] and keeps no state between
//! calls. Every search owns its accumulated results, so independent engines
//! over the same process can run side by side.

use super::access::ProcessMemory;
use super::codec;
use super::hexdump::HexDumpRenderer;
use super::matcher;
use super::pattern::Pattern;
use super::walker::{ChunkedRegionWalker, Chunk, WalkSignal, WalkStats};
use crate::config::Config;
use crate::core::types::{
    Address, MemoryError, MemoryResult, MemoryValue, ScanRange, ScanResult, StringEncoding,
    ValueType, DEFAULT_MAX_ADDRESS, DEFAULT_MAX_RESULTS,
};
use tracing::{debug, info, warn};

/// Default length limit for string reads
pub const DEFAULT_MAX_STRING_LENGTH: usize = 256;
/// Default cap for a single read request, 10 MiB
pub const DEFAULT_MAX_READ_SIZE: usize = 10 * 1024 * 1024;
/// Default size of a dump when none is given
pub const DEFAULT_READ_SIZE: usize = 1024;

/// Per-search options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Address range to sweep
    pub range: ScanRange,
    /// Maximum number of addresses to report
    pub max_results: usize,
    /// Also find matches that straddle two chunks
    pub boundary_overlap: bool,
    /// Encoding used for string values
    pub string_encoding: StringEncoding,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            range: ScanRange::default(),
            max_results: DEFAULT_MAX_RESULTS,
            boundary_overlap: false,
            string_encoding: StringEncoding::Utf8,
        }
    }
}

impl ScanOptions {
    /// Options for a given range, other fields default
    pub fn with_range(range: ScanRange) -> Self {
        ScanOptions {
            range,
            ..ScanOptions::default()
        }
    }

    /// Builds the options described by the `[scanner]` config section
    pub fn from_config(config: &Config) -> MemoryResult<Self> {
        let scanner = &config.scanner;
        Ok(ScanOptions {
            range: ScanRange::new(
                Address::new(scanner.start_address),
                Address::new(scanner.end_address),
                scanner.chunk_size,
            )?,
            max_results: scanner.max_results,
            boundary_overlap: scanner.boundary_overlap,
            string_encoding: StringEncoding::Utf8,
        })
    }
}

/// Search and single-address access over one process
pub struct ScanEngine<'a, P: ProcessMemory + ?Sized> {
    memory: &'a P,
    max_address: Address,
    default_read_size: usize,
    max_read_size: usize,
    max_string_length: usize,
    hexdump: HexDumpRenderer,
}

impl<'a, P: ProcessMemory + ?Sized> ScanEngine<'a, P> {
    /// Create an engine with default limits
    pub fn new(memory: &'a P) -> Self {
        ScanEngine {
            memory,
            max_address: DEFAULT_MAX_ADDRESS,
            default_read_size: DEFAULT_READ_SIZE,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            hexdump: HexDumpRenderer::default(),
        }
    }

    /// Create an engine with the limits and display settings from `config`
    pub fn from_config(memory: &'a P, config: &Config) -> Self {
        ScanEngine {
            memory,
            max_address: Address::new(config.scanner.max_address),
            default_read_size: config.memory.default_read_size,
            max_read_size: config.memory.max_read_size,
            max_string_length: config.memory.max_string_length,
            hexdump: HexDumpRenderer::new(
                config.display.bytes_per_line,
                config.display.show_ascii,
            ),
        }
    }

    /// Exclusive upper bound for valid addresses
    pub fn with_max_address(mut self, max_address: Address) -> Self {
        self.max_address = max_address;
        self
    }

    pub fn max_address(&self) -> Address {
        self.max_address
    }

    /// Find every occurrence of `value`, up to `options.max_results`
    pub fn search_value(
        &self,
        value: &MemoryValue,
        options: &ScanOptions,
    ) -> MemoryResult<ScanResult> {
        self.search_value_cancellable(value, options, &|| false)
    }

    /// Like [`search_value`](Self::search_value), checking `cancel` before
    /// each chunk and returning the partial result once it fires
    pub fn search_value_cancellable(
        &self,
        value: &MemoryValue,
        options: &ScanOptions,
        cancel: &dyn Fn() -> bool,
    ) -> MemoryResult<ScanResult> {
        let pattern = Pattern::from_value(value, options.string_encoding)?;
        debug!(%value, value_type = %value.value_type(), pattern = %pattern, "searching value");

        let result = self.collect(&pattern, options, cancel);
        info!(
            %value,
            found = result.len(),
            skipped = result.chunks_skipped,
            "value search finished"
        );
        Ok(result)
    }

    /// Parse `value` as `value_type` and search for it
    pub fn search_text(
        &self,
        value: &str,
        value_type: ValueType,
        options: &ScanOptions,
    ) -> MemoryResult<ScanResult> {
        let value = MemoryValue::parse(value, value_type)?;
        self.search_value(&value, options)
    }

    /// First address matching the pattern `text`, or `None`
    pub fn search_pattern(
        &self,
        text: &str,
        options: &ScanOptions,
    ) -> MemoryResult<Option<Address>> {
        self.search_pattern_cancellable(text, options, &|| false)
    }

    pub fn search_pattern_cancellable(
        &self,
        text: &str,
        options: &ScanOptions,
        cancel: &dyn Fn() -> bool,
    ) -> MemoryResult<Option<Address>> {
        let pattern = Pattern::parse(text)?;
        let first_only = ScanOptions {
            max_results: 1,
            ..options.clone()
        };

        let found = self.collect(&pattern, &first_only, cancel).first();
        match found {
            Some(address) => info!(%pattern, %address, "pattern found"),
            None => info!(%pattern, "pattern not found"),
        }
        Ok(found)
    }

    /// Every address matching the pattern `text`, up to `options.max_results`
    pub fn search_pattern_all(
        &self,
        text: &str,
        options: &ScanOptions,
    ) -> MemoryResult<ScanResult> {
        let pattern = Pattern::parse(text)?;
        let result = self.collect(&pattern, options, &|| false);
        info!(%pattern, found = result.len(), "pattern search finished");
        Ok(result)
    }

    /// First match of `text` inside the named module's image
    pub fn search_pattern_in_module(
        &self,
        text: &str,
        module_name: &str,
    ) -> MemoryResult<Option<Address>> {
        let pattern = Pattern::parse(text)?;
        let module = self
            .memory
            .list_modules()?
            .into_iter()
            .find(|m| m.matches_name(module_name))
            .ok_or_else(|| MemoryError::ModuleNotFound(module_name.to_string()))?;

        let options = ScanOptions {
            range: ScanRange::from_base_and_size(module.base_address, u64::from(module.size))?,
            max_results: 1,
            ..ScanOptions::default()
        };
        debug!(module = %module.name, base = %module.base_address, size = module.size, "scanning module");

        Ok(self.collect(&pattern, &options, &|| false).first())
    }

    fn collect(
        &self,
        pattern: &Pattern,
        options: &ScanOptions,
        cancel: &dyn Fn() -> bool,
    ) -> ScanResult {
        let mut result = ScanResult::new();
        if options.max_results == 0 {
            result.limit_reached = true;
            return result;
        }

        let overlap = if options.boundary_overlap {
            pattern.len() - 1
        } else {
            0
        };
        let walker = ChunkedRegionWalker::new(self.memory).with_overlap(overlap);

        let stats = walker.walk_cancellable(&options.range, cancel, |chunk| {
            self.visit_chunk(chunk, pattern, options.max_results, &mut result.addresses)
        });

        self.finish(result, stats)
    }

    fn visit_chunk(
        &self,
        chunk: &Chunk<'_>,
        pattern: &Pattern,
        max_results: usize,
        found: &mut Vec<Address>,
    ) -> WalkSignal {
        let remaining = max_results.saturating_sub(found.len());
        // A hit at address 0 is dropped below, so ask for one more
        let limit = remaining.saturating_add(usize::from(chunk.start.is_null()));
        let hits = matcher::find_all(chunk.data, pattern, limit);

        found.extend(
            hits.into_iter()
                .filter(|&offset| chunk.owns_offset(offset))
                .map(|offset| chunk.start.add(offset as u64))
                .filter(|address| address.is_valid(self.max_address))
                .take(remaining),
        );

        if found.len() >= max_results {
            WalkSignal::StopEarly
        } else {
            WalkSignal::Continue
        }
    }

    fn finish(&self, mut result: ScanResult, stats: WalkStats) -> ScanResult {
        result.chunks_scanned = stats.chunks_read;
        result.chunks_skipped = stats.chunks_skipped;
        result.limit_reached = stats.stopped_early;
        result.cancelled = stats.cancelled;

        if stats.cancelled {
            warn!(
                found = result.len(),
                scanned = stats.chunks_read,
                "scan cancelled, returning partial results"
            );
        }
        result
    }

    /// Read `length` raw bytes at a validated address
    pub fn read_bytes(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        let address = address.validate(self.max_address)?;
        if length > self.max_read_size {
            return Err(MemoryError::ReadTooLarge {
                requested: length,
                limit: self.max_read_size,
            });
        }
        self.memory.read_bytes(address, length)
    }

    /// Read and decode a value. Strings are read as by [`read_string`](Self::read_string).
    pub fn read_value(&self, address: Address, value_type: ValueType) -> MemoryResult<MemoryValue> {
        match value_type.size() {
            Some(size) => {
                let bytes = self.read_bytes(address, size)?;
                codec::decode_value(&bytes, value_type)
            }
            None => self
                .read_string(address, self.max_string_length)
                .map(MemoryValue::String),
        }
    }

    /// Read up to `max_length` bytes and cut at the first NUL.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read_string(&self, address: Address, max_length: usize) -> MemoryResult<String> {
        let bytes = self.read_bytes(address, max_length)?;
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
    }

    /// Encode and write a value. Strings are written without a terminator.
    pub fn write_value(&self, address: Address, value: &MemoryValue) -> MemoryResult<()> {
        self.write_bytes(address, &codec::encode_value(value))
    }

    /// Write raw bytes at a validated address
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        let address = address.validate(self.max_address)?;
        self.memory.write_bytes(address, data)?;
        debug!(%address, bytes = %codec::bytes_to_hex_string(data), "memory written");
        Ok(())
    }

    /// Follow a chain of 64-bit pointers.
    ///
    /// Reads the pointer at `address`, then for each offset but the last
    /// adds it and dereferences again. The last offset is added to the
    /// final pointer without dereferencing. With no offsets the pointer at
    /// `address` is returned.
    pub fn read_pointer(&self, address: Address, offsets: &[i64]) -> MemoryResult<Address> {
        let mut current = self.read_u64_pointer(address, 0)?;

        if let Some((last, rest)) = offsets.split_last() {
            for (i, offset) in rest.iter().enumerate() {
                current = self.read_u64_pointer(current.offset(*offset), i + 1)?;
            }
            current = current.offset(*last);
        }

        Ok(current)
    }

    fn read_u64_pointer(&self, address: Address, level: usize) -> MemoryResult<Address> {
        let bytes = self
            .read_bytes(address, 8)
            .map_err(|e| MemoryError::pointer_chain_broken(level, e.to_string()))?;
        let raw: [u8; 8] = bytes
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| MemoryError::pointer_chain_broken(level, "short pointer read"))?;
        let pointer = Address::new(u64::from_le_bytes(raw));

        if pointer.is_null() {
            return Err(MemoryError::pointer_chain_broken(
                level,
                format!("null pointer at {}", address),
            ));
        }
        Ok(pointer)
    }

    /// Read `size` bytes at `address` and render them as a hex dump
    pub fn dump(&self, address: Address, size: usize) -> MemoryResult<String> {
        let data = self.read_bytes(address, size)?;
        Ok(self.hexdump.render(address, &data))
    }

    /// Dump with the configured default size
    pub fn dump_default(&self, address: Address) -> MemoryResult<String> {
        self.dump(address, self.default_read_size)
    }
}
