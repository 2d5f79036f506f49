//! Property tests for encoding, pattern matching and chunked walking

use memory_reader::core::types::{Address, MemoryValue, ScanRange, ValueType};
use memory_reader::memory::codec::{bytes_to_hex_string, decode_value, encode_value};
use memory_reader::memory::walker::{ChunkedRegionWalker, WalkSignal};
use memory_reader::memory::{find_all, Pattern, PatternByte, ScanEngine, ScanOptions, SnapshotMemory};
use proptest::prelude::*;

fn naive_find(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.len() > haystack.len() {
        return Vec::new();
    }
    (0..=haystack.len() - needle.len())
        .filter(|&i| &haystack[i..i + needle.len()] == needle)
        .collect()
}

fn pattern_byte() -> impl Strategy<Value = PatternByte> {
    prop_oneof![
        3 => any::<u8>().prop_map(PatternByte::Literal),
        1 => Just(PatternByte::Wildcard),
    ]
}

fn render(bytes: &[PatternByte]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            PatternByte::Literal(v) => format!("{:02x}", v),
            PatternByte::Wildcard => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

proptest! {
    #[test]
    fn prop_numeric_values_round_trip(i in any::<i32>(), l in any::<i64>(), f in any::<f32>(), d in any::<f64>()) {
        prop_assert_eq!(decode_value(&encode_value(&MemoryValue::I32(i)), ValueType::I32).unwrap(), MemoryValue::I32(i));
        prop_assert_eq!(decode_value(&encode_value(&MemoryValue::I64(l)), ValueType::I64).unwrap(), MemoryValue::I64(l));

        // Compare bit patterns so NaN payloads count as equal
        match decode_value(&encode_value(&MemoryValue::F32(f)), ValueType::F32).unwrap() {
            MemoryValue::F32(back) => prop_assert_eq!(back.to_bits(), f.to_bits()),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
        match decode_value(&encode_value(&MemoryValue::F64(d)), ValueType::F64).unwrap() {
            MemoryValue::F64(back) => prop_assert_eq!(back.to_bits(), d.to_bits()),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn prop_pattern_parse_and_render(bytes in prop::collection::vec(pattern_byte(), 1..32)) {
        let pattern = Pattern::parse(&render(&bytes)).unwrap();
        prop_assert_eq!(pattern.bytes(), bytes.as_slice());
        prop_assert_eq!(Pattern::parse(&pattern.to_string()).unwrap(), pattern);
    }

    #[test]
    fn prop_hex_string_parses_back_to_literal(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let text = bytes_to_hex_string(&bytes);
        prop_assert_eq!(Pattern::parse(&text).unwrap(), Pattern::literal(&bytes).unwrap());
    }

    #[test]
    fn prop_mutation_at_wildcard_keeps_match_and_at_literal_removes_it(
        bytes in prop::collection::vec(pattern_byte(), 1..16),
        position in any::<prop::sample::Index>(),
        noise in any::<u8>(),
    ) {
        // Window that matches the pattern exactly
        let window: Vec<u8> = bytes
            .iter()
            .map(|b| match b {
                PatternByte::Literal(v) => *v,
                PatternByte::Wildcard => noise,
            })
            .collect();
        let pattern = Pattern::parse(&render(&bytes)).unwrap();
        prop_assert_eq!(find_all(&window, &pattern, 1), vec![0]);

        let index = position.index(window.len());
        let mut mutated = window.clone();
        mutated[index] = mutated[index].wrapping_add(1);
        let still_matches = !find_all(&mutated, &pattern, 1).is_empty();
        prop_assert_eq!(still_matches, bytes[index].is_wildcard());
    }

    #[test]
    fn prop_literal_find_all_matches_naive_search(
        haystack in prop::collection::vec(0u8..4, 0..256),
        needle in prop::collection::vec(0u8..4, 1..4),
    ) {
        let pattern = Pattern::literal(&needle).unwrap();
        prop_assert_eq!(find_all(&haystack, &pattern, usize::MAX), naive_find(&haystack, &needle));
    }

    #[test]
    fn prop_wildcard_hits_agree_on_literal_positions(
        haystack in prop::collection::vec(0u8..3, 0..128),
        bytes in prop::collection::vec(prop_oneof![(0u8..3).prop_map(PatternByte::Literal), Just(PatternByte::Wildcard)], 1..5),
    ) {
        let pattern = Pattern::parse(&render(&bytes)).unwrap();
        let hits = find_all(&haystack, &pattern, usize::MAX);

        let expected: Vec<usize> = if bytes.len() > haystack.len() {
            Vec::new()
        } else {
            (0..=haystack.len() - bytes.len())
                .filter(|&i| bytes.iter().zip(&haystack[i..]).all(|(p, &b)| p.matches(b)))
                .collect()
        };
        prop_assert_eq!(hits, expected);
    }

    #[test]
    fn prop_find_all_respects_limit(haystack in prop::collection::vec(0u8..2, 0..128), limit in 0usize..8) {
        let pattern = Pattern::literal(&[0]).unwrap();
        let all = find_all(&haystack, &pattern, usize::MAX);
        let capped = find_all(&haystack, &pattern, limit);
        prop_assert_eq!(capped.as_slice(), &all[..all.len().min(limit)]);
    }

    #[test]
    fn prop_walker_covers_range_exactly(start in 0u64..0x1000, len in 1u64..0x4000, chunk in 1u32..0x800) {
        let memory = SnapshotMemory::new().with_region(Address::new(0), vec![0; 0x5000]);
        let range = ScanRange::new(Address::new(start), Address::new(start + len), chunk).unwrap();

        let mut next = start;
        let stats = ChunkedRegionWalker::new(&memory).walk(&range, |c| {
            assert_eq!(c.start.as_u64(), next);
            assert!(c.data.len() <= chunk as usize);
            next += c.data.len() as u64;
            WalkSignal::Continue
        });

        prop_assert_eq!(next, start + len);
        prop_assert_eq!(stats.chunks_read, range.chunk_count());
    }

    #[test]
    fn prop_scan_results_are_capped_ascending_and_in_range(
        data in prop::collection::vec(0u8..3, 1..0x800),
        chunk in 1u32..0x100,
        max_results in 1usize..16,
    ) {
        let base = 0x1000u64;
        let end = base + data.len() as u64;
        let memory = SnapshotMemory::new().with_region(Address::new(base), data.clone());
        let options = ScanOptions {
            max_results,
            ..ScanOptions::with_range(ScanRange::new(Address::new(base), Address::new(end), chunk).unwrap())
        };

        let result = ScanEngine::new(&memory).search_pattern_all("01", &options).unwrap();
        prop_assert!(result.len() <= max_results);
        prop_assert!(result.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(result.iter().all(|a| a.as_u64() >= base && a.as_u64() < end));

        let expected: Vec<u64> = naive_find(&data, &[1]).into_iter().take(max_results).map(|o| base + o as u64).collect();
        prop_assert_eq!(result.iter().map(|a| a.as_u64()).collect::<Vec<_>>(), expected);
    }
}
