//! Sliding-window pattern matching over one buffer

use super::pattern::{Pattern, PatternByte};

/// Offsets of every match of `pattern` in `haystack`, ascending, at most `limit`
///
/// Every start offset `0..=len(haystack) - len(pattern)` is tried. A
/// `limit` of zero yields nothing.
pub fn find_all(haystack: &[u8], pattern: &Pattern, limit: usize) -> Vec<usize> {
    if limit == 0 || pattern.len() > haystack.len() {
        return Vec::new();
    }

    match anchor(pattern) {
        Some((anchor_index, anchor_byte)) => {
            find_anchored(haystack, pattern, anchor_index, anchor_byte, limit)
        }
        // All wildcards: every window matches
        None => (0..=haystack.len() - pattern.len()).take(limit).collect(),
    }
}

/// Offset of the first match, if any
pub fn find_first(haystack: &[u8], pattern: &Pattern) -> Option<usize> {
    find_all(haystack, pattern, 1).into_iter().next()
}

/// First literal position of the pattern, used to skip windows quickly
fn anchor(pattern: &Pattern) -> Option<(usize, u8)> {
    pattern
        .bytes()
        .iter()
        .enumerate()
        .find_map(|(i, byte)| match byte {
            PatternByte::Literal(b) => Some((i, *b)),
            PatternByte::Wildcard => None,
        })
}

fn find_anchored(
    haystack: &[u8],
    pattern: &Pattern,
    anchor_index: usize,
    anchor_byte: u8,
    limit: usize,
) -> Vec<usize> {
    let last_start = haystack.len() - pattern.len();
    let mut results = Vec::new();
    let mut start = 0;

    while start <= last_start {
        // Jump to the next window whose anchor byte lines up
        let search_from = start + anchor_index;
        let search_to = last_start + anchor_index;
        let Some(skip) = haystack[search_from..=search_to]
            .iter()
            .position(|&b| b == anchor_byte)
        else {
            break;
        };
        start += skip;

        if pattern.matches_at(&haystack[start..]) {
            results.push(start);
            if results.len() >= limit {
                break;
            }
        }
        start += 1;
    }

    results
}
