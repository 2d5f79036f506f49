//! Byte patterns with wildcard positions
//!
//! Text form: whitespace-separated tokens, each either two hex digits
//! (case-insensitive) or `??` for a byte that matches anything.
//! Example: `"4D 5A ?? ?? 00"`.

use super::codec;
use crate::core::types::{MemoryError, MemoryResult, MemoryValue, StringEncoding};
use std::fmt;
use std::str::FromStr;

/// One position of a [`Pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternByte {
    /// Must equal this byte
    Literal(u8),
    /// Matches any byte
    Wildcard,
}

impl PatternByte {
    #[inline]
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            PatternByte::Literal(expected) => *expected == byte,
            PatternByte::Wildcard => true,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, PatternByte::Wildcard)
    }
}

/// A fixed-length byte template, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Vec<PatternByte>,
}

impl Pattern {
    /// Parse the text form, e.g. `"48 8B ?? ?? 89"`
    pub fn parse(text: &str) -> MemoryResult<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(MemoryError::MalformedPattern("empty pattern".to_string()));
        }

        let bytes = tokens
            .into_iter()
            .map(parse_token)
            .collect::<MemoryResult<Vec<_>>>()?;

        Ok(Pattern { bytes })
    }

    /// All-literal pattern matching exactly `bytes`
    pub fn literal(bytes: &[u8]) -> MemoryResult<Self> {
        if bytes.is_empty() {
            return Err(MemoryError::invalid_argument(
                "cannot search for an empty byte sequence",
            ));
        }
        Ok(Pattern {
            bytes: bytes.iter().copied().map(PatternByte::Literal).collect(),
        })
    }

    /// All-literal pattern for the encoded form of a value
    pub fn from_value(value: &MemoryValue, encoding: StringEncoding) -> MemoryResult<Self> {
        Self::literal(&codec::encode_value_with(value, encoding))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: parsing and construction reject empty patterns
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[PatternByte] {
        &self.bytes
    }

    pub fn has_wildcards(&self) -> bool {
        self.bytes.iter().any(PatternByte::is_wildcard)
    }

    /// Checks whether `window` starts with a match of this pattern
    #[inline]
    pub fn matches_at(&self, window: &[u8]) -> bool {
        window.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(window)
                .all(|(p, &b)| p.matches(b))
    }
}

fn parse_token(token: &str) -> MemoryResult<PatternByte> {
    if token == "??" {
        return Ok(PatternByte::Wildcard);
    }
    if token.len() != 2 {
        return Err(MemoryError::MalformedPattern(format!(
            "invalid token '{}': expected two hex digits or ??",
            token
        )));
    }
    match hex::decode(token).as_deref() {
        Ok([byte]) => Ok(PatternByte::Literal(*byte)),
        _ => Err(MemoryError::MalformedPattern(format!(
            "invalid hex byte '{}'",
            token
        ))),
    }
}

impl FromStr for Pattern {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match byte {
                PatternByte::Literal(b) => write!(f, "{:02X}", b)?,
                PatternByte::Wildcard => f.write_str("??")?,
            }
        }
        Ok(())
    }
}
