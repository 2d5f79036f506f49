//! Memory value enum for the data types the scanner understands

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A typed value that can be searched for, read or written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MemoryValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
}

impl MemoryValue {
    /// Size in bytes of the encoded value (strings without terminator)
    pub fn size(&self) -> usize {
        match self {
            MemoryValue::I32(_) | MemoryValue::F32(_) => 4,
            MemoryValue::I64(_) | MemoryValue::F64(_) => 8,
            MemoryValue::String(s) => s.len(),
        }
    }

    /// Gets the value type for this value
    pub fn value_type(&self) -> ValueType {
        match self {
            MemoryValue::I32(_) => ValueType::I32,
            MemoryValue::I64(_) => ValueType::I64,
            MemoryValue::F32(_) => ValueType::F32,
            MemoryValue::F64(_) => ValueType::F64,
            MemoryValue::String(_) => ValueType::String,
        }
    }

    /// Parses user input into a value of the given type.
    ///
    /// Integers accept decimal or `0x`-prefixed hex.
    pub fn parse(text: &str, value_type: ValueType) -> MemoryResult<Self> {
        let trimmed = text.trim();
        let invalid = || {
            MemoryError::invalid_argument(format!("'{}' is not a valid {}", trimmed, value_type))
        };

        match value_type {
            ValueType::I32 => parse_integer(trimmed)
                .and_then(|v| i32::try_from(v).ok())
                .map(MemoryValue::I32)
                .ok_or_else(invalid),
            ValueType::I64 => parse_integer(trimmed)
                .and_then(|v| i64::try_from(v).ok())
                .map(MemoryValue::I64)
                .ok_or_else(invalid),
            ValueType::F32 => trimmed
                .parse::<f32>()
                .map(MemoryValue::F32)
                .map_err(|_| invalid()),
            ValueType::F64 => trimmed
                .parse::<f64>()
                .map(MemoryValue::F64)
                .map_err(|_| invalid()),
            // Strings are taken verbatim, surrounding whitespace included
            ValueType::String => Ok(MemoryValue::String(text.to_string())),
        }
    }
}

fn parse_integer(text: &str) -> Option<i128> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i128>().ok()?,
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Enum representing the type of a memory value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    String,
}

impl ValueType {
    /// Returns the size in bytes for this value type, `None` for strings
    pub fn size(&self) -> Option<usize> {
        match self {
            ValueType::I32 | ValueType::F32 => Some(4),
            ValueType::I64 | ValueType::F64 => Some(8),
            ValueType::String => None,
        }
    }
}

impl FromStr for ValueType {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "i32" => Ok(ValueType::I32),
            "long" | "i64" => Ok(ValueType::I64),
            "float" | "f32" => Ok(ValueType::F32),
            "double" | "f64" => Ok(ValueType::F64),
            "string" | "str" => Ok(ValueType::String),
            other => Err(MemoryError::invalid_argument(format!(
                "unsupported value type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "int",
            ValueType::I64 => "long",
            ValueType::F32 => "float",
            ValueType::F64 => "double",
            ValueType::String => "string",
        };
        f.write_str(name)
    }
}

/// Text encoding used when turning a string into bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringEncoding {
    #[default]
    Utf8,
    Utf16Le,
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::I32(v) => write!(f, "{}", v),
            MemoryValue::I64(v) => write!(f, "{}", v),
            MemoryValue::F32(v) => write!(f, "{}", v),
            MemoryValue::F64(v) => write!(f, "{}", v),
            MemoryValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}
