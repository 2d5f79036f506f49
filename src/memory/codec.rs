//! Byte codec for typed values
//!
//! Every numeric value is encoded little-endian, floats bit-exact. Strings
//! are encoded without a terminator so they match inside larger buffers.

use crate::core::types::{MemoryError, MemoryResult, MemoryValue, StringEncoding, ValueType};

pub fn encode_i32(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn encode_i64(value: i64) -> [u8; 8] {
    value.to_le_bytes()
}

pub fn encode_f32(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn encode_f64(value: f64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Encode a string, no terminator appended
pub fn encode_string(value: &str, encoding: StringEncoding) -> Vec<u8> {
    match encoding {
        StringEncoding::Utf8 => value.as_bytes().to_vec(),
        StringEncoding::Utf16Le => value.encode_utf16().flat_map(u16::to_le_bytes).collect(),
    }
}

/// Encode a value into its canonical byte sequence (UTF-8 for strings)
pub fn encode_value(value: &MemoryValue) -> Vec<u8> {
    encode_value_with(value, StringEncoding::Utf8)
}

/// Encode a value, using `encoding` if it is a string
pub fn encode_value_with(value: &MemoryValue, encoding: StringEncoding) -> Vec<u8> {
    match value {
        MemoryValue::I32(v) => encode_i32(*v).to_vec(),
        MemoryValue::I64(v) => encode_i64(*v).to_vec(),
        MemoryValue::F32(v) => encode_f32(*v).to_vec(),
        MemoryValue::F64(v) => encode_f64(*v).to_vec(),
        MemoryValue::String(s) => encode_string(s, encoding),
    }
}

/// Decode a value of `value_type` from the start of `bytes`.
///
/// Fixed-size types need at least their size in bytes and ignore the rest.
/// Strings consume the whole buffer and must be valid UTF-8.
pub fn decode_value(bytes: &[u8], value_type: ValueType) -> MemoryResult<MemoryValue> {
    match value_type {
        ValueType::I32 => take::<4>(bytes, value_type).map(|b| MemoryValue::I32(i32::from_le_bytes(b))),
        ValueType::I64 => take::<8>(bytes, value_type).map(|b| MemoryValue::I64(i64::from_le_bytes(b))),
        ValueType::F32 => take::<4>(bytes, value_type).map(|b| MemoryValue::F32(f32::from_le_bytes(b))),
        ValueType::F64 => take::<8>(bytes, value_type).map(|b| MemoryValue::F64(f64::from_le_bytes(b))),
        ValueType::String => String::from_utf8(bytes.to_vec())
            .map(MemoryValue::String)
            .map_err(|e| MemoryError::invalid_argument(format!("string is not valid UTF-8: {}", e))),
    }
}

fn take<const N: usize>(bytes: &[u8], value_type: ValueType) -> MemoryResult<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| {
            MemoryError::invalid_argument(format!(
                "{} needs {} bytes, got {}",
                value_type,
                N,
                bytes.len()
            ))
        })
}

/// Render bytes as uppercase, space-separated hex pairs ("4D 5A 90")
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_encoding_is_little_endian() {
        assert_eq!(encode_i32(1337), [0x39, 0x05, 0x00, 0x00]);
        assert_eq!(encode_i32(-1), [0xFF; 4]);
        assert_eq!(encode_i64(0x0102030405060708), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(encode_f32(1.0), [0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(encode_f64(1.0), [0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
    }

    #[test]
    fn test_string_encoding_has_no_terminator() {
        assert_eq!(encode_string("MZ", StringEncoding::Utf8), b"MZ".to_vec());
        assert_eq!(
            encode_string("MZ", StringEncoding::Utf16Le),
            vec![b'M', 0, b'Z', 0]
        );
        assert_eq!(encode_string("é", StringEncoding::Utf8), vec![0xC3, 0xA9]);
        assert!(encode_string("", StringEncoding::Utf8).is_empty());
    }

    #[test]
    fn test_encode_value_dispatch() {
        assert_eq!(encode_value(&MemoryValue::I32(1337)), vec![0x39, 0x05, 0, 0]);
        assert_eq!(
            encode_value_with(&MemoryValue::String("A".into()), StringEncoding::Utf16Le),
            vec![b'A', 0]
        );
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(
            decode_value(&[0x39, 0x05, 0, 0, 0xAA], ValueType::I32).unwrap(),
            MemoryValue::I32(1337)
        );
        assert_eq!(
            decode_value(b"hello", ValueType::String).unwrap(),
            MemoryValue::String("hello".into())
        );

        let err = decode_value(&[1, 2, 3], ValueType::I32).unwrap_err();
        assert!(matches!(err, MemoryError::InvalidArgument(_)));
        assert!(decode_value(&[0xFF, 0xFE], ValueType::String).is_err());
    }

    #[test]
    fn test_hex_string_rendering() {
        assert_eq!(bytes_to_hex_string(&[0x4D, 0x5A, 0x00, 0xef]), "4D 5A 00 EF");
        assert_eq!(bytes_to_hex_string(&[]), "");
    }
}
