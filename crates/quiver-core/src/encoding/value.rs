//! Serialization for [`Value`] payloads.
//!
//! # Format
//!
//! Each value is one tag byte followed by the payload:
//!
//! - `Str`: `0x01` + 4-byte length (big-endian u32) + UTF-8 bytes
//! - `Int`: `0x02` + 8 bytes (big-endian i64)
//! - `Float`: `0x03` + 8 bytes (IEEE 754 f64, big-endian bit pattern)
//! - `NodeRef`: `0x04` + 12-byte element id
//! - `EdgeRef`: `0x05` + 12-byte element id
//! - `Id`: `0x06` + 12-byte element id
//! - `Bool`: `0x07` + one byte, `0x00` or `0x01`
//! - `Null`: `0x08`

use crate::error::CoreError;
use crate::types::{ElementId, Value};

use super::keys::ELEMENT_ID_LEN;

/// Type tags for value variants.
mod tags {
    pub const STRING: u8 = 1;
    pub const INT: u8 = 2;
    pub const FLOAT: u8 = 3;
    pub const NODE_REF: u8 = 4;
    pub const EDGE_REF: u8 = 5;
    pub const ID: u8 = 6;
    pub const BOOL: u8 = 7;
    pub const NULL: u8 = 8;
}

/// Appends the encoded form of a value to `buf`.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if a string exceeds the u32 length
/// prefix.
pub fn encode_value_to(value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Str(s) => {
            buf.push(tags::STRING);
            encode_bytes_to(s.as_bytes(), buf)?;
        }
        Value::Int(i) => {
            buf.push(tags::INT);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(f) => {
            buf.push(tags::FLOAT);
            buf.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::NodeRef(id) => {
            buf.push(tags::NODE_REF);
            buf.extend_from_slice(id.as_bytes());
        }
        Value::EdgeRef(id) => {
            buf.push(tags::EDGE_REF);
            buf.extend_from_slice(id.as_bytes());
        }
        Value::Id(id) => {
            buf.push(tags::ID);
            buf.extend_from_slice(id.as_bytes());
        }
        Value::Bool(b) => {
            buf.push(tags::BOOL);
            buf.push(u8::from(*b));
        }
        Value::Null => buf.push(tags::NULL),
    }
    Ok(())
}

/// Appends a length-prefixed byte buffer to `buf`.
pub(crate) fn encode_bytes_to(bytes: &[u8], buf: &mut Vec<u8>) -> Result<(), CoreError> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| CoreError::Encoding("byte buffer too long".to_owned()))?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Decodes a value and returns the number of bytes consumed.
///
/// # Errors
///
/// Returns [`CoreError::InvalidValueTag`] on an unknown tag byte and
/// [`CoreError::Corruption`] on truncated input.
pub fn decode_value(bytes: &[u8]) -> Result<(Value, usize), CoreError> {
    let (&tag, rest) = bytes.split_first().ok_or_else(|| CoreError::truncated("value tag"))?;
    match tag {
        tags::STRING => {
            let (data, consumed) = decode_bytes(rest)?;
            let s = String::from_utf8(data.to_vec())
                .map_err(|e| CoreError::Corruption(format!("invalid UTF-8 in string: {e}")))?;
            Ok((Value::Str(s), 1 + consumed))
        }
        tags::INT => {
            let arr = take_array::<8>(rest, "int payload")?;
            Ok((Value::Int(i64::from_be_bytes(arr)), 9))
        }
        tags::FLOAT => {
            let arr = take_array::<8>(rest, "float payload")?;
            Ok((Value::Float(f64::from_bits(u64::from_be_bytes(arr))), 9))
        }
        tags::NODE_REF => {
            let id = take_id(rest, "node ref payload")?;
            Ok((Value::NodeRef(id), 1 + ELEMENT_ID_LEN))
        }
        tags::EDGE_REF => {
            let id = take_id(rest, "edge ref payload")?;
            Ok((Value::EdgeRef(id), 1 + ELEMENT_ID_LEN))
        }
        tags::ID => {
            let id = take_id(rest, "id payload")?;
            Ok((Value::Id(id), 1 + ELEMENT_ID_LEN))
        }
        tags::BOOL => {
            let arr = take_array::<1>(rest, "bool payload")?;
            Ok((Value::Bool(arr[0] != 0), 2))
        }
        tags::NULL => Ok((Value::Null, 1)),
        other => Err(CoreError::InvalidValueTag(other)),
    }
}

/// Decodes a length-prefixed byte buffer, returning the data slice and
/// the number of bytes consumed (prefix included).
pub(crate) fn decode_bytes(bytes: &[u8]) -> Result<(&[u8], usize), CoreError> {
    let arr = take_array::<4>(bytes, "length prefix")?;
    let len = u32::from_be_bytes(arr) as usize;
    let data = bytes
        .get(4..4 + len)
        .ok_or_else(|| CoreError::truncated("length-prefixed buffer"))?;
    Ok((data, 4 + len))
}

/// Copies a fixed-size prefix out of `bytes`.
fn take_array<const N: usize>(bytes: &[u8], context: &str) -> Result<[u8; N], CoreError> {
    bytes
        .get(..N)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| CoreError::truncated(context))
}

/// Reads an element id prefix out of `bytes`.
fn take_id(bytes: &[u8], context: &str) -> Result<ElementId, CoreError> {
    Ok(ElementId::from_bytes(take_array::<ELEMENT_ID_LEN>(bytes, context)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn roundtrip(value: &Value) -> Value {
        let mut buf = Vec::new();
        encode_value_to(value, &mut buf).unwrap();
        let (decoded, consumed) = decode_value(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        decoded
    }

    #[test]
    fn encode_decode_null() {
        let mut buf = Vec::new();
        encode_value_to(&Value::Null, &mut buf).unwrap();
        assert_eq!(buf, vec![8]);
        assert_eq!(roundtrip(&Value::Null), Value::Null);
    }

    #[test]
    fn encode_decode_bool() {
        for b in [true, false] {
            assert_eq!(roundtrip(&Value::Bool(b)), Value::Bool(b));
        }
    }

    #[test]
    fn encode_decode_int() {
        for i in [0i64, 1, -1, i64::MIN, i64::MAX] {
            assert_eq!(roundtrip(&Value::Int(i)), Value::Int(i));
        }
    }

    #[test]
    fn encode_decode_float() {
        for f in [0.0f64, -0.0, 1.5, f64::MIN, f64::MAX, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(roundtrip(&Value::Float(f)), Value::Float(f));
        }
    }

    #[test]
    fn encode_decode_nan_bit_pattern() {
        let mut buf = Vec::new();
        encode_value_to(&Value::Float(f64::NAN), &mut buf).unwrap();
        let (decoded, _) = decode_value(&buf).unwrap();
        match decoded {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn encode_decode_string() {
        for s in ["", "hello", "hello world", "\u{1F600}"] {
            assert_eq!(roundtrip(&Value::from(s)), Value::from(s));
        }
    }

    #[test]
    fn encode_decode_refs() {
        let id = ElementId::random();
        assert_eq!(roundtrip(&Value::NodeRef(id)), Value::NodeRef(id));
        assert_eq!(roundtrip(&Value::EdgeRef(id)), Value::EdgeRef(id));
        assert_eq!(roundtrip(&Value::Id(id)), Value::Id(id));
    }

    #[test]
    fn string_is_length_prefixed_big_endian() {
        let mut buf = Vec::new();
        encode_value_to(&Value::from("ab"), &mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn decode_unknown_tag() {
        assert!(matches!(decode_value(&[0xFF]), Err(CoreError::InvalidValueTag(0xFF))));
        assert!(matches!(decode_value(&[0]), Err(CoreError::InvalidValueTag(0))));
    }

    #[test]
    fn decode_empty_input() {
        assert!(matches!(decode_value(&[]), Err(CoreError::Corruption(_))));
    }

    #[test]
    fn decode_truncated_payloads() {
        // int with 4 of 8 payload bytes
        assert!(decode_value(&[2, 0, 0, 0, 0]).is_err());
        // float with no payload
        assert!(decode_value(&[3]).is_err());
        // node ref with 11 of 12 id bytes
        assert!(decode_value(&[4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
        // bool with no payload byte
        assert!(decode_value(&[7]).is_err());
        // string with a short length prefix
        assert!(decode_value(&[1, 0, 0]).is_err());
        // string claiming 10 bytes but providing 3
        assert!(decode_value(&[1, 0, 0, 0, 10, b'a', b'b', b'c']).is_err());
    }

    #[test]
    fn decode_invalid_utf8_string() {
        assert!(decode_value(&[1, 0, 0, 0, 2, 0xFF, 0xFE]).is_err());
    }
}
