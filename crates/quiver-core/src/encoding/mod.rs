//! Binary encoding for persisted graph data.
//!
//! Everything the storage layer writes goes through this module: tagged
//! value payloads, node and edge records, and the key layouts that give
//! the key-value backend its scan order. All multi-byte integers are
//! big-endian so that encoded keys sort the way the data model expects.
//!
//! Decoding is strict. An unknown value tag is
//! [`CoreError::InvalidValueTag`](crate::CoreError::InvalidValueTag) and
//! any truncated or trailing input is
//! [`CoreError::Corruption`](crate::CoreError::Corruption); the codec
//! round-trips every representable value.

pub mod entity;
pub mod keys;
pub mod value;

#[cfg(test)]
mod proptest_tests;

pub use entity::{
    decode_edge_payload, decode_node_payload, encode_edge_payload_to, encode_node_payload_to,
};
pub use value::{decode_value, encode_value_to};
