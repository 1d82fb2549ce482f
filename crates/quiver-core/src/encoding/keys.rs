//! Key layouts for ordered storage.
//!
//! Node and edge records are keyed by their raw 12-byte element id; the
//! column families partition the keyspace, so the keys carry no prefix
//! byte. The adjacency index uses a composite key designed for prefix
//! scans:
//!
//! ```text
//! adj key   = src_id(12) dir(u8) edge_id(12)     25 bytes
//! adj value = dst_id(12)
//! ```
//!
//! Ordering by `(src, dir, edge)` keeps one node's entries contiguous and
//! splits them into `out`, `simple`, `in` slices, so a direction filter
//! is just a choice of scan bounds.

use crate::error::CoreError;
use crate::types::{AdjEntry, Dir, ElementId};

pub use crate::types::ELEMENT_ID_LEN;

/// Length of an adjacency index key in bytes.
pub const ADJ_KEY_LEN: usize = ELEMENT_ID_LEN * 2 + 1;

/// Length of an adjacency scan bound in bytes.
pub const ADJ_BOUND_LEN: usize = ELEMENT_ID_LEN + 1;

/// Encodes the adjacency index key for `(src, dir, edge)`.
#[inline]
#[must_use]
pub fn encode_adj_key(src: ElementId, dir: Dir, edge: ElementId) -> [u8; ADJ_KEY_LEN] {
    let mut key = [0u8; ADJ_KEY_LEN];
    key[..ELEMENT_ID_LEN].copy_from_slice(src.as_bytes());
    key[ELEMENT_ID_LEN] = dir.as_byte();
    key[ELEMENT_ID_LEN + 1..].copy_from_slice(edge.as_bytes());
    key
}

/// Decodes an adjacency index entry from its key and value bytes.
///
/// # Errors
///
/// Returns [`CoreError::Corruption`] if either buffer has the wrong
/// length or the direction byte is unknown.
pub fn decode_adj_entry(key: &[u8], value: &[u8]) -> Result<AdjEntry, CoreError> {
    if key.len() != ADJ_KEY_LEN {
        return Err(CoreError::Corruption(format!(
            "adjacency key must be {ADJ_KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    let src = ElementId::try_from_slice(&key[..ELEMENT_ID_LEN])?;
    let dir = Dir::from_byte(key[ELEMENT_ID_LEN]).ok_or_else(|| {
        CoreError::Corruption(format!("invalid adjacency direction byte: {:#04x}", key[ELEMENT_ID_LEN]))
    })?;
    let edge = ElementId::try_from_slice(&key[ELEMENT_ID_LEN + 1..])?;
    let dst = ElementId::try_from_slice(value)?;
    Ok(AdjEntry { src, dir, edge, dst })
}

/// Returns the `[lo, hi)` bounds scanning `node`'s adjacency entries with
/// direction in `min_dir..=max_dir`.
///
/// The bounds are 13-byte prefixes of the 25-byte keys; `hi` uses the
/// direction byte one past `max_dir`, which never overflows because the
/// direction byte is at most 2.
#[must_use]
pub fn adj_scan_bounds(
    node: ElementId,
    min_dir: Dir,
    max_dir: Dir,
) -> ([u8; ADJ_BOUND_LEN], [u8; ADJ_BOUND_LEN]) {
    let mut lo = [0u8; ADJ_BOUND_LEN];
    lo[..ELEMENT_ID_LEN].copy_from_slice(node.as_bytes());
    lo[ELEMENT_ID_LEN] = min_dir.as_byte();

    let mut hi = lo;
    hi[ELEMENT_ID_LEN] = max_dir.as_byte() + 1;
    (lo, hi)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn adj_key_roundtrip() {
        let entry = AdjEntry::new(
            ElementId::random(),
            Dir::In,
            ElementId::random(),
            ElementId::random(),
        );
        let key = encode_adj_key(entry.src, entry.dir, entry.edge);
        let decoded = decode_adj_entry(&key, entry.dst.as_bytes()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn adj_keys_group_by_node_then_direction() {
        let a = ElementId::from_bytes([1; 12]);
        let b = ElementId::from_bytes([2; 12]);
        let e = ElementId::from_bytes([9; 12]);

        let a_out = encode_adj_key(a, Dir::Out, e);
        let a_simple = encode_adj_key(a, Dir::Simple, e);
        let a_in = encode_adj_key(a, Dir::In, e);
        let b_out = encode_adj_key(b, Dir::Out, e);

        assert!(a_out < a_simple);
        assert!(a_simple < a_in);
        assert!(a_in < b_out);
    }

    #[test]
    fn scan_bounds_select_direction_slices() {
        let node = ElementId::from_bytes([7; 12]);
        let e = ElementId::from_bytes([1; 12]);

        let out_key = encode_adj_key(node, Dir::Out, e);
        let simple_key = encode_adj_key(node, Dir::Simple, e);
        let in_key = encode_adj_key(node, Dir::In, e);

        let within = |key: &[u8], lo: &[u8], hi: &[u8]| key >= lo && key < hi;

        // Full range covers all three directions.
        let (lo, hi) = adj_scan_bounds(node, Dir::Out, Dir::In);
        assert!(within(&out_key, &lo, &hi));
        assert!(within(&simple_key, &lo, &hi));
        assert!(within(&in_key, &lo, &hi));

        // A single-direction slice excludes the others.
        let (lo, hi) = adj_scan_bounds(node, Dir::Simple, Dir::Simple);
        assert!(!within(&out_key, &lo, &hi));
        assert!(within(&simple_key, &lo, &hi));
        assert!(!within(&in_key, &lo, &hi));

        // Contiguous two-direction slices.
        let (lo, hi) = adj_scan_bounds(node, Dir::Simple, Dir::In);
        assert!(!within(&out_key, &lo, &hi));
        assert!(within(&simple_key, &lo, &hi));
        assert!(within(&in_key, &lo, &hi));
    }

    #[test]
    fn scan_bounds_exclude_other_nodes() {
        let node = ElementId::from_bytes([7; 12]);
        let next = ElementId::from_bytes([
            7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 8,
        ]);
        let e = ElementId::from_bytes([0; 12]);

        let (lo, hi) = adj_scan_bounds(node, Dir::Out, Dir::In);
        let other = encode_adj_key(next, Dir::Out, e);
        assert!(other.as_slice() >= hi.as_slice() || other.as_slice() < lo.as_slice());
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let key = encode_adj_key(ElementId::random(), Dir::Out, ElementId::random());
        // Short value.
        assert!(decode_adj_entry(&key, &[0; 11]).is_err());
        // Short key.
        assert!(decode_adj_entry(&key[..24], &[0; 12]).is_err());
        // Bad direction byte.
        let mut bad = key;
        bad[ELEMENT_ID_LEN] = 9;
        assert!(decode_adj_entry(&bad, &[0; 12]).is_err());
    }
}
