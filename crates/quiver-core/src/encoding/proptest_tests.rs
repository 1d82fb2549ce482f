//! Property-based tests for encoding round-trips.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use crate::encoding::entity::{
    decode_edge_payload, decode_node_payload, encode_edge_payload_to, encode_node_payload_to,
};
use crate::encoding::value::{decode_value, encode_value_to};
use crate::types::{Edge, ElementId, Label, Node, PropertyMap, Value};

/// Strategy for generating arbitrary element ids.
fn arb_id() -> impl Strategy<Value = ElementId> {
    any::<[u8; 12]>().prop_map(ElementId::from_bytes)
}

/// Strategy for generating arbitrary `Value` instances.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        // Filter out NaN since NaN != NaN
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Value::Float),
        ".*".prop_map(Value::Str),
        arb_id().prop_map(Value::NodeRef),
        arb_id().prop_map(Value::EdgeRef),
        arb_id().prop_map(Value::Id),
    ]
}

/// Strategy for generating arbitrary labels.
fn arb_label() -> impl Strategy<Value = Label> {
    "[a-zA-Z][a-zA-Z0-9_]*".prop_map(Label::new)
}

/// Strategy for generating arbitrary property maps.
fn arb_props() -> impl Strategy<Value = PropertyMap> {
    prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]*".prop_map(String::from), arb_value()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for generating arbitrary nodes.
fn arb_node() -> impl Strategy<Value = Node> {
    (arb_id(), prop::collection::vec(arb_label(), 0..4), arb_props()).prop_map(
        |(id, labels, properties)| {
            let mut node = Node::new(id);
            node.labels = labels;
            node.properties = properties;
            node
        },
    )
}

/// Strategy for generating arbitrary edges.
fn arb_edge() -> impl Strategy<Value = Edge> {
    (
        arb_id(),
        arb_id(),
        arb_id(),
        any::<bool>(),
        prop::collection::vec(arb_label(), 0..4),
        arb_props(),
    )
        .prop_map(|(id, src, dst, directed, labels, properties)| {
            let mut edge = Edge::new(id, src, dst);
            edge.directed = directed;
            edge.labels = labels;
            edge.properties = properties;
            edge
        })
}

fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(value, &mut buf).expect("encoding should succeed");
    buf
}

proptest! {
    #[test]
    fn value_roundtrip(value in arb_value()) {
        let encoded = encode_value(&value);
        let (decoded, consumed) = decode_value(&encoded).expect("decoding should succeed");
        prop_assert_eq!(value, decoded);
        prop_assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn node_payload_roundtrip(node in arb_node()) {
        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).expect("encoding should succeed");
        let decoded = decode_node_payload(node.id, &buf).expect("decoding should succeed");
        prop_assert_eq!(node, decoded);
    }

    #[test]
    fn edge_payload_roundtrip(edge in arb_edge()) {
        let mut buf = Vec::new();
        encode_edge_payload_to(&edge, &mut buf).expect("encoding should succeed");
        let decoded = decode_edge_payload(edge.id, &buf).expect("decoding should succeed");
        prop_assert_eq!(edge, decoded);
    }

    #[test]
    fn element_id_string_form(id in arb_id()) {
        let s = id.to_string();
        prop_assert_eq!(s.len(), 16);
        prop_assert!(s.bytes().all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_'));
        let parsed: ElementId = s.parse().expect("parse should succeed");
        prop_assert_eq!(parsed, id);
    }

    /// Arbitrary bytes must decode to an error or a value, never panic.
    #[test]
    fn arbitrary_bytes_dont_crash(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_value(&bytes);
    }

    /// Every strict prefix of a valid encoding must fail to decode a node.
    #[test]
    fn truncated_node_payload_errors(node in arb_node()) {
        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).expect("encoding should succeed");
        for cut in 0..buf.len() {
            prop_assert!(decode_node_payload(node.id, &buf[..cut]).is_err());
        }
    }

    /// Mutated encodings must decode to an error or a value, never panic.
    #[test]
    fn mutated_encoding_doesnt_crash(
        value in arb_value(),
        mutation_idx in any::<usize>(),
        mutation_val in any::<u8>(),
    ) {
        let mut encoded = encode_value(&value);
        if !encoded.is_empty() {
            let idx = mutation_idx % encoded.len();
            encoded[idx] = mutation_val;
            let _ = decode_value(&encoded);
        }
    }

    /// Oversized length headers must error out, not attempt the allocation.
    #[test]
    fn large_length_header_doesnt_panic(len_bytes in any::<[u8; 4]>()) {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&len_bytes);
        bytes.extend_from_slice(&[b'x'; 16]);
        let _ = decode_value(&bytes);
    }
}
