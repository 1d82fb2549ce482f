//! Serialization for node and edge records.
//!
//! # Format
//!
//! Label sets and property maps are count-prefixed sequences:
//!
//! ```text
//! labels     = count(u32 BE) { len(u32 BE) utf8-bytes }*
//! properties = count(u32 BE) { len(u32 BE) key-bytes value }*
//! ```
//!
//! A node record is `labels properties`. An edge record prepends the
//! structural fields:
//!
//! ```text
//! edge = src(12) dst(12) directed(u8) labels properties
//! ```
//!
//! Both decoders consume the whole input; trailing bytes are corruption.

use crate::error::CoreError;
use crate::types::{Edge, ElementId, Label, Node, PropertyMap};

use super::keys::ELEMENT_ID_LEN;
use super::value::{decode_bytes, decode_value, encode_bytes_to, encode_value_to};

/// Appends the encoded label set to `buf`.
fn encode_labels_to(labels: &[Label], buf: &mut Vec<u8>) -> Result<(), CoreError> {
    let count = u32::try_from(labels.len())
        .map_err(|_| CoreError::Encoding("too many labels".to_owned()))?;
    buf.extend_from_slice(&count.to_be_bytes());
    for label in labels {
        encode_bytes_to(label.as_str().as_bytes(), buf)?;
    }
    Ok(())
}

/// Decodes a label set, returning it with the number of bytes consumed.
fn decode_labels(bytes: &[u8]) -> Result<(Vec<Label>, usize), CoreError> {
    let arr: [u8; 4] = bytes
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| CoreError::truncated("label count"))?;
    let count = u32::from_be_bytes(arr) as usize;

    let mut labels = Vec::with_capacity(count.min(64));
    let mut pos = 4;
    for _ in 0..count {
        let (data, consumed) = decode_bytes(&bytes[pos..])?;
        let name = std::str::from_utf8(data)
            .map_err(|e| CoreError::Corruption(format!("invalid UTF-8 in label: {e}")))?;
        labels.push(Label::new(name));
        pos += consumed;
    }
    Ok((labels, pos))
}

/// Appends the encoded property map to `buf`, in insertion order.
fn encode_properties_to(props: &PropertyMap, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    let count = u32::try_from(props.len())
        .map_err(|_| CoreError::Encoding("too many properties".to_owned()))?;
    buf.extend_from_slice(&count.to_be_bytes());
    for (key, value) in props.iter() {
        encode_bytes_to(key.as_bytes(), buf)?;
        encode_value_to(value, buf)?;
    }
    Ok(())
}

/// Decodes a property map, returning it with the number of bytes consumed.
fn decode_properties(bytes: &[u8]) -> Result<(PropertyMap, usize), CoreError> {
    let arr: [u8; 4] = bytes
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| CoreError::truncated("property count"))?;
    let count = u32::from_be_bytes(arr) as usize;

    let mut props = PropertyMap::new();
    let mut pos = 4;
    for _ in 0..count {
        let (data, consumed) = decode_bytes(&bytes[pos..])?;
        let key = std::str::from_utf8(data)
            .map_err(|e| CoreError::Corruption(format!("invalid UTF-8 in property key: {e}")))?
            .to_owned();
        pos += consumed;
        let (value, consumed) = decode_value(&bytes[pos..])?;
        pos += consumed;
        props.insert(key, value);
    }
    Ok((props, pos))
}

/// Appends a node record (labels then properties) to `buf`.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if any component exceeds its length
/// prefix.
pub fn encode_node_payload_to(node: &Node, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    encode_labels_to(&node.labels, buf)?;
    encode_properties_to(&node.properties, buf)
}

/// Decodes a node record stored under `id`.
///
/// # Errors
///
/// Returns [`CoreError::Corruption`] on truncated or trailing input.
pub fn decode_node_payload(id: ElementId, bytes: &[u8]) -> Result<Node, CoreError> {
    let (labels, consumed) = decode_labels(bytes)?;
    let (properties, consumed_props) = decode_properties(&bytes[consumed..])?;
    expect_consumed(bytes.len(), consumed + consumed_props, "node record")?;
    Ok(Node { id, labels, properties })
}

/// Appends an edge record to `buf`.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if any component exceeds its length
/// prefix.
pub fn encode_edge_payload_to(edge: &Edge, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    buf.extend_from_slice(edge.src.as_bytes());
    buf.extend_from_slice(edge.dst.as_bytes());
    buf.push(u8::from(edge.directed));
    encode_labels_to(&edge.labels, buf)?;
    encode_properties_to(&edge.properties, buf)
}

/// Decodes an edge record stored under `id`.
///
/// # Errors
///
/// Returns [`CoreError::Corruption`] on truncated or trailing input.
pub fn decode_edge_payload(id: ElementId, bytes: &[u8]) -> Result<Edge, CoreError> {
    const HEADER: usize = ELEMENT_ID_LEN * 2 + 1;
    if bytes.len() < HEADER {
        return Err(CoreError::truncated("edge record header"));
    }
    let src = ElementId::try_from_slice(&bytes[..ELEMENT_ID_LEN])?;
    let dst = ElementId::try_from_slice(&bytes[ELEMENT_ID_LEN..ELEMENT_ID_LEN * 2])?;
    let directed = match bytes[ELEMENT_ID_LEN * 2] {
        0 => false,
        1 => true,
        other => {
            return Err(CoreError::Corruption(format!("invalid directed flag: {other:#04x}")))
        }
    };

    let rest = &bytes[HEADER..];
    let (labels, consumed) = decode_labels(rest)?;
    let (properties, consumed_props) = decode_properties(&rest[consumed..])?;
    expect_consumed(rest.len(), consumed + consumed_props, "edge record")?;
    Ok(Edge { id, src, dst, directed, labels, properties })
}

/// Rejects records with bytes left over after decoding.
fn expect_consumed(len: usize, consumed: usize, context: &str) -> Result<(), CoreError> {
    if consumed == len {
        Ok(())
    } else {
        Err(CoreError::Corruption(format!(
            "{context} has {} trailing bytes",
            len - consumed
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn node_payload_roundtrip() {
        let node = Node::new(ElementId::random())
            .with_label("Person")
            .with_label("Employee")
            .with_property("name", "Ada")
            .with_property("age", 36i64)
            .with_property("score", 0.5f64);

        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).unwrap();
        let decoded = decode_node_payload(node.id, &buf).unwrap();
        assert_eq!(decoded, node);
    }

    #[test]
    fn empty_node_payload_roundtrip() {
        let node = Node::new(ElementId::random());
        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).unwrap();
        assert_eq!(buf, vec![0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode_node_payload(node.id, &buf).unwrap(), node);
    }

    #[test]
    fn node_property_order_survives_roundtrip() {
        let node = Node::new(ElementId::random())
            .with_property("z", 1i64)
            .with_property("a", 2i64)
            .with_property("m", 3i64);

        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).unwrap();
        let decoded = decode_node_payload(node.id, &buf).unwrap();

        let keys: Vec<_> = decoded.properties.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn edge_payload_roundtrip() {
        let edge = Edge::new(ElementId::random(), ElementId::random(), ElementId::random())
            .with_label("KNOWS")
            .with_property("weight", 0.8f64)
            .with_property("since", Value::Int(2020));

        let mut buf = Vec::new();
        encode_edge_payload_to(&edge, &mut buf).unwrap();
        assert_eq!(decode_edge_payload(edge.id, &buf).unwrap(), edge);
    }

    #[test]
    fn undirected_edge_roundtrip() {
        let edge = Edge::undirected(ElementId::random(), ElementId::random(), ElementId::random());
        let mut buf = Vec::new();
        encode_edge_payload_to(&edge, &mut buf).unwrap();
        let decoded = decode_edge_payload(edge.id, &buf).unwrap();
        assert!(!decoded.directed);
        assert_eq!(decoded, edge);
    }

    #[test]
    fn decode_rejects_truncation() {
        let node = Node::new(ElementId::random()).with_property("k", "v");
        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).unwrap();

        for cut in 0..buf.len() {
            assert!(decode_node_payload(node.id, &buf[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let node = Node::new(ElementId::random());
        let mut buf = Vec::new();
        encode_node_payload_to(&node, &mut buf).unwrap();
        buf.push(0);
        assert!(decode_node_payload(node.id, &buf).is_err());
    }

    #[test]
    fn decode_rejects_bad_directed_flag() {
        let edge = Edge::new(ElementId::random(), ElementId::random(), ElementId::random());
        let mut buf = Vec::new();
        encode_edge_payload_to(&edge, &mut buf).unwrap();
        buf[ELEMENT_ID_LEN * 2] = 7;
        assert!(decode_edge_payload(edge.id, &buf).is_err());
    }
}
