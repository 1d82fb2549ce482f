//! Edge types for the graph.
//!
//! This module provides the [`Edge`] type, a directed or undirected
//! relationship between two nodes.
//!
//! # Example
//!
//! ```
//! use quiver_core::{Edge, ElementId};
//!
//! let ada = ElementId::random();
//! let dev = ElementId::random();
//!
//! let works_at = Edge::new(ElementId::random(), ada, dev)
//!     .with_label("WORKS_AT")
//!     .with_property("since", 2021i64);
//!
//! assert!(works_at.directed);
//! assert_eq!(works_at.src, ada);
//! assert_eq!(works_at.dst, dev);
//! ```

use serde::{Deserialize, Serialize};

use super::{ElementId, Label, PropertyMap, Value};

/// An edge in the graph.
///
/// The endpoint pair is always ordered `(src, dst)`. For undirected edges
/// the order is still recorded but carries no query semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: ElementId,
    /// Source node id.
    pub src: ElementId,
    /// Destination node id.
    pub dst: ElementId,
    /// Whether direction carries query semantics.
    pub directed: bool,
    /// Labels that categorize this edge, in insertion order.
    pub labels: Vec<Label>,
    /// Properties stored on this edge.
    pub properties: PropertyMap,
}

impl Edge {
    /// Creates a new directed edge from `src` to `dst`.
    #[must_use]
    pub const fn new(id: ElementId, src: ElementId, dst: ElementId) -> Self {
        Self {
            id,
            src,
            dst,
            directed: true,
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Creates a new undirected edge between `src` and `dst`.
    #[must_use]
    pub const fn undirected(id: ElementId, src: ElementId, dst: ElementId) -> Self {
        Self {
            id,
            src,
            dst,
            directed: false,
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Adds a label to this edge.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Adds a property to this edge.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Checks if this edge has a specific label.
    #[inline]
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }

    /// Gets a property value by key.
    #[inline]
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns `true` if both endpoints are the same node.
    #[inline]
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn edge_builder() {
        let (a, b) = (ElementId::random(), ElementId::random());
        let edge = Edge::new(ElementId::random(), a, b).with_label("KNOWS");

        assert!(edge.directed);
        assert!(edge.has_label("KNOWS"));
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn undirected_edge_keeps_endpoint_order() {
        let (a, b) = (ElementId::random(), ElementId::random());
        let edge = Edge::undirected(ElementId::random(), a, b);

        assert!(!edge.directed);
        assert_eq!(edge.src, a);
        assert_eq!(edge.dst, b);
    }

    #[test]
    fn self_loop() {
        let a = ElementId::random();
        assert!(Edge::new(ElementId::random(), a, a).is_self_loop());
    }
}
