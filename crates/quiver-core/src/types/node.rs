//! Node types for the graph.
//!
//! This module provides the [`Node`] type and the [`Label`] newtype used
//! to categorize nodes and edges.
//!
//! # Example
//!
//! ```
//! use quiver_core::{ElementId, Node};
//!
//! let node = Node::new(ElementId::random())
//!     .with_label("Person")
//!     .with_property("name", "Ada")
//!     .with_property("age", 36i64);
//!
//! assert!(node.has_label("Person"));
//! assert_eq!(node.get_property("name").and_then(|v| v.as_str()), Some("Ada"));
//! ```

use serde::{Deserialize, Serialize};

use super::{ElementId, PropertyMap, Value};

/// A label that categorizes a node or edge.
///
/// Labels group entities into categories like "Person" or "Company". An
/// entity can carry multiple labels; the set is unordered semantically
/// but stored in insertion order.
///
/// # Example
///
/// ```
/// use quiver_core::Label;
///
/// let label = Label::new("Person");
/// assert_eq!(label.as_str(), "Person");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    /// Creates a new label.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gets the label name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    #[inline]
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A node in the graph.
///
/// Nodes carry a unique [`ElementId`], a set of labels, and an
/// insertion-ordered property map. Values returned by the storage layer
/// are owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: ElementId,
    /// Labels that categorize this node, in insertion order.
    pub labels: Vec<Label>,
    /// Properties stored on this node.
    pub properties: PropertyMap,
}

impl Node {
    /// Creates a new node with the given id and no labels or properties.
    #[must_use]
    pub const fn new(id: ElementId) -> Self {
        Self { id, labels: Vec::new(), properties: PropertyMap::new() }
    }

    /// Adds a label to this node.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Adds a property to this node.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Checks if this node has a specific label.
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

    /// Sets a property value.
    #[inline]
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key, value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn node_builder() {
        let id = ElementId::random();
        let node = Node::new(id).with_label("Person").with_property("name", "Ada");

        assert_eq!(node.id, id);
        assert!(node.has_label("Person"));
        assert!(!node.has_label("Company"));
        assert_eq!(node.get_property("name"), Some(&Value::from("Ada")));
        assert_eq!(node.get_property("missing"), None);
    }

    #[test]
    fn node_mutation() {
        let mut node = Node::new(ElementId::random());
        node.set_property("key", "value");
        assert_eq!(node.get_property("key"), Some(&Value::from("value")));
    }
}
