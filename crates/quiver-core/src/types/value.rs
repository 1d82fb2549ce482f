//! Property values.
//!
//! This module provides the [`Value`] enum, the dynamically tagged value
//! type shared by the storage layer and the query executor.
//!
//! # Example
//!
//! ```
//! use quiver_core::Value;
//!
//! let name: Value = "Ada".into();
//! let age: Value = 36i64.into();
//!
//! assert_eq!(name.as_str(), Some("Ada"));
//! assert_eq!(age.as_int(), Some(36));
//! assert!(age.is_truthy());
//! assert!(!Value::Null.is_truthy());
//! ```

use serde::{Deserialize, Serialize};

use super::ElementId;
use crate::error::CoreError;

/// A dynamically tagged value.
///
/// # Supported Types
///
/// | Variant | Rust Type | Use Case |
/// |-----------|-------------|----------|
/// | `Str` | `String` | Text properties |
/// | `Int` | `i64` | Integers, counters |
/// | `Float` | `f64` | Measurements |
/// | `NodeRef` | `ElementId` | Reference to an existing node |
/// | `EdgeRef` | `ElementId` | Reference to an existing edge |
/// | `Id` | `ElementId` | Bare identifier, not tied to an entity |
/// | `Bool` | `bool` | Flags |
/// | `Null` | - | Missing/absent values |
///
/// Equality (`PartialEq`) is structural: an `Int` never equals a `Float`.
/// Query-level comparison with numeric promotion lives in [`Value::eql`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 string.
    Str(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Reference to a node.
    NodeRef(ElementId),
    /// Reference to an edge.
    EdgeRef(ElementId),
    /// A bare element id.
    Id(ElementId),
    /// Boolean value.
    Bool(bool),
    /// Null/missing value.
    Null,
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the referenced node id if this is a node reference.
    #[inline]
    #[must_use]
    pub const fn as_node_ref(&self) -> Option<ElementId> {
        match self {
            Self::NodeRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the referenced edge id if this is an edge reference.
    #[inline]
    #[must_use]
    pub const fn as_edge_ref(&self) -> Option<ElementId> {
        match self {
            Self::EdgeRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the bare id if this is an id value.
    #[inline]
    #[must_use]
    pub const fn as_id(&self) -> Option<ElementId> {
        match self {
            Self::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns a short name for the value's tag, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::NodeRef(_) => "node_ref",
            Self::EdgeRef(_) => "edge_ref",
            Self::Id(_) => "id",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }

    /// Returns the truthiness of the value.
    ///
    /// `false`, numeric zero, NaN, the empty string, and null are falsy;
    /// every other value is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Null => false,
            Self::NodeRef(_) | Self::EdgeRef(_) | Self::Id(_) => true,
        }
    }

    /// Adds two values.
    ///
    /// Strings concatenate, integers add with overflow detection, and any
    /// int/float mix widens to float. Every other combination is `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IntOverflow`] when int addition overflows.
    pub fn add(&self, other: &Self) -> Result<Self, CoreError> {
        Ok(match (self, other) {
            (Self::Str(a), Self::Str(b)) => {
                let mut s = String::with_capacity(a.len() + b.len());
                s.push_str(a);
                s.push_str(b);
                Self::Str(s)
            }
            (Self::Int(a), Self::Int(b)) => {
                Self::Int(a.checked_add(*b).ok_or(CoreError::IntOverflow)?)
            }
            (Self::Int(a), Self::Float(b)) => Self::Float(*a as f64 + b),
            (Self::Float(a), Self::Int(b)) => Self::Float(a + *b as f64),
            (Self::Float(a), Self::Float(b)) => Self::Float(a + b),
            _ => Self::Null,
        })
    }

    /// Subtracts `other` from `self`.
    ///
    /// Numeric only, with the same widening rules as [`Value::add`]; any
    /// other combination is `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IntOverflow`] when int subtraction overflows.
    pub fn sub(&self, other: &Self) -> Result<Self, CoreError> {
        Ok(match (self, other) {
            (Self::Int(a), Self::Int(b)) => {
                Self::Int(a.checked_sub(*b).ok_or(CoreError::IntOverflow)?)
            }
            (Self::Int(a), Self::Float(b)) => Self::Float(*a as f64 - b),
            (Self::Float(a), Self::Int(b)) => Self::Float(a - *b as f64),
            (Self::Float(a), Self::Float(b)) => Self::Float(a - b),
            _ => Self::Null,
        })
    }

    /// Compares two values for query-level equality.
    ///
    /// Structural, except that ints and floats cross-compare under
    /// lossless promotion. Null equals only null; values with distinct
    /// non-numeric tags are unequal.
    #[must_use]
    pub fn eql(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => num_eq(*a, *b),
            (a, b) => a == b,
        }
    }
}

/// Exact int/float comparison.
///
/// The double round trip rejects floats that only collide with the int
/// after rounding (e.g. `2^53 + 1` vs `2^53 as f64`).
fn num_eq(i: i64, f: f64) -> bool {
    (i as f64) == f && (f as i64) == i
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::NodeRef(id) => write!(f, "node({id})"),
            Self::EdgeRef(id) => write!(f, "edge({id})"),
            Self::Id(id) => write!(f, "{id}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::Float(f64::NAN).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());

        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::Id(ElementId::random()).is_truthy());
    }

    #[test]
    fn add_strings_concatenates() {
        let v = Value::from("foo").add(&Value::from("bar")).unwrap();
        assert_eq!(v, Value::from("foobar"));
    }

    #[test]
    fn add_numeric_widens() {
        assert_eq!(Value::Int(1).add(&Value::Int(2)).unwrap(), Value::Int(3));
        assert_eq!(Value::Int(1).add(&Value::Float(0.5)).unwrap(), Value::Float(1.5));
        assert_eq!(Value::Float(1.0).add(&Value::Float(2.0)).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn add_mismatched_is_null() {
        assert_eq!(Value::Int(1).add(&Value::from("x")).unwrap(), Value::Null);
        assert_eq!(Value::Null.add(&Value::Null).unwrap(), Value::Null);
        assert_eq!(Value::Bool(true).add(&Value::Bool(true)).unwrap(), Value::Null);
    }

    #[test]
    fn add_overflow_is_detected() {
        assert!(Value::Int(i64::MAX).add(&Value::Int(1)).is_err());
        assert!(Value::Int(i64::MIN).sub(&Value::Int(1)).is_err());
    }

    #[test]
    fn sub_numeric_only() {
        assert_eq!(Value::Int(3).sub(&Value::Int(2)).unwrap(), Value::Int(1));
        assert_eq!(Value::from("a").sub(&Value::from("b")).unwrap(), Value::Null);
    }

    #[test]
    fn eql_promotes_numerics() {
        assert!(Value::Int(2).eql(&Value::Float(2.0)));
        assert!(Value::Float(2.0).eql(&Value::Int(2)));
        assert!(!Value::Int(2).eql(&Value::Float(2.5)));
    }

    #[test]
    fn eql_promotion_is_lossless() {
        // 2^53 + 1 rounds to 2^53 as f64; the two must stay distinct.
        let big = (1i64 << 53) + 1;
        assert!(!Value::Int(big).eql(&Value::Float((1i64 << 53) as f64)));
    }

    #[test]
    fn eql_distinct_tags_unequal() {
        let id = ElementId::random();
        assert!(!Value::NodeRef(id).eql(&Value::EdgeRef(id)));
        assert!(!Value::from("1").eql(&Value::Int(1)));
        assert!(!Value::Null.eql(&Value::Int(0)));
        assert!(Value::Null.eql(&Value::Null));
    }
}
