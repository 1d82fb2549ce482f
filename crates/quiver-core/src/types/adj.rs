//! Adjacency index entries.
//!
//! Each stored edge is mirrored by two index entries, one per endpoint,
//! so that a single prefix scan on a node yields its incident edges in
//! either direction. The [`Dir`] byte partitions a node's slice of the
//! index into contiguous `out`, `simple`, and `in` ranges.

use serde::{Deserialize, Serialize};

use super::ElementId;

/// Direction tag of an adjacency entry, as stored in the index key.
///
/// The discriminants are the on-disk byte values; their order is what
/// makes a node's entries scan as contiguous direction slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Dir {
    /// Outgoing half of a directed edge.
    Out = 0,
    /// Either half of an undirected edge.
    Simple = 1,
    /// Incoming half of a directed edge.
    In = 2,
}

impl Dir {
    /// Returns the direction of the counterpart entry.
    ///
    /// `Out` and `In` swap; `Simple` is its own inverse.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::Simple => Self::Simple,
            Self::In => Self::Out,
        }
    }

    /// Returns the on-disk byte value.
    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decodes a direction from its on-disk byte value.
    #[inline]
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Out),
            1 => Some(Self::Simple),
            2 => Some(Self::In),
            _ => None,
        }
    }
}

/// One entry of the adjacency index.
///
/// For a directed edge `u -> v` with id `e`, the index holds
/// `(u, Out, e) -> v` and `(v, In, e) -> u`. For an undirected edge both
/// entries use `Simple`. A self loop produces two entries with the same
/// endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjEntry {
    /// The node this entry is indexed under.
    pub src: ElementId,
    /// Direction of the edge relative to `src`.
    pub dir: Dir,
    /// The incident edge.
    pub edge: ElementId,
    /// The opposite endpoint.
    pub dst: ElementId,
}

impl AdjEntry {
    /// Creates an adjacency entry.
    #[inline]
    #[must_use]
    pub const fn new(src: ElementId, dir: Dir, edge: ElementId, dst: ElementId) -> Self {
        Self { src, dir, edge, dst }
    }

    /// Returns the counterpart entry indexed under the opposite endpoint.
    ///
    /// Every stored entry is matched by exactly one reverse entry.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        Self { src: self.dst, dir: self.dir.inverse(), edge: self.edge, dst: self.src }
    }
}
