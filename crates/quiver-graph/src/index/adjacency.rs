//! Adjacency index cursors.
//!
//! The adjacency index stores one entry per edge per endpoint under the
//! composite key `(node, dir, edge)`. Because the direction byte sits
//! between the node and the edge id, one node's entries form contiguous
//! `out`, `simple`, `in` slices, and a direction filter is just a choice
//! of scan bounds.

use quiver_core::encoding::keys::decode_adj_entry;
use quiver_core::AdjEntry;
use quiver_storage::KvIter;

use crate::error::{GraphError, GraphResult};

/// A streaming scan over a node's slice of the adjacency index.
///
/// Produced by
/// [`GraphTransaction::iterate_adj`](crate::GraphTransaction::iterate_adj).
/// Entries arrive in `(node, dir, edge)` key order. The cursor borrows
/// its transaction and must be released before the transaction closes.
pub struct AdjIter<'txn, 'db> {
    inner: KvIter<'txn, 'db>,
}

impl<'txn, 'db> AdjIter<'txn, 'db> {
    pub(crate) fn new(inner: KvIter<'txn, 'db>) -> Self {
        Self { inner }
    }

    /// Returns the next adjacency entry, or `None` when the scan is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates storage errors; index bytes that fail to decode are
    /// [`GraphError::CorruptedIndex`].
    pub fn next_entry(&mut self) -> GraphResult<Option<AdjEntry>> {
        if !self.inner.advance()? {
            return Ok(None);
        }
        let (key, value) = match (self.inner.key(), self.inner.value()) {
            (Some(k), Some(v)) => (k, v),
            _ => return Err(GraphError::CorruptedIndex("cursor entry without bytes".to_owned())),
        };
        decode_adj_entry(key, value)
            .map(Some)
            .map_err(|e| GraphError::CorruptedIndex(e.to_string()))
    }

    /// Collects the remaining entries.
    ///
    /// Convenience for tests and small fan-outs; traversal operators
    /// stream instead.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`next_entry`](Self::next_entry).
    pub fn collect_entries(mut self) -> GraphResult<Vec<AdjEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}
