//! Full scans over node and edge records.

use quiver_core::encoding::{decode_edge_payload, decode_node_payload};
use quiver_core::{Edge, ElementId, Node};
use quiver_storage::KvIter;

use crate::error::{GraphError, GraphResult};

/// Decodes the element id out of a record key.
fn key_id(key: Option<&[u8]>) -> GraphResult<ElementId> {
    let key = key.ok_or_else(|| GraphError::CorruptedIndex("cursor has no key".to_owned()))?;
    Ok(ElementId::try_from_slice(key)?)
}

/// A streaming scan over all node records, in element-id order.
///
/// Each step decodes one record into an owned [`Node`]; the cursor itself
/// never buffers rows.
pub struct NodeIter<'txn, 'db> {
    inner: KvIter<'txn, 'db>,
}

impl<'txn, 'db> NodeIter<'txn, 'db> {
    pub(crate) fn new(inner: KvIter<'txn, 'db>) -> Self {
        Self { inner }
    }

    /// Returns the next node, or `None` when the scan is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates storage errors; a record that fails to decode is
    /// corruption.
    pub fn next_node(&mut self) -> GraphResult<Option<Node>> {
        if !self.inner.advance()? {
            return Ok(None);
        }
        let id = key_id(self.inner.key())?;
        let bytes = self
            .inner
            .value()
            .ok_or_else(|| GraphError::CorruptedIndex(format!("node {id} has no record bytes")))?;
        Ok(Some(decode_node_payload(id, bytes)?))
    }
}

/// A streaming scan over all edge records, in element-id order.
pub struct EdgeIter<'txn, 'db> {
    inner: KvIter<'txn, 'db>,
}

impl<'txn, 'db> EdgeIter<'txn, 'db> {
    pub(crate) fn new(inner: KvIter<'txn, 'db>) -> Self {
        Self { inner }
    }

    /// Returns the next edge, or `None` when the scan is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates storage errors; a record that fails to decode is
    /// corruption.
    pub fn next_edge(&mut self) -> GraphResult<Option<Edge>> {
        if !self.inner.advance()? {
            return Ok(None);
        }
        let id = key_id(self.inner.key())?;
        let bytes = self
            .inner
            .value()
            .ok_or_else(|| GraphError::CorruptedIndex(format!("edge {id} has no record bytes")))?;
        Ok(Some(decode_edge_payload(id, bytes)?))
    }
}
