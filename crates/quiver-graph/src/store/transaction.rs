//! Transactional entity operations.

use std::cell::RefCell;

use quiver_core::encoding::keys::{adj_scan_bounds, encode_adj_key};
use quiver_core::encoding::{
    decode_edge_payload, decode_node_payload, encode_edge_payload_to, encode_node_payload_to,
};
use quiver_core::{AdjEntry, Dir, Edge, ElementId, Node};
use quiver_storage::{ColumnFamily, KvTransaction};

use crate::error::{GraphError, GraphResult};
use crate::index::AdjIter;

use super::scan::{EdgeIter, NodeIter};

/// A graph transaction, the only mutation surface of the store.
///
/// Reads observe the transaction's begin-time snapshot amended by its own
/// writes. Mutations keep the adjacency index consistent with the edge
/// records they touch; commit applies everything atomically or fails with
/// a retryable conflict.
///
/// Entities returned by the `get_*` family are owned by the caller.
/// Iterators borrow the transaction and must be released before
/// [`commit`](Self::commit) or [`rollback`](Self::rollback).
pub struct GraphTransaction<'db> {
    kv: KvTransaction<'db>,
    // Every entity write serializes into this one buffer.
    scratch: RefCell<Vec<u8>>,
}

impl<'db> GraphTransaction<'db> {
    pub(crate) fn new(kv: KvTransaction<'db>) -> Self {
        Self { kv, scratch: RefCell::new(Vec::with_capacity(256)) }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Gets a node by id.
    ///
    /// The read is not tracked for conflict detection.
    ///
    /// # Errors
    ///
    /// Propagates storage errors; a record that fails to decode is
    /// corruption.
    pub fn get_node(&self, id: ElementId) -> GraphResult<Option<Node>> {
        match self.kv.get(ColumnFamily::Node, id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_node_payload(id, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Checks whether a node exists, without decoding its record.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn node_exists(&self, id: ElementId) -> GraphResult<bool> {
        Ok(self.kv.get(ColumnFamily::Node, id.as_bytes())?.is_some())
    }

    /// Writes a node record, inserting or overwriting.
    ///
    /// The adjacency index is untouched; it tracks edges only.
    ///
    /// # Errors
    ///
    /// Propagates storage and encoding errors.
    pub fn put_node(&self, node: &Node) -> GraphResult<()> {
        let mut buf = self.scratch.borrow_mut();
        buf.clear();
        encode_node_payload_to(node, &mut buf)?;
        self.kv.put(ColumnFamily::Node, node.id.as_bytes(), &buf)?;
        Ok(())
    }

    /// Deletes a node record and every adjacency entry indexed under it,
    /// along with each entry's reverse under the opposite endpoint.
    ///
    /// Incident edge records are not deleted; callers that need a cascade
    /// must delete the incident edges first. A dangling edge record is
    /// tolerated until explicitly deleted or overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the node does not exist.
    pub fn delete_node(&self, id: ElementId) -> GraphResult<()> {
        if self.kv.get(ColumnFamily::Node, id.as_bytes())?.is_none() {
            return Err(GraphError::NotFound(id));
        }
        self.kv.delete(ColumnFamily::Node, id.as_bytes())?;

        // Collect the incident entries first; the iterator borrows the
        // transaction.
        let mut entries = Vec::new();
        {
            let mut iter = self.iterate_adj(id, Dir::Out, Dir::In)?;
            while let Some(entry) = iter.next_entry()? {
                entries.push(entry);
            }
        }
        for entry in entries {
            self.delete_adj_pair(entry)?;
        }
        Ok(())
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Gets an edge by id.
    ///
    /// The read is not tracked for conflict detection.
    ///
    /// # Errors
    ///
    /// Propagates storage errors; a record that fails to decode is
    /// corruption.
    pub fn get_edge(&self, id: ElementId) -> GraphResult<Option<Edge>> {
        match self.kv.get(ColumnFamily::Edge, id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_edge_payload(id, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Checks whether an edge exists, without decoding its record.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn edge_exists(&self, id: ElementId) -> GraphResult<bool> {
        Ok(self.kv.get(ColumnFamily::Edge, id.as_bytes())?.is_some())
    }

    /// Writes an edge record, inserting or overwriting, and keeps the
    /// adjacency index consistent.
    ///
    /// Both endpoint nodes are read with conflict tracking, so an edge
    /// insert races correctly against a concurrent endpoint delete and
    /// vice versa. Overwriting an existing edge may change labels and
    /// properties but never endpoints or directedness.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if an endpoint node does not
    /// exist and [`GraphError::EdgeDataMismatch`] if an existing record
    /// disagrees on endpoints or direction.
    pub fn put_edge(&self, edge: &Edge) -> GraphResult<()> {
        for endpoint in [edge.src, edge.dst] {
            if self.kv.get_for_update(ColumnFamily::Node, endpoint.as_bytes())?.is_none() {
                return Err(GraphError::NotFound(endpoint));
            }
        }

        let is_new = match self.kv.get(ColumnFamily::Edge, edge.id.as_bytes())? {
            Some(bytes) => {
                let existing = decode_edge_payload(edge.id, &bytes)?;
                if existing.src != edge.src
                    || existing.dst != edge.dst
                    || existing.directed != edge.directed
                {
                    return Err(GraphError::EdgeDataMismatch(edge.id));
                }
                false
            }
            None => true,
        };

        {
            let mut buf = self.scratch.borrow_mut();
            buf.clear();
            encode_edge_payload_to(edge, &mut buf)?;
            self.kv.put(ColumnFamily::Edge, edge.id.as_bytes(), &buf)?;
        }

        if is_new {
            let dir = if edge.directed { Dir::Out } else { Dir::Simple };
            let entry = AdjEntry::new(edge.src, dir, edge.id, edge.dst);
            self.put_adj_entry(entry)?;
            self.put_adj_entry(entry.reverse())?;
        }
        Ok(())
    }

    /// Deletes an edge record and both of its adjacency entries.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the edge does not exist.
    pub fn delete_edge(&self, id: ElementId) -> GraphResult<()> {
        let Some(edge) = self.get_edge(id)? else {
            return Err(GraphError::NotFound(id));
        };
        self.kv.delete(ColumnFamily::Edge, id.as_bytes())?;

        let dir = if edge.directed { Dir::Out } else { Dir::Simple };
        self.delete_adj_pair(AdjEntry::new(edge.src, dir, edge.id, edge.dst))?;
        Ok(())
    }

    /// Deletes a node together with its incident edges.
    ///
    /// Convenience for the detach-delete pattern: every incident edge is
    /// deleted first (removing its records and index entries), then the
    /// node itself. The individual deletes are not atomic with respect
    /// to each other inside the transaction, but the transaction commits
    /// or rolls back as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the node does not exist.
    pub fn detach_delete_node(&self, id: ElementId) -> GraphResult<()> {
        if self.kv.get(ColumnFamily::Node, id.as_bytes())?.is_none() {
            return Err(GraphError::NotFound(id));
        }

        let mut edge_ids = Vec::new();
        {
            let mut iter = self.iterate_adj(id, Dir::Out, Dir::In)?;
            while let Some(entry) = iter.next_entry()? {
                edge_ids.push(entry.edge);
            }
        }
        // A self loop appears once per direction slice; delete each edge
        // once.
        edge_ids.sort();
        edge_ids.dedup();
        for edge_id in edge_ids {
            self.delete_edge(edge_id)?;
        }
        self.delete_node(id)
    }

    // ========================================================================
    // Adjacency
    // ========================================================================

    /// Counts `node`'s adjacency entries with direction in
    /// `min_dir..=max_dir`.
    ///
    /// A full-range count is the node's degree; note that a self loop
    /// contributes two entries.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn degree(&self, node: ElementId, min_dir: Dir, max_dir: Dir) -> GraphResult<usize> {
        let mut iter = self.iterate_adj(node, min_dir, max_dir)?;
        let mut count = 0;
        while iter.next_entry()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Scans `node`'s adjacency entries with direction in
    /// `min_dir..=max_dir`.
    ///
    /// The scan observes the snapshot and is not tracked for conflict
    /// detection.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn iterate_adj<'txn>(
        &'txn self,
        node: ElementId,
        min_dir: Dir,
        max_dir: Dir,
    ) -> GraphResult<AdjIter<'txn, 'db>> {
        let (lo, hi) = adj_scan_bounds(node, min_dir, max_dir);
        let inner = self.kv.iter(ColumnFamily::Adj, Some(lo.as_slice()), Some(hi.as_slice()))?;
        Ok(AdjIter::new(inner))
    }

    /// Scans all nodes in element-id order.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn nodes<'txn>(&'txn self) -> GraphResult<NodeIter<'txn, 'db>> {
        Ok(NodeIter::new(self.kv.iter(ColumnFamily::Node, None, None)?))
    }

    /// Scans all edges in element-id order.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn edges<'txn>(&'txn self) -> GraphResult<EdgeIter<'txn, 'db>> {
        Ok(EdgeIter::new(self.kv.iter(ColumnFamily::Edge, None, None)?))
    }

    fn put_adj_entry(&self, entry: AdjEntry) -> GraphResult<()> {
        let key = encode_adj_key(entry.src, entry.dir, entry.edge);
        self.kv.put(ColumnFamily::Adj, &key, entry.dst.as_bytes())?;
        Ok(())
    }

    /// Deletes an adjacency entry and its reverse.
    fn delete_adj_pair(&self, entry: AdjEntry) -> GraphResult<()> {
        let key = encode_adj_key(entry.src, entry.dir, entry.edge);
        self.kv.delete(ColumnFamily::Adj, &key)?;
        let rev = entry.reverse();
        let key = encode_adj_key(rev.src, rev.dir, rev.edge);
        self.kv.delete(ColumnFamily::Adj, &key)?;
        Ok(())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Raw access to the underlying key-value transaction.
    ///
    /// Useful for caller metadata in the default column family and for
    /// tests that need to observe the storage contract directly.
    #[must_use]
    pub fn kv(&self) -> &KvTransaction<'db> {
        &self.kv
    }

    /// Creates a savepoint.
    pub fn set_savepoint(&self) {
        self.kv.set_savepoint();
    }

    /// Discards all writes made since the most recent savepoint.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn rollback_to_savepoint(&self) -> GraphResult<()> {
        self.kv.rollback_to_savepoint()?;
        Ok(())
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns a retryable storage error when a conflicting transaction
    /// committed first; the caller reconstructs and retries.
    pub fn commit(self) -> GraphResult<()> {
        self.kv.commit()?;
        Ok(())
    }

    /// Rolls the transaction back, discarding all writes.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn rollback(self) -> GraphResult<()> {
        self.kv.rollback()?;
        Ok(())
    }
}
