//! Graph store and transactional entity operations.

mod scan;
mod transaction;

use std::path::Path;

use quiver_storage::{KvStore, StoreConfig};

use crate::error::GraphResult;

pub use scan::{EdgeIter, NodeIter};
pub use transaction::GraphTransaction;

/// A graph database store.
///
/// The store owns the key-value backend; all reads and mutations go
/// through [`GraphTransaction`]s obtained from [`begin`](Self::begin).
/// The handle is cheap to share and thread-safe; transactions are not.
///
/// # Example
///
/// ```no_run
/// use quiver_core::{ElementId, Node};
/// use quiver_graph::GraphStore;
///
/// # fn main() -> quiver_graph::GraphResult<()> {
/// let store = GraphStore::open("graph.db")?;
///
/// let tx = store.begin();
/// let node = Node::new(ElementId::random()).with_label("Person");
/// tx.put_node(&node)?;
/// tx.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct GraphStore {
    kv: KvStore,
}

impl GraphStore {
    /// Opens or creates a store at the given path with default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from opening the backend.
    pub fn open(path: impl AsRef<Path>) -> GraphResult<Self> {
        Self::open_with_config(path, &StoreConfig::default())
    }

    /// Opens or creates a store with custom storage configuration.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from opening the backend.
    pub fn open_with_config(path: impl AsRef<Path>, config: &StoreConfig) -> GraphResult<Self> {
        Ok(Self { kv: KvStore::open(path, config)? })
    }

    /// Begins a transaction with a snapshot set at begin.
    #[must_use]
    pub fn begin(&self) -> GraphTransaction<'_> {
        GraphTransaction::new(self.kv.begin())
    }

    /// Flushes buffered writes to disk.
    ///
    /// With the write-ahead log disabled this is the only durability
    /// point; call it before closing if the data must survive a crash.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn flush(&self) -> GraphResult<()> {
        self.kv.flush()?;
        Ok(())
    }
}
