//! The database handle.

use std::path::Path;

use quiver_core::Value;
use quiver_graph::{GraphStore, GraphTransaction};
use quiver_query::{ExecOptions, Executor, Params, Plan};
use tracing::info;

use crate::config::Config;
use crate::error::Error;

/// An open graph database.
///
/// The handle carries only the backend and configuration; it holds no
/// global state and is shared freely between threads. Queries running in
/// parallel are isolated by their transactions' snapshots.
///
/// # Example
///
/// ```no_run
/// use quiver::{Database, ElementId, Node};
///
/// # fn main() -> Result<(), quiver::Error> {
/// let db = Database::open("graph.db")?;
/// let tx = db.begin();
/// tx.put_node(&Node::new(ElementId::random()).with_label("Person"))?;
/// tx.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct Database {
    store: GraphStore,
    pull_budget: Option<u64>,
}

impl Database {
    /// Opens or creates a database at the given path with default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from opening the backend.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with_config(&Config::new(path.as_ref()))
    }

    /// Opens or creates a database with the given configuration.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from opening the backend.
    pub fn open_with_config(config: &Config) -> Result<Self, Error> {
        let store = GraphStore::open_with_config(&config.path, &config.store_config())?;
        info!(path = %config.path.display(), "database open");
        Ok(Self { store, pull_budget: config.pull_budget })
    }

    /// Begins a transaction with a snapshot set at begin.
    #[must_use]
    pub fn begin(&self) -> GraphTransaction<'_> {
        self.store.begin()
    }

    /// Runs a plan to exhaustion in its own transaction and commits.
    ///
    /// Convenience for parameter-free, single-shot queries; callers that
    /// need parameters, streaming, or control over commit timing drive an
    /// [`Executor`] themselves.
    ///
    /// # Errors
    ///
    /// Propagates execution errors; the transaction is rolled back on
    /// failure.
    pub fn execute(&self, plan: &Plan) -> Result<Vec<Vec<Value>>, Error> {
        self.execute_with_params(plan, Params::new())
    }

    /// Runs a plan with parameters in its own transaction and commits.
    ///
    /// # Errors
    ///
    /// Propagates execution errors; the transaction is rolled back on
    /// failure.
    pub fn execute_with_params(
        &self,
        plan: &Plan,
        params: Params,
    ) -> Result<Vec<Vec<Value>>, Error> {
        let tx = self.begin();
        let options = ExecOptions { pull_budget: self.pull_budget };
        let result = Executor::with_options(plan, &tx, params, options).rows();
        match result {
            Ok(rows) => {
                tx.commit()?;
                Ok(rows)
            }
            Err(e) => {
                // Roll back explicitly; the execution error is the one
                // worth reporting.
                let _ = tx.rollback();
                Err(e.into())
            }
        }
    }

    /// Counts the nodes in the graph with a full scan.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn node_count(&self) -> Result<usize, Error> {
        let tx = self.begin();
        let mut scan = tx.nodes()?;
        let mut count = 0;
        while scan.next_node()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Counts the edges in the graph with a full scan.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn edge_count(&self) -> Result<usize, Error> {
        let tx = self.begin();
        let mut scan = tx.edges()?;
        let mut count = 0;
        while scan.next_edge()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Flushes buffered writes to disk.
    ///
    /// With the write-ahead log disabled this is the durability point.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn flush(&self) -> Result<(), Error> {
        self.store.flush()?;
        Ok(())
    }
}
