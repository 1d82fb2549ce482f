//! `QuiverDB` Storage
//!
//! This crate is the thin adapter between `QuiverDB` and its ordered
//! key-value backend, RocksDB in its optimistic-transaction
//! configuration.
//!
//! # Overview
//!
//! A [`KvStore`] owns the database and its four column families. All
//! reads and writes go through a [`KvTransaction`], which pins a snapshot
//! at begin: reads observe that snapshot plus the transaction's own
//! writes, and commit fails with [`StorageError::Busy`] when a
//! conflicting transaction committed first. Bounded iteration is exposed
//! through [`KvIter`], a cursor that borrows its transaction.
//!
//! # Example
//!
//! ```no_run
//! use quiver_storage::{ColumnFamily, KvStore, StoreConfig};
//!
//! # fn main() -> Result<(), quiver_storage::StorageError> {
//! let store = KvStore::open("graph.db", &StoreConfig::default())?;
//!
//! let tx = store.begin();
//! tx.put(ColumnFamily::Default, b"answer", b"42")?;
//! tx.commit()?;
//!
//! let tx = store.begin();
//! assert_eq!(tx.get(ColumnFamily::Default, b"answer")?, Some(b"42".to_vec()));
//! # Ok(())
//! # }
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

mod config;
mod error;
mod store;
mod transaction;

pub use config::StoreConfig;
pub use error::{StorageError, StorageResult};
pub use store::{ColumnFamily, KvStore};
pub use transaction::{KvIter, KvTransaction};
