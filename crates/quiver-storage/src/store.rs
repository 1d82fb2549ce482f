//! The RocksDB store and its column families.

use std::path::Path;

use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamilyDescriptor, MultiThreaded, OptimisticTransactionDB,
    OptimisticTransactionOptions, Options, WriteOptions,
};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::transaction::KvTransaction;

/// The concrete backend database type.
pub(crate) type OptimisticDb = OptimisticTransactionDB<MultiThreaded>;

/// The column families of a store, in their fixed on-disk order.
///
/// - `default` holds caller metadata,
/// - `node` and `edge` hold entity records keyed by element id,
/// - `adj` holds the adjacency index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    /// Free-form metadata keyspace.
    Default,
    /// Node records.
    Node,
    /// Edge records.
    Edge,
    /// Adjacency index entries.
    Adj,
}

impl ColumnFamily {
    /// All column families in creation order.
    pub const ALL: [Self; 4] = [Self::Default, Self::Node, Self::Edge, Self::Adj];

    /// Returns the backend name of this column family.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Adj => "adj",
        }
    }
}

/// An ordered key-value store with optimistic transactions.
///
/// The store is thread-safe; any number of transactions may run
/// concurrently, each isolated by its begin-time snapshot. Conflicts are
/// detected at commit.
///
/// # Example
///
/// ```no_run
/// use quiver_storage::{ColumnFamily, KvStore, StoreConfig};
///
/// # fn main() -> Result<(), quiver_storage::StorageError> {
/// let store = KvStore::open("graph.db", &StoreConfig::default())?;
/// let tx = store.begin();
/// tx.put(ColumnFamily::Default, b"k", b"v")?;
/// tx.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct KvStore {
    db: OptimisticDb,
    wal: bool,
    async_io: bool,
}

impl KvStore {
    /// Opens or creates a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] or [`StorageError::InvalidArgument`]
    /// if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);
        opts.create_missing_column_families(true);

        let cache = Cache::new_lru_cache(config.cache_size);
        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        opts.set_block_based_table_factory(&block_opts);

        let cf_descs = ColumnFamily::ALL
            .iter()
            .map(|cf| ColumnFamilyDescriptor::new(cf.name(), Options::default()));

        let db = OptimisticDb::open_cf_descriptors(&opts, path.as_ref(), cf_descs)?;
        debug!(path = %path.as_ref().display(), wal = config.wal, "opened store");

        Ok(Self { db, wal: config.wal, async_io: config.async_io })
    }

    /// Begins an optimistic transaction with a snapshot set at begin.
    #[must_use]
    pub fn begin(&self) -> KvTransaction<'_> {
        let mut write_opts = WriteOptions::default();
        write_opts.disable_wal(!self.wal);

        let mut txn_opts = OptimisticTransactionOptions::default();
        txn_opts.set_snapshot(true);

        let inner = self.db.transaction_opt(&write_opts, &txn_opts);
        KvTransaction::new(inner, &self.db, self.async_io)
    }

    /// Flushes memtables to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the flush fails.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
