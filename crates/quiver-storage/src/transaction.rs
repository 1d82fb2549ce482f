//! Optimistic transactions and bounded iteration.

use std::sync::Arc;

use rocksdb::{BoundColumnFamily, DBRawIteratorWithThreadMode, ReadOptions, Transaction};

use crate::error::StorageError;
use crate::store::{ColumnFamily, OptimisticDb};

/// A raw backend iterator borrowing its transaction.
type RawIter<'a, 'db> = DBRawIteratorWithThreadMode<'a, Transaction<'db, OptimisticDb>>;

/// An optimistic transaction over the store.
///
/// A transaction pins a snapshot when it begins. Reads observe that
/// snapshot amended by the transaction's own writes; writes are applied
/// atomically at commit. [`get_for_update`](Self::get_for_update) marks a
/// read for conflict detection: if another transaction commits a write to
/// that key first, [`commit`](Self::commit) fails with
/// [`StorageError::Busy`].
///
/// Transactions are not shared across threads. Iterators borrow from the
/// transaction and must be released before it is committed or rolled
/// back.
pub struct KvTransaction<'db> {
    inner: Transaction<'db, OptimisticDb>,
    db: &'db OptimisticDb,
    async_io: bool,
}

impl<'db> KvTransaction<'db> {
    pub(crate) fn new(
        inner: Transaction<'db, OptimisticDb>,
        db: &'db OptimisticDb,
        async_io: bool,
    ) -> Self {
        Self { inner, db, async_io }
    }

    /// Resolves a column family handle.
    fn cf(&self, cf: ColumnFamily) -> Result<Arc<BoundColumnFamily<'db>>, StorageError> {
        self.db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidArgument(format!("missing column family: {}", cf.name())))
    }

    /// Read options pinned to the transaction's snapshot.
    fn read_opts(&self) -> ReadOptions {
        let snapshot = self.inner.snapshot();
        let mut opts = ReadOptions::default();
        opts.set_snapshot(&snapshot);
        opts
    }

    /// Gets a value by key.
    ///
    /// The read is not tracked for conflict detection.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; a missing key is `Ok(None)`.
    pub fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let handle = self.cf(cf)?;
        let opts = self.read_opts();
        Ok(self.inner.get_cf_opt(&handle, key, &opts)?)
    }

    /// Gets a value by key and marks the read for conflict detection.
    ///
    /// A later commit fails with [`StorageError::Busy`] if another
    /// transaction has committed a write to this key since the snapshot.
    ///
    /// # Errors
    ///
    /// Propagates backend errors; a missing key is `Ok(None)`.
    pub fn get_for_update(
        &self,
        cf: ColumnFamily,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let handle = self.cf(cf)?;
        let opts = self.read_opts();
        Ok(self.inner.get_for_update_cf_opt(&handle, key, true, &opts)?)
    }

    /// Writes a key-value pair.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let handle = self.cf(cf)?;
        self.inner.put_cf(&handle, key, value)?;
        Ok(())
    }

    /// Deletes a key.
    ///
    /// Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn delete(&self, cf: ColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        let handle = self.cf(cf)?;
        self.inner.delete_cf(&handle, key)?;
        Ok(())
    }

    /// Deletes every key in `[lo, hi)`.
    ///
    /// Implemented as a bounded scan plus point deletes inside the
    /// transaction, since the backend's transactions have no native range
    /// delete.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn delete_range(
        &self,
        cf: ColumnFamily,
        lo: &[u8],
        hi: &[u8],
    ) -> Result<(), StorageError> {
        let mut keys = Vec::new();
        {
            let mut iter = self.iter(cf, Some(lo), Some(hi))?;
            while iter.advance()? {
                if let Some(key) = iter.key() {
                    keys.push(key.to_vec());
                }
            }
        }
        for key in &keys {
            self.delete(cf, key)?;
        }
        Ok(())
    }

    /// Opens a cursor over `[lo, hi)` in lexicographic byte order.
    ///
    /// An absent bound leaves that end of the range open. The cursor
    /// observes the transaction's snapshot plus its own writes; it does
    /// not track reads for conflict detection.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn iter<'txn>(
        &'txn self,
        cf: ColumnFamily,
        lo: Option<&[u8]>,
        hi: Option<&[u8]>,
    ) -> Result<KvIter<'txn, 'db>, StorageError> {
        let handle = self.cf(cf)?;
        let mut opts = self.read_opts();
        opts.set_async_io(self.async_io);
        // The bound buffers are owned by the read options, which the
        // iterator keeps alive for its whole lifetime.
        if let Some(lo) = lo {
            opts.set_iterate_lower_bound(lo.to_vec());
        }
        if let Some(hi) = hi {
            opts.set_iterate_upper_bound(hi.to_vec());
        }

        let mut raw = self.inner.raw_iterator_cf_opt(&handle, opts);
        raw.seek_to_first();
        Ok(KvIter { raw, started: false })
    }

    /// Creates a savepoint that a later
    /// [`rollback_to_savepoint`](Self::rollback_to_savepoint) returns to.
    pub fn set_savepoint(&self) {
        self.inner.set_savepoint();
    }

    /// Discards all writes made since the most recent savepoint.
    ///
    /// # Errors
    ///
    /// Propagates backend errors, including the absence of a savepoint.
    pub fn rollback_to_savepoint(&self) -> Result<(), StorageError> {
        self.inner.rollback_to_savepoint()?;
        Ok(())
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Busy`] if a conflicting transaction
    /// committed first and [`StorageError::TryAgain`] if the backend's
    /// conflict-tracking history is exhausted. Either way the transaction
    /// is gone; the caller retries with a fresh one.
    pub fn commit(self) -> Result<(), StorageError> {
        self.inner.commit()?;
        Ok(())
    }

    /// Rolls the transaction back, discarding all writes.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn rollback(self) -> Result<(), StorageError> {
        self.inner.rollback()?;
        Ok(())
    }
}

/// A cursor over a bounded key range.
///
/// Advancing never allocates; [`key`](Self::key) and
/// [`value`](Self::value) borrow from the cursor and must be copied out
/// before the next [`advance`](Self::advance).
///
/// # Example
///
/// ```ignore
/// let mut iter = tx.iter(ColumnFamily::Node, None, None)?;
/// while iter.advance()? {
///     let key = iter.key().expect("valid cursor has a key");
///     // copy out before advancing again
/// }
/// ```
pub struct KvIter<'txn, 'db> {
    raw: RawIter<'txn, 'db>,
    started: bool,
}

impl KvIter<'_, '_> {
    /// Moves to the next entry, returning `false` at the end of the
    /// range.
    ///
    /// # Errors
    ///
    /// Propagates backend errors detected during iteration.
    pub fn advance(&mut self) -> Result<bool, StorageError> {
        if !self.started {
            // The constructor already positioned the cursor on the first
            // entry in range.
            self.started = true;
        } else if self.raw.valid() {
            self.raw.next();
        } else {
            // Exhausted cursors stay exhausted.
            return Ok(false);
        }
        if self.raw.valid() {
            Ok(true)
        } else {
            self.raw.status()?;
            Ok(false)
        }
    }

    /// Returns the key at the cursor, if the cursor is on an entry.
    #[must_use]
    pub fn key(&self) -> Option<&[u8]> {
        self.raw.key()
    }

    /// Returns the value at the cursor, if the cursor is on an entry.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.raw.value()
    }
}
