//! Database configuration.

use std::path::PathBuf;

use quiver_storage::StoreConfig;

/// Configuration options for opening a database.
///
/// # Example
///
/// ```
/// use quiver::Config;
///
/// let config = Config::new("graph.db")
///     .cache_size(64 * 1024 * 1024)
///     .wal(true)
///     .pull_budget(1_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the database directory.
    pub path: PathBuf,
    /// Create the database if it does not exist.
    pub create_if_missing: bool,
    /// Block cache size in bytes.
    pub cache_size: usize,
    /// Enable the write-ahead log. Off by default; commits are atomic
    /// but crash durability requires an explicit flush.
    pub wal: bool,
    /// Prefer asynchronous I/O on reads.
    pub async_io: bool,
    /// Default pull budget applied to executors created through
    /// [`Database::execute`](crate::Database::execute). `None` runs
    /// unbounded.
    pub pull_budget: Option<u64>,
}

impl Config {
    /// Creates a configuration for the given path with default values.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            path: path.into(),
            create_if_missing: defaults.create_if_missing,
            cache_size: defaults.cache_size,
            wal: defaults.wal,
            async_io: defaults.async_io,
            pull_budget: None,
        }
    }

    /// Sets whether to create the database if it does not exist.
    #[must_use]
    pub const fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets the block cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = bytes;
        self
    }

    /// Enables or disables the write-ahead log.
    #[must_use]
    pub const fn wal(mut self, enabled: bool) -> Self {
        self.wal = enabled;
        self
    }

    /// Enables or disables asynchronous read I/O.
    #[must_use]
    pub const fn async_io(mut self, enabled: bool) -> Self {
        self.async_io = enabled;
        self
    }

    /// Sets the default executor pull budget.
    #[must_use]
    pub const fn pull_budget(mut self, pulls: u64) -> Self {
        self.pull_budget = Some(pulls);
        self
    }

    /// Lowers this configuration into the storage layer's options.
    #[must_use]
    pub(crate) const fn store_config(&self) -> StoreConfig {
        StoreConfig {
            create_if_missing: self.create_if_missing,
            cache_size: self.cache_size,
            wal: self.wal,
            async_io: self.async_io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = Config::new("x.db").cache_size(1024).wal(true).pull_budget(10);
        assert_eq!(config.cache_size, 1024);
        assert!(config.wal);
        assert_eq!(config.pull_budget, Some(10));

        let store = config.store_config();
        assert_eq!(store.cache_size, 1024);
        assert!(store.wal);
    }
}
