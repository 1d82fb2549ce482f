//! Storage configuration.

/// Default block cache size: 512 MiB.
pub const DEFAULT_CACHE_SIZE: usize = 512 * 1024 * 1024;

/// Configuration options for opening a [`KvStore`](crate::KvStore).
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Create the database if it does not exist.
    pub create_if_missing: bool,
    /// Block cache size in bytes.
    pub cache_size: usize,
    /// Enable the write-ahead log.
    ///
    /// Off in the reference configuration: commits are atomic but
    /// durability across a crash is not guaranteed.
    pub wal: bool,
    /// Prefer asynchronous I/O on reads.
    pub async_io: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { create_if_missing: true, cache_size: DEFAULT_CACHE_SIZE, wal: false, async_io: true }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = StoreConfig::new().cache_size(1024).wal(true).create_if_missing(false);
        assert_eq!(config.cache_size, 1024);
        assert!(config.wal);
        assert!(!config.create_if_missing);
    }

    #[test]
    fn default_matches_reference_configuration() {
        let config = StoreConfig::default();
        assert!(config.create_if_missing);
        assert!(!config.wal);
        assert!(config.async_io);
        assert_eq!(config.cache_size, DEFAULT_CACHE_SIZE);
    }
}
