//! Builder for configuring and constructing the cache.
//!
//! Collects capacity and load factor, then validates everything at once in
//! [`CacheBuilder::try_build`].
//!
//! ## Example
//!
//! ```rust
//! use chainlru::builder::CacheBuilder;
//! use chainlru::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100)
//!     .load_factor(0.5)
//!     .try_build::<u64, String>()
//!     .unwrap();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::{ChainedLruCore, DEFAULT_LOAD_FACTOR};

/// Builder for [`ChainedLruCore`] instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    max_entries: usize,
    load_factor: f64,
}

impl CacheBuilder {
    /// Starts a builder for a cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Sets the target entries-per-bucket ratio (default 0.75).
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Validates the configuration and builds the cache.
    ///
    /// Fails if `max_entries` is zero or the load factor is outside
    /// `(0, 1]`.
    pub fn try_build<K, V>(self) -> Result<ChainedLruCore<K, V>, ConfigError>
    where
        K: Eq + Hash,
    {
        ChainedLruCore::try_with_load_factor(self.max_entries, self.load_factor)
    }
}
