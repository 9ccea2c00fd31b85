//! # Cache Trait Hierarchy
//!
//! Defines the operation sets implemented by the chained LRU core, split so
//! that code can depend on exactly the capabilities it needs.
//!
//! ```text
//!   ┌──────────────────────────────────────┐
//!   │          CoreCache<K, V>             │
//!   │  insert / get / contains / len /     │
//!   │  is_empty / capacity / clear         │
//!   └──────────────────┬───────────────────┘
//!                      │
//!                      ▼
//!   ┌──────────────────────────────────────┐
//!   │         MutableCache<K, V>           │
//!   │  remove / remove_batch               │
//!   └──────────────────┬───────────────────┘
//!                      │
//!                      ▼
//!   ┌──────────────────────────────────────┐
//!   │        LruCacheTrait<K, V>           │
//!   │  pop_lru / peek_lru / touch /        │
//!   │  recency_rank                        │
//!   └──────────────────────────────────────┘
//! ```
//!
//! [`BucketSizing`] is independent of the hierarchy: it is the strategy that
//! maps a capacity to a bucket count at construction time, so an alternative
//! sizing (or a future rehashing variant) can be supplied without touching
//! chain or eviction logic.

use crate::error::ConfigError;

/// Core cache operations that any policy supports.
///
/// # Example
///
/// ```
/// use chainlru::traits::CoreCache;
/// use chainlru::policy::lru::ChainedLruCore;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = ChainedLruCore::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed.
    ///
    /// If the cache is at capacity and `key` is new, an entry is evicted
    /// according to the cache's eviction policy before the new entry is
    /// admitted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// May update internal access state depending on the policy. Use
    /// [`contains`](Self::contains) to check existence without affecting
    /// eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache can hold.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use chainlru::traits::{CoreCache, MutableCache};
/// use chainlru::policy::lru::ChainedLruCore;
///
/// let mut cache = ChainedLruCore::new(10);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
///
/// assert_eq!(cache.remove(&1), Some("one"));
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair, returning the value if the key
    /// existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in `keys`, ignoring ones that are absent.
    fn remove_batch(&mut self, keys: &[K]) {
        for key in keys {
            self.remove(key);
        }
    }
}

/// Recency-ordered caches with LRU-specific eviction operations.
///
/// # Example
///
/// ```
/// use chainlru::traits::{CoreCache, LruCacheTrait};
/// use chainlru::policy::lru::ChainedLruCore;
///
/// let mut cache = ChainedLruCore::new(10);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
///
/// // Key 1 is the least recently used
/// assert_eq!(cache.pop_lru(), Some((1, "one")));
/// assert_eq!(cache.len(), 1);
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without removing it or
    /// updating recency order.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found.
    fn touch(&mut self, key: &K) -> bool;

    /// Returns `key`'s position in recency order, where 0 is most recent.
    ///
    /// O(n) scan; intended for tests and diagnostics.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Strategy that fixes the bucket count for a given capacity.
///
/// Implementations are consulted once, at construction time. The shipped
/// strategy is [`FixedLoadFactor`]; a variant that plans for growth can
/// return a larger count without any change to chain or eviction code.
pub trait BucketSizing {
    /// Returns the number of buckets to allocate for `max_entries`.
    fn bucket_count(&self, max_entries: usize) -> usize;
}

/// Bucket sizing from a target entries-per-bucket ratio.
///
/// Allocates `ceil(max_entries / load_factor)` buckets up front. The table
/// never grows or rehashes afterwards; the expected chain length therefore
/// stays at most `load_factor` while the cache is full.
///
/// # Example
///
/// ```
/// use chainlru::traits::{BucketSizing, FixedLoadFactor};
///
/// let sizing = FixedLoadFactor::try_new(0.75).unwrap();
/// assert_eq!(sizing.bucket_count(3), 4);
/// assert!(FixedLoadFactor::try_new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLoadFactor(f64);

impl FixedLoadFactor {
    /// Validates `load_factor` and wraps it.
    ///
    /// Rejects values outside `(0, 1]` (including NaN).
    pub fn try_new(load_factor: f64) -> Result<Self, ConfigError> {
        if load_factor > 0.0 && load_factor <= 1.0 {
            Ok(Self(load_factor))
        } else {
            Err(ConfigError::new(format!(
                "load_factor must be in (0, 1], got {load_factor}"
            )))
        }
    }

    /// Returns the wrapped load factor.
    #[inline]
    pub fn load_factor(self) -> f64 {
        self.0
    }
}

impl BucketSizing for FixedLoadFactor {
    fn bucket_count(&self, max_entries: usize) -> usize {
        (max_entries as f64 / self.0).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_load_factor_rejects_out_of_range() {
        assert!(FixedLoadFactor::try_new(0.0).is_err());
        assert!(FixedLoadFactor::try_new(-0.5).is_err());
        assert!(FixedLoadFactor::try_new(1.5).is_err());
        assert!(FixedLoadFactor::try_new(f64::NAN).is_err());
    }

    #[test]
    fn fixed_load_factor_accepts_valid_range() {
        assert!(FixedLoadFactor::try_new(0.01).is_ok());
        assert!(FixedLoadFactor::try_new(0.75).is_ok());
        assert!(FixedLoadFactor::try_new(1.0).is_ok());
    }

    #[test]
    fn bucket_count_rounds_up() {
        let sizing = FixedLoadFactor::try_new(0.75).unwrap();
        assert_eq!(sizing.bucket_count(50_000), 66_667);
        assert_eq!(sizing.bucket_count(1), 2);

        let full = FixedLoadFactor::try_new(1.0).unwrap();
        assert_eq!(full.bucket_count(8), 8);
    }
}
