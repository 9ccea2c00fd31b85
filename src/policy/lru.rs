//! # Chained-Bucket LRU Cache
//!
//! A fixed-capacity LRU cache built from first principles: a hash bucket
//! table with explicit chaining for key lookup, and a doubly-linked recency
//! list for O(1) eviction. Both structures link the *same* arena-owned
//! entry records by [`EntryId`].
//!
//! ## Architecture
//!
//! ```text
//!   arena (EntryArena<Entry<K, V>>)
//!   ┌─────────┬──────────────────────────────────────────────────────────┐
//!   │ EntryId │ Entry { key, value, next_in_bucket, prev/next_accessed } │
//!   └─────────┴──────────────────────────────────────────────────────────┘
//!        ▲                  ▲
//!        │                  │
//!   ┌────┴──────────┐  ┌────┴─────────────────────────────────────┐
//!   │ buckets       │  │ recency list                             │
//!   │ [0] ─► e3 ─► e7  │ least_recent ─► e7 ◄──► e3 ◄──► e1       │
//!   │ [1] ─► e1     │  │                 (LRU)         (MRU) ◄─┐  │
//!   │ [2] ─► (none) │  │                            most_recent┘  │
//!   └───────────────┘  └──────────────────────────────────────────┘
//! ```
//!
//! Every entry lives in exactly one bucket chain (selected by
//! `hash(key) % bucket_count`) and exactly once in the recency list. A
//! `get` or `insert` locates the entry through its chain, then repositions
//! it at the most-recent end of the list. Eviction removes the list head
//! and unlinks it from its chain; both structures stay consistent by
//! construction because one arena record carries both sets of links.
//!
//! ## Operations
//!
//! | Method            | Complexity | Recency effect                    |
//! |-------------------|------------|-----------------------------------|
//! | `insert(k, v)`    | O(1)*      | Entry becomes most recent         |
//! | `get(&k)`         | O(1)*      | Entry becomes most recent         |
//! | `peek(&k)`        | O(1)*      | None (read-only path, `&self`)    |
//! | `remove(&k)`      | O(1)*      | Entry leaves the list             |
//! | `touch(&k)`       | O(1)*      | Entry becomes most recent         |
//! | `pop_lru()`       | O(1)       | Least-recent entry leaves         |
//! | `peek_lru()`      | O(1)       | None                              |
//!
//! \* expected; each is O(chain length), which the load factor bounds at
//! construction time.
//!
//! ## Sizing
//!
//! The bucket table is allocated once, at `ceil(max_entries / load_factor)`
//! slots, and never grows or rehashes. This is a deliberate simplification
//! for workloads that fill the cache quickly and keep it full; supply a
//! different [`BucketSizing`] strategy to change the policy without
//! touching chain or eviction code.
//!
//! ## Safety
//!
//! The core is safe Rust throughout: entries live in an [`EntryArena`] and
//! all links are `EntryId` indices, so there are no raw pointers to leak or
//! dangle and no manual `Drop` management.
//!
//! ## Thread Safety
//!
//! - `ChainedLruCore`: **not** thread-safe; every mutating operation takes
//!   `&mut self`, so exclusive single-owner access is enforced by the
//!   borrow checker.
//! - `ConcurrentChainedLru` (feature `concurrency`): wraps the core in a
//!   single `parking_lot::RwLock`; values are `Arc<V>` so reads hand out
//!   zero-copy clones.

use std::fmt::{self, Write as _};
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use rustc_hash::FxHasher;

use crate::ds::entry_arena::{EntryArena, EntryId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder};
use crate::traits::{BucketSizing, CoreCache, FixedLoadFactor, LruCacheTrait, MutableCache};

/// Default target ratio of entries to buckets.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Default hasher for bucket indexing.
pub type DefaultHashBuilder = BuildHasherDefault<FxHasher>;

/// The unit of storage: one record, linked into both structures.
struct Entry<K, V> {
    key: K,
    value: V,
    next_in_bucket: Option<EntryId>,
    prev_accessed: Option<EntryId>,
    next_accessed: Option<EntryId>,
}

/// Result of scanning one bucket chain for a key.
enum ChainScan {
    /// The key's entry.
    Found { id: EntryId },
    /// Key absent; carries the chain tail so an insert can append.
    Missing { tail: Option<EntryId> },
}

/// Fixed-capacity LRU cache over explicit bucket chains.
///
/// Keys need only `Eq + Hash`; values are owned by the cache and mutated in
/// place on update. See the [module docs](self) for the structure layout.
///
/// # Example
///
/// ```
/// use chainlru::policy::lru::ChainedLruCore;
/// use chainlru::traits::CoreCache;
///
/// let mut cache = ChainedLruCore::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3); // evicts "a"
///
/// assert!(!cache.contains(&"a"));
/// assert_eq!(cache.get(&"b"), Some(&2));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct ChainedLruCore<K, V, S = DefaultHashBuilder> {
    arena: EntryArena<Entry<K, V>>,
    buckets: Vec<Option<EntryId>>,
    least_recent: Option<EntryId>,
    most_recent: Option<EntryId>,
    max_entries: usize,
    hash_builder: S,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> ChainedLruCore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a cache holding at most `max_entries` entries, with the
    /// default load factor of 0.75.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is zero. Use [`try_new`](Self::try_new) to
    /// handle the error instead.
    pub fn new(max_entries: usize) -> Self {
        match Self::try_new(max_entries) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache holding at most `max_entries` entries, with the
    /// default load factor of 0.75.
    ///
    /// Fails if `max_entries` is zero.
    pub fn try_new(max_entries: usize) -> Result<Self, ConfigError> {
        Self::try_with_load_factor(max_entries, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a cache with an explicit load factor.
    ///
    /// The bucket table is fixed at `ceil(max_entries / load_factor)` slots
    /// for the cache's lifetime; there is no rehashing. Fails if
    /// `max_entries` is zero or `load_factor` is outside `(0, 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// use chainlru::policy::lru::ChainedLruCore;
    ///
    /// let cache = ChainedLruCore::<u64, u64>::try_with_load_factor(3, 0.75).unwrap();
    /// assert_eq!(cache.bucket_count(), 4);
    /// ```
    pub fn try_with_load_factor(max_entries: usize, load_factor: f64) -> Result<Self, ConfigError> {
        let sizing = FixedLoadFactor::try_new(load_factor)?;
        Self::try_with_sizing(max_entries, &sizing)
    }

    /// Creates a cache whose bucket count comes from `sizing`.
    pub fn try_with_sizing(
        max_entries: usize,
        sizing: &impl BucketSizing,
    ) -> Result<Self, ConfigError> {
        Self::try_with_sizing_and_hasher(max_entries, sizing, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates a cache with a custom bucket sizing strategy and hasher.
    pub fn try_with_sizing_and_hasher(
        max_entries: usize,
        sizing: &impl BucketSizing,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        if max_entries == 0 {
            return Err(ConfigError::new("max_entries must be > 0"));
        }
        let bucket_count = sizing.bucket_count(max_entries).max(1);
        Ok(Self {
            // One slot of headroom: an insert at capacity holds the new
            // entry and the eviction victim at the same time.
            arena: EntryArena::with_capacity(max_entries + 1),
            buckets: vec![None; bucket_count],
            least_recent: None,
            most_recent: None,
            max_entries,
            hash_builder,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Returns the number of bucket chains.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Read-only lookup that leaves the recency order untouched.
    ///
    /// This is a distinct `&self` path rather than a flag on
    /// [`get`](CoreCache::get): the compiler enforces that it cannot
    /// perturb eviction order, no matter how often it is called.
    ///
    /// # Example
    ///
    /// ```
    /// use chainlru::policy::lru::ChainedLruCore;
    /// use chainlru::traits::CoreCache;
    ///
    /// let mut cache = ChainedLruCore::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// // Peek does not refresh key 1 ...
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    ///
    /// // ... so it is still the first to go.
    /// cache.insert(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        match self.scan_bucket(self.bucket_index(key), key) {
            ChainScan::Found { id } => {
                #[cfg(feature = "metrics")]
                self.metrics.record_peek_found();
                Some(&self.entry(id).value)
            }
            ChainScan::Missing { .. } => None,
        }
    }

    /// Verifies the structural invariants, returning a description of the
    /// first violation found.
    ///
    /// Checked: every live entry sits in the chain its key hashes to, with
    /// no chain cycles and no duplicate keys; the recency list covers every
    /// live entry exactly once with symmetric links and consistent
    /// endpoints; the live count never exceeds capacity. O(n) plus an
    /// O(chain²) duplicate scan; intended for tests and debug builds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.arena.len() > self.max_entries {
            return Err(InvariantError::new(format!(
                "{} live entries exceed capacity {}",
                self.arena.len(),
                self.max_entries
            )));
        }

        let mut chained = 0usize;
        for (idx, head) in self.buckets.iter().enumerate() {
            let mut curr = *head;
            let mut steps = 0usize;
            while let Some(id) = curr {
                let entry = match self.arena.get(id) {
                    Some(entry) => entry,
                    None => {
                        return Err(InvariantError::new(format!(
                            "bucket {idx} chain references freed slot {}",
                            id.index()
                        )))
                    }
                };
                if self.bucket_index(&entry.key) != idx {
                    return Err(InvariantError::new(format!(
                        "entry in bucket {idx} hashes to bucket {}",
                        self.bucket_index(&entry.key)
                    )));
                }
                let mut other = entry.next_in_bucket;
                while let Some(other_id) = other {
                    let other_entry = match self.arena.get(other_id) {
                        Some(other_entry) => other_entry,
                        None => break,
                    };
                    if other_entry.key == entry.key {
                        return Err(InvariantError::new(format!(
                            "duplicate key in bucket {idx}"
                        )));
                    }
                    other = other_entry.next_in_bucket;
                }
                chained += 1;
                steps += 1;
                if steps > self.arena.len() {
                    return Err(InvariantError::new(format!("cycle in bucket {idx} chain")));
                }
                curr = entry.next_in_bucket;
            }
        }
        if chained != self.arena.len() {
            return Err(InvariantError::new(format!(
                "bucket chains hold {chained} entries, arena holds {}",
                self.arena.len()
            )));
        }

        if self.least_recent.is_none() || self.most_recent.is_none() {
            if self.least_recent.is_some() || self.most_recent.is_some() {
                return Err(InvariantError::new(
                    "recency endpoints disagree about emptiness",
                ));
            }
            if !self.arena.is_empty() {
                return Err(InvariantError::new(
                    "recency list is empty but entries are live",
                ));
            }
            return Ok(());
        }

        let mut count = 0usize;
        let mut prev: Option<EntryId> = None;
        let mut curr = self.least_recent;
        while let Some(id) = curr {
            let entry = match self.arena.get(id) {
                Some(entry) => entry,
                None => {
                    return Err(InvariantError::new(format!(
                        "recency list references freed slot {}",
                        id.index()
                    )))
                }
            };
            if entry.prev_accessed != prev {
                return Err(InvariantError::new("asymmetric recency links"));
            }
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new("cycle in recency list"));
            }
            if entry.next_accessed.is_none() && self.most_recent != Some(id) {
                return Err(InvariantError::new(
                    "recency list tail is not the most-recent endpoint",
                ));
            }
            prev = Some(id);
            curr = entry.next_accessed;
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "recency list holds {count} entries, arena holds {}",
                self.arena.len()
            )));
        }
        Ok(())
    }

    // -- internal helpers ---------------------------------------------------

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        // The hash is unsigned, so the modulo reduction is already
        // non-negative.
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }

    #[inline]
    fn bucket_index_of(&self, id: EntryId) -> usize {
        self.bucket_index(&self.entry(id).key)
    }

    /// An id held by the cache structure must always resolve; a stale id
    /// means a broken invariant, which is unrecoverable.
    #[inline]
    fn entry(&self, id: EntryId) -> &Entry<K, V> {
        match self.arena.get(id) {
            Some(entry) => entry,
            None => panic!("cache structure holds stale entry id {}", id.index()),
        }
    }

    #[inline]
    fn entry_mut(&mut self, id: EntryId) -> &mut Entry<K, V> {
        match self.arena.get_mut(id) {
            Some(entry) => entry,
            None => panic!("cache structure holds stale entry id {}", id.index()),
        }
    }

    /// Single pass over a bucket chain: yields the match and its
    /// predecessor, or the chain tail for appending.
    fn scan_bucket(&self, idx: usize, key: &K) -> ChainScan {
        let mut prev: Option<EntryId> = None;
        let mut curr = self.buckets[idx];
        while let Some(id) = curr {
            let entry = self.entry(id);
            if entry.key == *key {
                return ChainScan::Found { id };
            }
            prev = Some(id);
            curr = entry.next_in_bucket;
        }
        ChainScan::Missing { tail: prev }
    }

    /// Unlinks `id` from the chain at `idx` without touching the recency
    /// list. Panics if the entry is not on the chain: that is an
    /// internal-consistency fault, and continuing would corrupt the cache.
    fn unlink_from_bucket(&mut self, idx: usize, id: EntryId) {
        let mut prev: Option<EntryId> = None;
        let mut curr = self.buckets[idx];
        while let Some(curr_id) = curr {
            if curr_id == id {
                let next = self.entry(curr_id).next_in_bucket;
                match prev {
                    Some(prev_id) => self.entry_mut(prev_id).next_in_bucket = next,
                    None => self.buckets[idx] = next,
                }
                self.entry_mut(curr_id).next_in_bucket = None;
                return;
            }
            prev = Some(curr_id);
            curr = self.entry(curr_id).next_in_bucket;
        }
        panic!("entry missing from its bucket chain during removal");
    }

    /// Splices `id` out of the recency list, patching neighbors and
    /// endpoints. Never touches bucket chains.
    fn detach_from_recency(&mut self, id: EntryId) {
        let (prev, next) = {
            let entry = self.entry(id);
            (entry.prev_accessed, entry.next_accessed)
        };
        match prev {
            Some(prev_id) => self.entry_mut(prev_id).next_accessed = next,
            None => self.least_recent = next,
        }
        match next {
            Some(next_id) => self.entry_mut(next_id).prev_accessed = prev,
            None => self.most_recent = prev,
        }
        let entry = self.entry_mut(id);
        entry.prev_accessed = None;
        entry.next_accessed = None;
    }

    /// Moves an already-linked entry to the most-recent end in O(1).
    fn record_existing_access(&mut self, id: EntryId) {
        if self.most_recent == Some(id) {
            return;
        }
        self.detach_from_recency(id);
        match self.most_recent {
            Some(tail) => {
                self.entry_mut(tail).next_accessed = Some(id);
                self.entry_mut(id).prev_accessed = Some(tail);
            }
            None => self.least_recent = Some(id),
        }
        self.most_recent = Some(id);
    }

    /// Appends a brand-new entry at the most-recent end, evicting the
    /// least-recent entry if the insert pushed the cache past capacity.
    fn record_new_access(&mut self, id: EntryId) {
        match self.most_recent {
            Some(tail) => {
                self.entry_mut(id).prev_accessed = Some(tail);
                self.entry_mut(tail).next_accessed = Some(id);
            }
            None => self.least_recent = Some(id),
        }
        self.most_recent = Some(id);

        if self.arena.len() > self.max_entries {
            debug_assert_eq!(self.arena.len(), self.max_entries + 1);
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            self.evict_least_recent();

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }

    fn evict_least_recent(&mut self) {
        let victim = match self.least_recent {
            Some(id) => id,
            None => panic!("eviction requested with an empty recency list"),
        };
        let idx = self.bucket_index_of(victim);
        self.remove_entry(victim, idx);
    }

    /// Fully removes `id`: bucket chain, recency list, arena slot.
    fn remove_entry(&mut self, id: EntryId, bucket_idx: usize) -> Entry<K, V> {
        self.unlink_from_bucket(bucket_idx, id);
        self.detach_from_recency(id);
        match self.arena.remove(id) {
            Some(entry) => entry,
            None => panic!("cache structure holds stale entry id {}", id.index()),
        }
    }

    #[cfg(debug_assertions)]
    fn debug_validate(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K, V, S> CoreCache<K, V> for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts or updates. An update overwrites the value in place, counts
    /// as an access, and returns the previous value. A new key is appended
    /// to its chain tail and becomes most recent, evicting the
    /// least-recently-used entry if the cache was full.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let idx = self.bucket_index(&key);
        match self.scan_bucket(idx, &key) {
            ChainScan::Found { id } => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();

                self.record_existing_access(id);
                let previous = std::mem::replace(&mut self.entry_mut(id).value, value);

                #[cfg(debug_assertions)]
                self.debug_validate();

                Some(previous)
            }
            ChainScan::Missing { tail } => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();

                let id = self.arena.insert(Entry {
                    key,
                    value,
                    next_in_bucket: None,
                    prev_accessed: None,
                    next_accessed: None,
                });
                match tail {
                    Some(tail_id) => self.entry_mut(tail_id).next_in_bucket = Some(id),
                    None => self.buckets[idx] = Some(id),
                }
                self.record_new_access(id);

                #[cfg(debug_assertions)]
                self.debug_validate();

                None
            }
        }
    }

    /// Looks up `key` and records the access, making its entry most recent.
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.scan_bucket(self.bucket_index(key), key) {
            ChainScan::Found { id } => id,
            ChainScan::Missing { .. } => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            }
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.record_existing_access(id);

        #[cfg(debug_assertions)]
        self.debug_validate();

        Some(&self.entry(id).value)
    }

    fn contains(&self, key: &K) -> bool {
        matches!(
            self.scan_bucket(self.bucket_index(key), key),
            ChainScan::Found { .. }
        )
    }

    #[inline]
    fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.max_entries
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.arena.clear();
        for head in &mut self.buckets {
            *head = None;
        }
        self.least_recent = None;
        self.most_recent = None;
    }
}

impl<K, V, S> MutableCache<K, V> for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.bucket_index(key);
        let id = match self.scan_bucket(idx, key) {
            ChainScan::Found { id } => id,
            ChainScan::Missing { .. } => return None,
        };
        let entry = self.remove_entry(id, idx);

        #[cfg(debug_assertions)]
        self.debug_validate();

        Some(entry.value)
    }
}

impl<K, V, S> LruCacheTrait<K, V> for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let id = self.least_recent?;
        let idx = self.bucket_index_of(id);
        let entry = self.remove_entry(id, idx);

        #[cfg(debug_assertions)]
        self.debug_validate();

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some((entry.key, entry.value))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        self.least_recent.map(|id| {
            #[cfg(feature = "metrics")]
            self.metrics.record_peek_lru_found();

            let entry = self.entry(id);
            (&entry.key, &entry.value)
        })
    }

    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.scan_bucket(self.bucket_index(key), key) {
            ChainScan::Found { id } => {
                self.record_existing_access(id);

                #[cfg(debug_assertions)]
                self.debug_validate();

                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();

                true
            }
            ChainScan::Missing { .. } => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_call();

        let target = match self.scan_bucket(self.bucket_index(key), key) {
            ChainScan::Found { id } => id,
            ChainScan::Missing { .. } => return None,
        };
        let mut rank = 0usize;
        let mut curr = self.most_recent;
        while let Some(id) = curr {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_rank_scan_step();

            if id == target {
                #[cfg(feature = "metrics")]
                self.metrics.record_recency_rank_found();
                return Some(rank);
            }
            rank += 1;
            curr = self.entry(id).prev_accessed;
        }
        None
    }
}

impl<K, V, S> ChainedLruCore<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    /// Renders bucket contents and recency order for diagnostics.
    ///
    /// The format is for humans and tests; it is not stable.
    pub fn dump_state(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} entries in {} buckets:",
            self.len(),
            self.buckets.len()
        );
        for (idx, head) in self.buckets.iter().enumerate() {
            let _ = write!(out, "bucket {idx}:");
            let mut curr = *head;
            while let Some(id) = curr {
                let entry = self.entry(id);
                let _ = write!(out, " ({:?} -> {:?})", entry.key, entry.value);
                curr = entry.next_in_bucket;
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "access order, least to most recent:");
        let mut rank = 0usize;
        let mut curr = self.least_recent;
        while let Some(id) = curr {
            let entry = self.entry(id);
            let _ = writeln!(out, "{rank:4}: ({:?} -> {:?})", entry.key, entry.value);
            rank += 1;
            curr = entry.next_accessed;
        }
        out
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Copies the current counters into a flat snapshot.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.max_entries)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> crate::metrics::traits::MetricsSnapshotProvider<LruMetricsSnapshot>
    for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, S> fmt::Debug for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedLruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("bucket_count", &self.bucket_count())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ChainedLruCore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedLruCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            CoreCache::insert(self, key, value);
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrent wrapper
// ---------------------------------------------------------------------------

#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;

/// Thread-safe wrapper: one exclusive lock around the whole core.
///
/// Values are stored as `Arc<V>`, so reads return zero-copy clones that
/// remain valid after eviction. `peek`, `contains`, and size queries take
/// the read lock; everything that reorders the recency list takes the
/// write lock.
#[cfg(feature = "concurrency")]
pub struct ConcurrentChainedLru<K, V, S = DefaultHashBuilder> {
    inner: Arc<RwLock<ChainedLruCore<K, Arc<V>, S>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V, S> Clone for ConcurrentChainedLru<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentChainedLru<K, V>
where
    K: Eq + Hash,
{
    /// Creates a thread-safe cache with the default load factor.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is zero.
    pub fn new(max_entries: usize) -> Self {
        match Self::try_new(max_entries) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible constructor; fails if `max_entries` is zero.
    pub fn try_new(max_entries: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ChainedLruCore::try_new(max_entries)?)),
        })
    }

    /// Fallible constructor with an explicit load factor.
    pub fn try_with_load_factor(max_entries: usize, load_factor: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(ChainedLruCore::try_with_load_factor(
                max_entries,
                load_factor,
            )?)),
        })
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> ConcurrentChainedLru<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts a value, wrapping it in `Arc<V>`.
    ///
    /// Returns the previous `Arc<V>` if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut cache = self.inner.write();
        CoreCache::insert(&mut *cache, key, value)
    }

    /// Inserts a pre-wrapped `Arc<V>` without re-wrapping.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        CoreCache::insert(&mut *cache, key, value)
    }

    /// Looks up `key`, records the access, and returns a shared handle.
    ///
    /// Takes the write lock: recording the access reorders the recency
    /// list even though the caller only reads the value.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        CoreCache::get(&mut *cache, key).map(Arc::clone)
    }

    /// Read-only lookup under the read lock; recency order is untouched.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let cache = self.inner.read();
        cache.peek(key).map(Arc::clone)
    }

    /// Removes an entry, returning its value handle.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        MutableCache::remove(&mut *cache, key)
    }

    /// Marks `key` most recently used without retrieving its value.
    pub fn touch(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        LruCacheTrait::touch(&mut *cache, key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        let mut cache = self.inner.write();
        LruCacheTrait::pop_lru(&mut *cache)
    }

    /// Returns `true` if `key` is cached, without reordering.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        CoreCache::contains(&*cache, key)
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        CoreCache::len(&*cache)
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        CoreCache::capacity(&*cache)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        CoreCache::clear(&mut *cache);
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, S> fmt::Debug for ConcurrentChainedLru<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentChainedLru")
            .field("len", &CoreCache::len(&*cache))
            .field("capacity", &CoreCache::capacity(&*cache))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
