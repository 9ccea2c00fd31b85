// ==============================================
// CHAINED LRU BEHAVIORAL SCENARIOS (integration)
// ==============================================
//
// Drives the cache through fixed traces and checks the full expected
// contents after every step, using `peek` so the checks themselves never
// perturb recency order.

use std::collections::HashMap;

use chainlru::policy::lru::ChainedLruCore;
use chainlru::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Test harness pairing a cache with a map of its expected contents.
struct Harness {
    cache: ChainedLruCore<i32, i32>,
    expected: HashMap<i32, i32>,
}

impl Harness {
    fn new(max_entries: usize) -> Self {
        Self {
            cache: ChainedLruCore::new(max_entries),
            expected: HashMap::new(),
        }
    }

    /// Full-content check: every expected entry is present with the right
    /// value, a sweep of nearby keys finds nothing unexpected, and the
    /// size/emptiness accessors agree with the expectation.
    fn check(&self) {
        for (key, value) in &self.expected {
            match self.cache.peek(key) {
                Some(actual) => assert_eq!(actual, value, "wrong value for key {key}"),
                None => panic!("missing expected value for key {key}"),
            }
        }
        for key in 0..20 {
            if !self.expected.contains_key(&key) {
                assert_eq!(
                    self.cache.peek(&key),
                    None,
                    "expected no value for key {key}"
                );
            }
        }
        assert_eq!(self.cache.len(), self.expected.len(), "cache is wrong size");
        assert_eq!(
            self.cache.is_empty(),
            self.expected.is_empty(),
            "inconsistent is_empty"
        );
        self.cache.check_invariants().unwrap();
    }

    fn put(&mut self, key: i32, value: i32) {
        self.cache.insert(key, value);
        self.expected.insert(key, value);
        self.check();
    }

    fn get(&mut self, key: i32) {
        self.cache.get(&key);
        self.check();
    }

    fn evicted(&mut self, key: i32) {
        self.expected.remove(&key);
    }
}

#[test]
fn capacity_four_trace() {
    let mut h = Harness::new(4);

    h.check();
    h.put(3, 5);
    h.put(2, 6);
    h.put(3, 7); // update in place, size stays 2
    h.put(1, 8);
    h.put(4, 9); // full

    // The next new key kicks out key 2, the least recently touched.
    h.evicted(2);
    h.put(5, 2);

    // Refresh key 3 so key 1 becomes the victim.
    h.get(3);
    h.evicted(1);
    h.put(6, 2);
}

#[test]
fn capacity_one_trace() {
    let mut h = Harness::new(1);

    h.check();
    h.put(3, 5);

    h.evicted(3);
    h.put(2, 6);
}

#[test]
fn update_returns_previous_value_and_refreshes() {
    let mut cache = ChainedLruCore::new(4);
    cache.insert(3, 5);
    cache.insert(2, 6);

    assert_eq!(cache.insert(3, 7), Some(5));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&3), Some(&7));
    // The update counted as an access, so key 2 is now least recent.
    assert_eq!(cache.peek_lru(), Some((&2, &6)));
}

#[test]
fn capacity_bound_holds_under_churn() {
    let mut cache = ChainedLruCore::new(10);
    for i in 0..1000 {
        cache.insert(i, i);
        assert!(cache.len() <= 10, "size exceeded capacity at insert {i}");
    }
    assert_eq!(cache.len(), 10);

    // Once full, every new key evicts exactly one entry.
    for i in 1000..1020 {
        let before = cache.len();
        cache.insert(i, i);
        assert_eq!(cache.len(), before);
    }
}

#[test]
fn eviction_follows_touch_order_exactly() {
    let mut cache = ChainedLruCore::new(3);
    cache.insert(1, "a");
    cache.insert(2, "b");
    cache.insert(3, "c");

    // Touch order now: 1 (oldest), 2, 3. Refresh 1 and 2; 3 becomes LRU.
    cache.get(&1);
    cache.touch(&2);
    cache.insert(4, "d");

    assert!(!cache.contains(&3));
    assert!(cache.contains(&1));
    assert!(cache.contains(&2));
    assert!(cache.contains(&4));
}

#[test]
fn repeated_peeks_are_idempotent() {
    let mut cache = ChainedLruCore::new(3);
    cache.insert(1, "a");
    cache.insert(2, "b");
    cache.insert(3, "c");

    let before: Vec<_> = (1..=3).map(|k| cache.recency_rank(&k)).collect();
    for _ in 0..100 {
        cache.peek(&1);
        cache.peek(&2);
        cache.peek(&99);
    }
    let after: Vec<_> = (1..=3).map(|k| cache.recency_rank(&k)).collect();
    assert_eq!(before, after, "peek changed recency order");
}

#[test]
fn misses_have_no_side_effects() {
    let mut cache = ChainedLruCore::new(4);
    cache.insert(1, "a");

    assert_eq!(cache.get(&42), None);
    assert_eq!(cache.peek(&42), None);
    assert_eq!(cache.remove(&42), None);
    assert_eq!(cache.len(), 1);
    cache.check_invariants().unwrap();
}

#[test]
fn drain_order_matches_access_history() {
    let mut cache = ChainedLruCore::new(5);
    for key in 1..=5 {
        cache.insert(key, key * 10);
    }
    cache.get(&2);
    cache.touch(&4);
    cache.insert(1, 100); // update refreshes key 1

    let drained: Vec<i32> = std::iter::from_fn(|| cache.pop_lru().map(|(k, _)| k)).collect();
    assert_eq!(drained, vec![3, 5, 2, 4, 1]);
    assert!(cache.is_empty());
}
