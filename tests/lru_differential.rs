// ==============================================
// DIFFERENTIAL TEST AGAINST A RECENCY ORACLE
// ==============================================
//
// Runs a long randomized op sequence against a trivially-correct model: a
// Vec of (key, value) pairs kept in access order, least recent first. The
// sequence is generated by a fixed-seed LCG so failures reproduce exactly.

use chainlru::policy::lru::ChainedLruCore;
use chainlru::traits::{CoreCache, LruCacheTrait, MutableCache};

const CAPACITY: usize = 8;
const KEY_SPACE: u64 = 24;
const OPS: u64 = 10_000;

/// Minimal linear congruential generator (MMIX constants).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Reference model: access order as a Vec, least recent at index 0.
#[derive(Default)]
struct Oracle {
    entries: Vec<(u64, u64)>,
}

impl Oracle {
    fn position(&self, key: u64) -> Option<usize> {
        self.entries.iter().position(|&(k, _)| k == key)
    }

    fn insert(&mut self, key: u64, value: u64) -> Option<u64> {
        if let Some(pos) = self.position(key) {
            let (_, old) = self.entries.remove(pos);
            self.entries.push((key, value));
            Some(old)
        } else {
            self.entries.push((key, value));
            if self.entries.len() > CAPACITY {
                self.entries.remove(0);
            }
            None
        }
    }

    fn get(&mut self, key: u64) -> Option<u64> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos);
        self.entries.push(entry);
        Some(entry.1)
    }

    fn peek(&self, key: u64) -> Option<u64> {
        self.position(key).map(|pos| self.entries[pos].1)
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        let pos = self.position(key)?;
        Some(self.entries.remove(pos).1)
    }
}

#[test]
fn random_ops_match_oracle() {
    let mut cache = ChainedLruCore::new(CAPACITY);
    let mut oracle = Oracle::default();
    let mut rng = Lcg(0x5eed);

    for step in 0..OPS {
        let key = rng.next() % KEY_SPACE;
        match rng.next() % 10 {
            // Weighted toward inserts so the cache stays saturated.
            0..=3 => {
                let value = rng.next();
                assert_eq!(
                    cache.insert(key, value),
                    oracle.insert(key, value),
                    "insert mismatch at step {step}"
                );
            }
            4..=6 => {
                assert_eq!(
                    cache.get(&key).copied(),
                    oracle.get(key),
                    "get mismatch at step {step}"
                );
            }
            7 | 8 => {
                assert_eq!(
                    cache.peek(&key).copied(),
                    oracle.peek(key),
                    "peek mismatch at step {step}"
                );
            }
            _ => {
                assert_eq!(
                    cache.remove(&key),
                    oracle.remove(key),
                    "remove mismatch at step {step}"
                );
            }
        }

        assert_eq!(cache.len(), oracle.entries.len(), "size mismatch at step {step}");
        assert!(cache.len() <= CAPACITY);
        cache.check_invariants().unwrap();
    }

    // The surviving entries drain in exactly the oracle's recency order.
    for &(key, value) in &oracle.entries {
        assert_eq!(cache.pop_lru(), Some((key, value)));
    }
    assert!(cache.is_empty());
}

#[test]
fn oracle_and_cache_agree_on_recency_ranks() {
    let mut cache = ChainedLruCore::new(CAPACITY);
    let mut oracle = Oracle::default();
    let mut rng = Lcg(0xfeed);

    for _ in 0..1_000 {
        let key = rng.next() % KEY_SPACE;
        if rng.next() % 2 == 0 {
            let value = rng.next();
            cache.insert(key, value);
            oracle.insert(key, value);
        } else {
            cache.get(&key);
            oracle.get(key);
        }
    }

    // Rank 0 is most recent; the oracle stores most recent last.
    let total = oracle.entries.len();
    for (pos, &(key, _)) in oracle.entries.iter().enumerate() {
        assert_eq!(cache.recency_rank(&key), Some(total - 1 - pos));
    }
}
