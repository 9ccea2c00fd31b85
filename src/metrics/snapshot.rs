/// Flat, copyable view of the LRU counters at one point in time.
///
/// Produced by
/// [`ChainedLruCore::metrics_snapshot`](crate::policy::lru::ChainedLruCore::metrics_snapshot).
#[derive(Debug, Default, Clone, Copy)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub peek_lru_calls: u64,
    pub peek_lru_found: u64,
    pub recency_rank_calls: u64,
    pub recency_rank_found: u64,
    pub recency_rank_scan_steps: u64,
    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Fraction of recorded `get` calls that hit.
    ///
    /// Returns 1.0 when no lookups have been recorded.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            1.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_of_empty_sample_is_one() {
        let snap = LruMetricsSnapshot::default();
        assert_eq!(snap.hit_rate(), 1.0);
    }

    #[test]
    fn hit_rate_is_hits_over_calls() {
        let snap = LruMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
