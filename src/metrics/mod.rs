//! Counter-based observability for the cache (feature `metrics`).
//!
//! Responsibilities are split the same way the cache traits are:
//! recorders only write counters, snapshot providers only read them.
//! Recording happens inline in the cache's hot paths; consumption goes
//! through [`snapshot::LruMetricsSnapshot`], a flat `Copy` view suitable
//! for tests, benchmarks, and periodic export.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::LruMetrics;
pub use snapshot::LruMetricsSnapshot;
