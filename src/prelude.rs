pub use crate::builder::CacheBuilder;
pub use crate::ds::{EntryArena, EntryId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentChainedLru;
pub use crate::policy::lru::{ChainedLruCore, DefaultHashBuilder, DEFAULT_LOAD_FACTOR};
pub use crate::traits::{
    BucketSizing, CoreCache, FixedLoadFactor, LruCacheTrait, MutableCache,
};
