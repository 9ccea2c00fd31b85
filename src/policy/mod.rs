pub mod lru;

pub use lru::ChainedLruCore;
#[cfg(feature = "concurrency")]
pub use lru::ConcurrentChainedLru;
