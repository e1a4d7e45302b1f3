//! Bounded in-memory cache for decoded tiles.
//!
//! Entries are evicted strictly in insertion order (FIFO), not by recency.

mod memory;
mod stats;

pub use memory::{FifoCache, TileCache};
pub use stats::CacheStats;
