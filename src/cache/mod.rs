//! In-memory response cache with single-flight request coordination
//!
//! Concurrent callers asking for the same logical request share one network
//! fetch; fresh responses are served from memory until they expire.

pub mod client;
pub mod coordinator;
pub mod key;
pub mod slot;
pub mod storage;

use std::time::Duration;

/// Default freshness window for cached API responses
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(10 * 60); // 10 min

/// Default time a caller waits on someone else's in-flight request
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60);

// Re-export main types
pub use client::CachedRecipeClient;
pub use coordinator::CoordinatorStats;
pub use storage::CacheStats;
