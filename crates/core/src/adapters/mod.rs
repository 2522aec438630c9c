pub mod cache;
pub mod manager;

#[cfg(feature = "redis-cache")]
pub mod redis;

pub use cache::{CacheAdapter, MemoryCacheAdapter};
pub use manager::{CacheManager, MemoryCacheManager};

#[cfg(feature = "redis-cache")]
pub use self::redis::RedisCacheAdapter;
