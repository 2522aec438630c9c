//! Shared test harness for `passcode-store`.
//!
//! Provides:
//! - [`TestHarness`]: a store bound to an inspectable in-memory cache with a
//!   recording logger.
//! - [`unique_user_id`]: atomic counter-based id generator to avoid
//!   collisions between tests.
//! - [`fast_config`]: Argon2 parameters cheap enough for test loops.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Duration;
use passcode_store::{
    Argon2Config, CacheAdapter, CacheConfig, CachingPasscodeStore, LogLevel, Logger,
    MemoryCacheAdapter, PasscodeConfig,
};

// ---------------------------------------------------------------------------
// Unique id generator
// ---------------------------------------------------------------------------

static USER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique user id for testing.
#[allow(dead_code)]
pub fn unique_user_id(prefix: &str) -> String {
    let n = USER_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{n}@test.com")
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn fast_argon2() -> Argon2Config {
    Argon2Config {
        memory_cost: 256,
        time_cost: 1,
        parallelism: 1,
    }
}

#[allow(dead_code)]
pub fn fast_config() -> PasscodeConfig {
    PasscodeConfig::new().argon2(fast_argon2())
}

// ---------------------------------------------------------------------------
// Recording logger
// ---------------------------------------------------------------------------

/// Logger that keeps every message for later inspection.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("[{level}] {message}"));
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub store: CachingPasscodeStore,
    pub cache: Arc<MemoryCacheAdapter>,
    pub logger: Arc<RecordingLogger>,
}

#[allow(dead_code)]
impl TestHarness {
    pub async fn new() -> Self {
        Self::with_cache_config(CacheConfig::new("passcodeCache", Duration::minutes(5))).await
    }

    pub async fn with_ttl(ttl: Duration) -> Self {
        Self::with_cache_config(CacheConfig::new("passcodeCache", ttl)).await
    }

    pub async fn with_cache_config(cache_config: CacheConfig) -> Self {
        let cache = Arc::new(
            MemoryCacheAdapter::new(cache_config).expect("Failed to create memory cache"),
        );
        let logger = Arc::new(RecordingLogger::default());

        let store = CachingPasscodeStore::builder(fast_config().logger(logger.clone()))
            .cache(cache.clone())
            .build()
            .await
            .expect("Failed to build passcode store");

        Self {
            store,
            cache,
            logger,
        }
    }

    /// Raw cached value for `user_id`, if any.
    pub async fn raw_record(&self, user_id: &str) -> Option<String> {
        self.cache
            .get(user_id)
            .await
            .expect("Failed to read cache")
    }
}
