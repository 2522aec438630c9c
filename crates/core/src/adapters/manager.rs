use std::collections::HashMap;
use std::sync::Arc;

use super::cache::{CacheAdapter, MemoryCacheAdapter};
use crate::config::CacheConfig;
use crate::error::PasscodeResult;

/// Registry of named caches, consulted once when a store is built.
pub trait CacheManager: Send + Sync {
    /// Look up a cache by name.
    fn get_cache(&self, name: &str) -> Option<Arc<dyn CacheAdapter>>;

    /// Names of all registered caches.
    fn cache_names(&self) -> Vec<String>;
}

/// Cache manager holding caches in process.
#[derive(Default)]
pub struct MemoryCacheManager {
    caches: HashMap<String, Arc<dyn CacheAdapter>>,
}

impl MemoryCacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a [`MemoryCacheAdapter`] from `config`.
    pub fn with_cache(mut self, config: CacheConfig) -> PasscodeResult<Self> {
        let name = config.name.clone();
        let cache = MemoryCacheAdapter::new(config)?;
        self.caches.insert(name, Arc::new(cache));
        Ok(self)
    }

    /// Register any adapter under `name`, replacing an earlier one.
    pub fn register(mut self, name: impl Into<String>, cache: Arc<dyn CacheAdapter>) -> Self {
        self.caches.insert(name.into(), cache);
        self
    }
}

impl CacheManager for MemoryCacheManager {
    fn get_cache(&self, name: &str) -> Option<Arc<dyn CacheAdapter>> {
        self.caches.get(name).cloned()
    }

    fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.keys().cloned().collect();
        names.sort();
        names
    }
}
