use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::CacheConfig;
use crate::error::{PasscodeError, PasscodeResult};

/// Key-value cache holding passcode records.
///
/// Expiry and capacity are properties of the cache. Callers never pass a
/// TTL; entries disappear according to how the cache was configured.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Store a value, replacing any existing entry for `key`.
    async fn set(&self, key: &str, value: &str) -> PasscodeResult<()>;

    /// Get a live value by key
    async fn get(&self, key: &str) -> PasscodeResult<Option<String>>;

    /// Delete a value by key
    async fn delete(&self, key: &str) -> PasscodeResult<()>;

    /// Delete `key` only if it currently holds `expected`. Returns whether
    /// an entry was removed.
    ///
    /// The default body is a plain read followed by a delete. Adapters that
    /// can do this atomically should override it; the provided ones do.
    async fn delete_if_match(&self, key: &str, expected: &str) -> PasscodeResult<bool> {
        match self.get(key).await? {
            Some(current) if current == expected => {
                self.delete(key).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Check if a live entry exists
    async fn exists(&self, key: &str) -> PasscodeResult<bool>;

    /// Clear all cached values
    async fn clear(&self) -> PasscodeResult<()>;
}

/// In-memory cache adapter with per-cache TTL and optional capacity.
pub struct MemoryCacheAdapter {
    name: String,
    ttl: Duration,
    max_entries: Option<usize>,
    data: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl MemoryCacheAdapter {
    pub fn new(config: CacheConfig) -> PasscodeResult<Self> {
        config.validate()?;
        Ok(Self {
            name: config.name,
            ttl: config.ttl,
            max_entries: config.max_entries,
            data: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live `(key, value)` pairs, in no particular order.
    pub fn snapshot(&self) -> PasscodeResult<Vec<(String, String)>> {
        let data = self.lock()?;
        let now = Utc::now();
        Ok(data
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect())
    }

    /// Number of live entries.
    pub fn len(&self) -> PasscodeResult<usize> {
        let data = self.lock()?;
        let now = Utc::now();
        Ok(data.values().filter(|entry| entry.expires_at > now).count())
    }

    pub fn is_empty(&self) -> PasscodeResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> PasscodeResult<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        self.data
            .lock()
            .map_err(|_| PasscodeError::cache(format!("cache '{}' lock poisoned", self.name)))
    }

    /// Clean up expired entries
    fn cleanup_expired(data: &mut HashMap<String, CacheEntry>, now: DateTime<Utc>) {
        data.retain(|_, entry| entry.expires_at > now);
    }

    /// Make room for one new key by dropping the entry closest to expiry.
    fn evict_for_insert(&self, data: &mut HashMap<String, CacheEntry>, key: &str) {
        let Some(max_entries) = self.max_entries else {
            return;
        };
        if data.contains_key(key) {
            return;
        }
        while data.len() >= max_entries {
            let oldest = data
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(oldest) => {
                    data.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

impl std::fmt::Debug for MemoryCacheAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheAdapter")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheAdapter for MemoryCacheAdapter {
    async fn set(&self, key: &str, value: &str) -> PasscodeResult<()> {
        let mut data = self.lock()?;
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            PasscodeError::cache(format!("cache '{}' TTL overflows the clock", self.name))
        })?;
        Self::cleanup_expired(&mut data, now);
        self.evict_for_insert(&mut data, key);

        data.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> PasscodeResult<Option<String>> {
        let data = self.lock()?;
        let now = Utc::now();

        Ok(data
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> PasscodeResult<()> {
        let mut data = self.lock()?;
        data.remove(key);
        Ok(())
    }

    async fn delete_if_match(&self, key: &str, expected: &str) -> PasscodeResult<bool> {
        let mut data = self.lock()?;
        let now = Utc::now();

        let matches = data
            .get(key)
            .is_some_and(|entry| entry.expires_at > now && entry.value == expected);
        if matches {
            data.remove(key);
        }

        Ok(matches)
    }

    async fn exists(&self, key: &str) -> PasscodeResult<bool> {
        let data = self.lock()?;
        let now = Utc::now();
        Ok(data.get(key).is_some_and(|entry| entry.expires_at > now))
    }

    async fn clear(&self) -> PasscodeResult<()> {
        let mut data = self.lock()?;
        data.clear();
        Ok(())
    }
}
