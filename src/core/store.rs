use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use passcode_store_core::{
    Argon2Hasher, CacheAdapter, CacheManager, PasscodeConfig, PasscodeError, PasscodeGenerator,
    PasscodeHasher, PasscodeRecord, PasscodeRequest, PasscodeResult, PasscodeStore,
    PasscodeValidation,
};

/// Passcode store that keeps hashed passcodes in a cache.
///
/// Build one with [`PasscodeStoreBuilder`]; construction fails fast when the
/// random source or the named cache is unavailable.
pub struct CachingPasscodeStore {
    config: Arc<PasscodeConfig>,
    cache: Arc<dyn CacheAdapter>,
    hasher: Arc<dyn PasscodeHasher>,
    generator: PasscodeGenerator,
    decoy_hash: Option<String>,
}

/// Builder for [`CachingPasscodeStore`].
///
/// A cache must be supplied either directly with [`cache`](Self::cache) or
/// through a [`CacheManager`] holding a cache named
/// [`PasscodeConfig::cache_name`].
pub struct PasscodeStoreBuilder {
    config: PasscodeConfig,
    cache_manager: Option<Arc<dyn CacheManager>>,
    cache: Option<Arc<dyn CacheAdapter>>,
    hasher: Option<Arc<dyn PasscodeHasher>>,
}

/// The hasher input binds the code to the user it was issued for.
fn passcode_input(user_id: &str, code: &str) -> String {
    format!("{}{}", user_id, code)
}

impl PasscodeStoreBuilder {
    pub fn new(config: PasscodeConfig) -> Self {
        Self {
            config,
            cache_manager: None,
            cache: None,
            hasher: None,
        }
    }

    /// Resolve the cache by name from `manager` at build time.
    pub fn cache_manager<M: CacheManager + 'static>(mut self, manager: M) -> Self {
        self.cache_manager = Some(Arc::new(manager));
        self
    }

    /// Resolve the cache by name from a shared manager at build time.
    pub fn shared_cache_manager(mut self, manager: Arc<dyn CacheManager>) -> Self {
        self.cache_manager = Some(manager);
        self
    }

    /// Bind a cache directly. Takes precedence over a cache manager.
    pub fn cache(mut self, cache: Arc<dyn CacheAdapter>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a custom hasher instead of Argon2.
    pub fn hasher<H: PasscodeHasher + 'static>(mut self, hasher: H) -> Self {
        self.hasher = Some(Arc::new(hasher));
        self
    }

    /// Build the store.
    pub async fn build(self) -> PasscodeResult<CachingPasscodeStore> {
        self.config.validate()?;

        let config = Arc::new(self.config);

        let cache = match (self.cache, self.cache_manager) {
            (Some(cache), _) => cache,
            (None, Some(manager)) => manager.get_cache(&config.cache_name).ok_or_else(|| {
                PasscodeError::cache_unavailable(format!(
                    "No cache named '{}' is registered (available: {:?})",
                    config.cache_name,
                    manager.cache_names()
                ))
            })?,
            (None, None) => {
                return Err(PasscodeError::cache_unavailable(
                    "No cache or cache manager configured",
                ));
            }
        };

        let generator = PasscodeGenerator::new()?;

        let hasher: Arc<dyn PasscodeHasher> = match self.hasher {
            Some(hasher) => hasher,
            None => Arc::new(Argon2Hasher::new(&config.argon2)?),
        };

        let decoy_hash = if config.equalize_timing {
            let decoy = format!("decoy:{}", generator.generate()?);
            Some(hasher.hash(&decoy).await?)
        } else {
            None
        };

        config.logger.info(&format!(
            "Passcode store bound to cache '{}'",
            config.cache_name
        ));

        Ok(CachingPasscodeStore {
            config,
            cache,
            hasher,
            generator,
            decoy_hash,
        })
    }
}

impl CachingPasscodeStore {
    /// Create a new builder.
    pub fn builder(config: PasscodeConfig) -> PasscodeStoreBuilder {
        PasscodeStoreBuilder::new(config)
    }

    pub fn config(&self) -> &PasscodeConfig {
        &self.config
    }

    /// The cache this store is bound to.
    pub fn cache(&self) -> &Arc<dyn CacheAdapter> {
        &self.cache
    }

    async fn verify_decoy(&self, input: &str) {
        if let Some(decoy_hash) = &self.decoy_hash {
            // The outcome is irrelevant; only the work matters.
            let _ = self.hasher.verify(input, decoy_hash).await;
        }
    }
}

#[async_trait]
impl PasscodeStore for CachingPasscodeStore {
    async fn issue(&self, request: &PasscodeRequest) -> PasscodeResult<String> {
        request.validate()?;

        let code = self.generator.generate()?;
        let passcode_hash = self
            .hasher
            .hash(&passcode_input(&request.user_id, &code))
            .await?;

        let record = PasscodeRecord {
            user_id: request.user_id.clone(),
            passcode_hash,
            authorization_parameters: request.authorization_parameters.clone(),
        };
        let value = serde_json::to_string(&record)?;

        self.cache.set(&request.user_id, &value).await?;

        self.config
            .logger
            .debug(&format!("Issued passcode for user '{}'", request.user_id));

        Ok(code)
    }

    async fn validate(
        &self,
        request: &PasscodeRequest,
        code: &str,
    ) -> PasscodeResult<PasscodeValidation> {
        request.validate()?;

        let user_id = &request.user_id;
        let input = passcode_input(user_id, code);

        let Some(stored) = self.cache.get(user_id).await? else {
            self.verify_decoy(&input).await;
            self.config
                .logger
                .debug(&format!("Passcode rejected for user '{}'", user_id));
            return Ok(PasscodeValidation::Invalid);
        };

        let record: PasscodeRecord = serde_json::from_str(&stored).map_err(|e| {
            self.config.logger.error(&format!(
                "Unreadable passcode record for user '{}': {}",
                user_id, e
            ));
            PasscodeError::from(e)
        })?;

        let matches = self
            .hasher
            .verify(&input, &record.passcode_hash)
            .await
            .inspect_err(|e| {
                self.config.logger.error(&format!(
                    "Passcode verification failed for user '{}': {}",
                    user_id, e
                ));
            })?;

        if !matches {
            self.config
                .logger
                .debug(&format!("Passcode rejected for user '{}'", user_id));
            return Ok(PasscodeValidation::Invalid);
        }

        // Only the caller that removes this exact record may accept it.
        if !self.cache.delete_if_match(user_id, &stored).await? {
            self.config.logger.warn(&format!(
                "Passcode for user '{}' was consumed or replaced concurrently",
                user_id
            ));
            return Ok(PasscodeValidation::Invalid);
        }

        self.config
            .logger
            .debug(&format!("Passcode accepted for user '{}'", user_id));

        Ok(PasscodeValidation::Valid(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use passcode_store_core::{Argon2Config, CacheConfig, MemoryCacheAdapter, MemoryCacheManager};

    fn fast_config() -> PasscodeConfig {
        PasscodeConfig::new().argon2(Argon2Config {
            memory_cost: 256,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_passcode_input_binds_user() {
        assert_eq!(passcode_input("alice", "42"), "alice42");
        assert_ne!(passcode_input("alice", "42"), passcode_input("alice4", "2x"));
    }

    #[tokio::test]
    async fn test_build_without_cache_fails() {
        let result = PasscodeStoreBuilder::new(fast_config()).build().await;
        assert!(matches!(result, Err(PasscodeError::CacheUnavailable(_))));
    }

    #[tokio::test]
    async fn test_build_with_unknown_cache_name_fails() {
        let manager = MemoryCacheManager::new()
            .with_cache(CacheConfig::new("otherCache", Duration::minutes(5)))
            .unwrap();

        let err = match PasscodeStoreBuilder::new(fast_config())
            .cache_manager(manager)
            .build()
            .await
        {
            Ok(_) => panic!("expected missing cache to fail the build"),
            Err(err) => err,
        };

        assert!(err.is_initialization_error());
        assert!(err.to_string().contains("passcodeCache"));
    }

    #[tokio::test]
    async fn test_build_rejects_bad_argon2_params() {
        let cache = Arc::new(
            MemoryCacheAdapter::new(CacheConfig::new("passcodeCache", Duration::minutes(5)))
                .unwrap(),
        );
        let config = PasscodeConfig::new().argon2(Argon2Config {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 1,
        });

        let result = PasscodeStoreBuilder::new(config).cache(cache).build().await;
        assert!(matches!(result, Err(PasscodeError::Config(_))));
    }

    #[tokio::test]
    async fn test_decoy_hash_follows_config() {
        let cache: Arc<dyn CacheAdapter> = Arc::new(
            MemoryCacheAdapter::new(CacheConfig::new("passcodeCache", Duration::minutes(5)))
                .unwrap(),
        );

        let guarded = PasscodeStoreBuilder::new(fast_config())
            .cache(cache.clone())
            .build()
            .await
            .unwrap();
        assert!(guarded.decoy_hash.is_some());

        let unguarded = PasscodeStoreBuilder::new(fast_config().equalize_timing(false))
            .cache(cache)
            .build()
            .await
            .unwrap();
        assert!(unguarded.decoy_hash.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error() {
        let cache = Arc::new(
            MemoryCacheAdapter::new(CacheConfig::new("passcodeCache", Duration::minutes(5)))
                .unwrap(),
        );
        let store = PasscodeStoreBuilder::new(fast_config())
            .cache(cache.clone())
            .build()
            .await
            .unwrap();

        cache.set("alice", "{not json").await.unwrap();

        let result = store
            .validate(&PasscodeRequest::new("alice"), "123")
            .await;
        assert!(matches!(result, Err(PasscodeError::Serialization(_))));
    }
}
