//! # Passcode Store
//!
//! Cache-backed one-time passcodes: issue a short-lived numeric code for a
//! user, keep only a salted hash of it, and accept it exactly once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use passcode_store::{
//!     CacheConfig, CachingPasscodeStore, MemoryCacheManager, PasscodeConfig, PasscodeRequest,
//!     PasscodeStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let caches = MemoryCacheManager::new().with_cache(CacheConfig::new(
//!         "passcodeCache",
//!         CacheConfig::DEFAULT_PASSCODE_TTL,
//!     ))?;
//!
//!     let store = CachingPasscodeStore::builder(PasscodeConfig::new())
//!         .cache_manager(caches)
//!         .build()
//!         .await?;
//!
//!     let request = PasscodeRequest::new("user-1234").with_parameter("client_id", "app");
//!     let code = store.issue(&request).await?;
//!
//!     // deliver `code` out of band, then later:
//!     let outcome = store.validate(&PasscodeRequest::new("user-1234"), &code).await?;
//!     assert!(outcome.is_valid());
//!
//!     Ok(())
//! }
//! ```

pub mod core;

// Re-export core abstractions
pub use passcode_store_core::{
    Argon2Config, Argon2Hasher, AuthorizationParameters, BcryptHasher, CacheAdapter, CacheConfig,
    CacheManager, DEFAULT_CACHE_NAME, LogLevel, Logger, MemoryCacheAdapter, MemoryCacheManager,
    PASSCODE_UPPER_BOUND, PasscodeConfig, PasscodeError, PasscodeGenerator, PasscodeHasher,
    PasscodeRecord, PasscodeRequest, PasscodeResult, PasscodeStore, PasscodeValidation,
    TracingLogger, is_well_formed,
};

// Re-export adapters
pub mod adapters {
    pub use passcode_store_core::adapters::{
        CacheAdapter, CacheManager, MemoryCacheAdapter, MemoryCacheManager,
    };

    #[cfg(feature = "redis-cache")]
    pub use passcode_store_core::adapters::RedisCacheAdapter;
}

pub use crate::core::{CachingPasscodeStore, PasscodeStoreBuilder};
