//! # Passcode Store Core
//!
//! Core abstractions for the passcode store: the [`PasscodeStore`] trait,
//! request and record types, errors, configuration, hashing, passcode
//! generation and cache adapters.

pub mod adapters;
pub mod config;
pub mod error;
pub mod generator;
pub mod hasher;
pub mod logger;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use adapters::{CacheAdapter, CacheManager, MemoryCacheAdapter, MemoryCacheManager};
#[cfg(feature = "redis-cache")]
pub use adapters::RedisCacheAdapter;
pub use config::{Argon2Config, CacheConfig, DEFAULT_CACHE_NAME, PasscodeConfig};
pub use error::{PasscodeError, PasscodeResult};
pub use generator::{PASSCODE_UPPER_BOUND, PasscodeGenerator, is_well_formed};
pub use hasher::{Argon2Hasher, BcryptHasher, PasscodeHasher};
pub use logger::{LogLevel, Logger, TracingLogger, default_logger};
pub use store::PasscodeStore;
pub use types::{AuthorizationParameters, PasscodeRecord, PasscodeRequest, PasscodeValidation};
