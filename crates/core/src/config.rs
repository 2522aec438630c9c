use crate::error::PasscodeError;
use crate::logger::{Logger, default_logger};
use chrono::Duration;
use std::sync::Arc;

/// Name of the cache the store binds to unless configured otherwise.
pub const DEFAULT_CACHE_NAME: &str = "passcodeCache";

/// Main configuration for the passcode store.
#[derive(Clone)]
pub struct PasscodeConfig {
    /// Name of the cache to bind through the
    /// [`CacheManager`](crate::adapters::CacheManager) at build time.
    ///
    /// Defaults to `"passcodeCache"`.
    pub cache_name: String,

    /// Parameters for the default Argon2 hasher. Ignored when a custom
    /// hasher is supplied to the builder.
    pub argon2: Argon2Config,

    /// Logger implementation for passcode lifecycle events.
    ///
    /// Defaults to a [`TracingLogger`](crate::logger::TracingLogger).
    pub logger: Arc<dyn Logger>,

    /// Verify against a decoy hash when no record exists so that unknown
    /// users cost the same as wrong codes.
    ///
    /// Defaults to `true`.
    pub equalize_timing: bool,
}

/// Argon2 hashing configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory size in KiB.
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

/// Configuration for a named cache owned by the host.
///
/// Expiry belongs to the cache, never to the passcode store, so a TTL must be
/// chosen explicitly when the cache is declared.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache name, looked up by [`PasscodeConfig::cache_name`].
    pub name: String,

    /// Lifetime of every entry written to the cache.
    pub ttl: Duration,

    /// Maximum number of live entries. `None` means unbounded.
    pub max_entries: Option<usize>,
}

impl std::fmt::Debug for PasscodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasscodeConfig")
            .field("cache_name", &self.cache_name)
            .field("argon2", &self.argon2)
            .field("equalize_timing", &self.equalize_timing)
            .finish_non_exhaustive()
    }
}

impl Default for PasscodeConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            argon2: Argon2Config::default(),
            logger: default_logger(),
            equalize_timing: true,
        }
    }
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 4096, // 4MB
            time_cost: 3,      // 3 iterations
            parallelism: 1,    // 1 thread
        }
    }
}

impl PasscodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the cache to bind.
    pub fn cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Set the Argon2 parameters for the default hasher.
    pub fn argon2(mut self, config: Argon2Config) -> Self {
        self.argon2 = config;
        self
    }

    /// Set a custom logger implementation.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Enable or disable decoy verification for absent records.
    pub fn equalize_timing(mut self, enabled: bool) -> Self {
        self.equalize_timing = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), PasscodeError> {
        if self.cache_name.trim().is_empty() {
            return Err(PasscodeError::config("Cache name cannot be empty"));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// A short lifetime suitable for out-of-band passcodes. Offered for
    /// hosts that want a starting point; nothing applies it implicitly.
    pub const DEFAULT_PASSCODE_TTL: Duration = Duration::minutes(5);

    /// Longest TTL a cache may declare.
    pub const MAX_TTL: Duration = Duration::days(366);

    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            max_entries: None,
        }
    }

    /// Cap the number of live entries.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn validate(&self) -> Result<(), PasscodeError> {
        if self.name.trim().is_empty() {
            return Err(PasscodeError::config("Cache name cannot be empty"));
        }

        if self.ttl <= Duration::zero() {
            return Err(PasscodeError::config(format!(
                "Cache '{}' must have a positive TTL",
                self.name
            )));
        }

        if self.ttl > Self::MAX_TTL {
            return Err(PasscodeError::config(format!(
                "Cache '{}' TTL exceeds {} days",
                self.name,
                Self::MAX_TTL.num_days()
            )));
        }

        if self.max_entries == Some(0) {
            return Err(PasscodeError::config(format!(
                "Cache '{}' must allow at least one entry",
                self.name
            )));
        }

        Ok(())
    }
}
