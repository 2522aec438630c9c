//! Salted one-way hashing for stored passcodes.
//!
//! [`Argon2Hasher`] is the default. [`BcryptHasher`] exists for hosts that
//! share hashes with bcrypt-based systems.

use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};
use async_trait::async_trait;

use crate::config::Argon2Config;
use crate::error::{PasscodeError, PasscodeResult};

/// Longest input bcrypt takes into account; anything past it is ignored by
/// the algorithm.
pub const BCRYPT_MAX_INPUT_BYTES: usize = 72;

/// Default bcrypt cost factor
pub const BCRYPT_DEFAULT_COST: u32 = 12;

/// Pluggable hashing strategy for passcode records.
#[async_trait]
pub trait PasscodeHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt and return the encoded hash.
    async fn hash(&self, plaintext: &str) -> PasscodeResult<String>;

    /// Check `plaintext` against an encoded hash. Returns `Ok(false)` on a
    /// mismatch and `Err` only when the hash itself cannot be processed.
    async fn verify(&self, plaintext: &str, hash: &str) -> PasscodeResult<bool>;
}

// ---------------------------------------------------------------------------
// Argon2
// ---------------------------------------------------------------------------

/// Argon2id hasher producing PHC strings.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &Argon2Config) -> PasscodeResult<Self> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| PasscodeError::config(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

#[async_trait]
impl PasscodeHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> PasscodeResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasscodeError::hash(format!("Failed to hash passcode: {}", e)))?;

        Ok(hash.to_string())
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> PasscodeResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasscodeError::hash(format!("Invalid passcode hash: {}", e)))?;

        match self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasscodeError::hash(format!(
                "Failed to verify passcode: {}",
                e
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// bcrypt
// ---------------------------------------------------------------------------

/// bcrypt hasher.
///
/// Inputs longer than [`BCRYPT_MAX_INPUT_BYTES`] are refused by `hash`: with
/// a long user id, truncation would cut the code out of `user_id + code`.
/// Since no stored hash can come from such an input, `verify` treats one as
/// a plain mismatch.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: BCRYPT_DEFAULT_COST,
        }
    }

    pub fn with_cost(cost: u32) -> PasscodeResult<Self> {
        if !(4..=31).contains(&cost) {
            return Err(PasscodeError::config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                cost
            )));
        }
        Ok(Self { cost })
    }

    fn check_length(plaintext: &str) -> PasscodeResult<()> {
        if plaintext.len() > BCRYPT_MAX_INPUT_BYTES {
            return Err(PasscodeError::hash(format!(
                "bcrypt input exceeds {} bytes",
                BCRYPT_MAX_INPUT_BYTES
            )));
        }
        Ok(())
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasscodeHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> PasscodeResult<String> {
        Self::check_length(plaintext)?;
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| PasscodeError::hash(format!("Failed to hash passcode: {}", e)))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> PasscodeResult<bool> {
        if plaintext.len() > BCRYPT_MAX_INPUT_BYTES {
            return Ok(false);
        }
        bcrypt::verify(plaintext, hash)
            .map_err(|e| PasscodeError::hash(format!("Invalid passcode hash: {}", e)))
    }
}
