use thiserror::Error;

/// Passcode store error types.
///
/// A failed validation is not an error: wrong codes, unknown users and
/// expired records all come back as
/// [`PasscodeValidation::Invalid`](crate::types::PasscodeValidation::Invalid).
/// The variants here cover misconfiguration, malformed input and backend
/// faults.
#[derive(Error, Debug)]
pub enum PasscodeError {
    // --- initialization ---
    #[error("Secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // --- request ---
    #[error("Validation error: {0}")]
    Validation(String),

    // --- backend ---
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Passcode hashing error: {0}")]
    PasscodeHash(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PasscodeError {
    /// Whether this error should abort startup of the owning service rather
    /// than fail a single request.
    pub fn is_initialization_error(&self) -> bool {
        matches!(
            self,
            Self::RandomSourceUnavailable(_) | Self::CacheUnavailable(_) | Self::Config(_)
        )
    }

    // --- Constructors ---

    pub fn random_source(message: impl Into<String>) -> Self {
        Self::RandomSourceUnavailable(message.into())
    }

    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::CacheUnavailable(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    pub fn hash(message: impl Into<String>) -> Self {
        Self::PasscodeHash(message.into())
    }
}

impl From<validator::ValidationErrors> for PasscodeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type PasscodeResult<T> = Result<T, PasscodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_errors_are_classified() {
        assert!(PasscodeError::random_source("no entropy").is_initialization_error());
        assert!(PasscodeError::cache_unavailable("passcodeCache").is_initialization_error());
        assert!(PasscodeError::config("empty cache name").is_initialization_error());

        assert!(!PasscodeError::validation("user_id").is_initialization_error());
        assert!(!PasscodeError::cache("lock poisoned").is_initialization_error());
        assert!(!PasscodeError::hash("bad hash").is_initialization_error());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PasscodeError::cache_unavailable("no cache named 'passcodeCache'").to_string(),
            "Cache unavailable: no cache named 'passcodeCache'"
        );
        assert_eq!(
            PasscodeError::validation("user_id must not be empty").to_string(),
            "Validation error: user_id must not be empty"
        );
    }
}
