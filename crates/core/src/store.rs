use async_trait::async_trait;

use crate::error::PasscodeResult;
use crate::types::{PasscodeRequest, PasscodeValidation};

/// One-time passcode lifecycle: issue a code for a user, then accept it
/// exactly once.
///
/// Per user the record moves `ABSENT -> ISSUED` on [`issue`](Self::issue)
/// and back to `ABSENT` on a successful [`validate`](Self::validate) or when
/// the cache expires it. A failed validation or a re-issue leaves the user
/// in `ISSUED`; a re-issue replaces the earlier code.
#[async_trait]
pub trait PasscodeStore: Send + Sync {
    /// Generate a fresh code for `request.user_id`, persist only its hash,
    /// and return the plaintext for out-of-band delivery.
    async fn issue(&self, request: &PasscodeRequest) -> PasscodeResult<String>;

    /// Check `code` for `request.user_id`. A match consumes the record and
    /// returns it; everything else is [`PasscodeValidation::Invalid`].
    async fn validate(
        &self,
        request: &PasscodeRequest,
        code: &str,
    ) -> PasscodeResult<PasscodeValidation>;
}
