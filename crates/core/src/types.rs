use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Opaque context carried from issuance to successful validation so the
/// calling flow can resume where it left off.
pub type AuthorizationParameters = HashMap<String, String>;

/// Input to [`PasscodeStore::issue`](crate::store::PasscodeStore::issue) and
/// [`PasscodeStore::validate`](crate::store::PasscodeStore::validate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PasscodeRequest {
    #[serde(rename = "userId")]
    #[validate(length(min = 1, max = 255, message = "User id must be 1 to 255 characters"))]
    pub user_id: String,
    #[serde(rename = "authorizationParameters", default)]
    pub authorization_parameters: AuthorizationParameters,
}

impl PasscodeRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            authorization_parameters: HashMap::new(),
        }
    }

    pub fn with_authorization_parameters(mut self, parameters: AuthorizationParameters) -> Self {
        self.authorization_parameters = parameters;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.authorization_parameters
            .insert(key.into(), value.into());
        self
    }
}

/// The entity kept in the cache, keyed by `user_id`.
///
/// `passcode_hash` is a salted one-way hash of `user_id + code`; the
/// plaintext code is never part of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasscodeRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "passcodeHash")]
    pub passcode_hash: String,
    #[serde(rename = "authorizationParameters", default)]
    pub authorization_parameters: AuthorizationParameters,
}

/// Outcome of a validation attempt.
///
/// Unknown user, wrong code and expired code all collapse into
/// [`PasscodeValidation::Invalid`] so callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum PasscodeValidation {
    Valid(PasscodeRecord),
    Invalid,
}

impl PasscodeValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn record(&self) -> Option<&PasscodeRecord> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Invalid => None,
        }
    }

    pub fn into_record(self) -> Option<PasscodeRecord> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Invalid => None,
        }
    }
}
