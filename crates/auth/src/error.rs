//! Error model for the authentication/authorization boundary.

use thiserror::Error;

/// Result type used across the auth layer.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by calling code misusing the API.
///
/// Untrusted claim data never produces one of these: an incomplete or
/// malformed principal resolves to `false`/`None` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A required argument was absent or blank.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A policy name was looked up that the registry does not hold.
    #[error("unknown policy '{0}'")]
    UnknownPolicy(String),

    /// Two policies were registered under the same name.
    #[error("duplicate policy '{0}'")]
    DuplicatePolicy(String),
}

impl AuthError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unknown_policy(name: impl Into<String>) -> Self {
        Self::UnknownPolicy(name.into())
    }
}

/// Nested role content that could not be read in the expected shape.
///
/// Only ever handled locally by the extractor; it contributes zero roles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedClaimData {
    #[error("claim value is not valid JSON")]
    NotJson,

    #[error("claim value is not a JSON object")]
    NotAnObject,

    #[error("'roles' is not an array of strings")]
    RolesNotStrings,
}
