//! Authentication error types.

use brickvest_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("username must not be empty")]
    UsernameEmpty,

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session token")]
    SessionInvalid,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordTooShort { .. } | AuthError::UsernameEmpty => {
                CoreError::Validation {
                    message: err.to_string(),
                }
            }
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::SessionInvalid => CoreError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => CoreError::Crypto(msg),
        }
    }
}
