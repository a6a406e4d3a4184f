//! Error types for the BrickVest system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A domain rule rejected the operation (insufficient balance,
    /// property not open for investment, ...). Maps to HTTP 400.
    #[error("{message}")]
    BusinessRule { message: String },

    /// A referenced foreign entity is missing at read time. This is
    /// corrupted state, not a normal runtime condition.
    #[error("Internal inconsistency: {message}")]
    Inconsistent { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the ubiquitous not-found case.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        CoreError::BusinessRule {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
