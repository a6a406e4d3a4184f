//! Argon2id password hashing, opaque session token issuance, and
//! registration/login orchestration.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, Credentials, RegisterInput, SessionContext};
