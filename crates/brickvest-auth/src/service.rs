//! Authentication service: registration, login, logout, and
//! per-request session resolution.

use brickvest_core::error::{CoreError, CoreResult};
use brickvest_core::models::session::{NewSession, Session};
use brickvest_core::models::user::{NewUser, User};
use brickvest_core::storage::{SessionStore, UserStore};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A freshly established session: the raw token goes back to the
/// client, the hash is already persisted.
#[derive(Debug)]
pub struct SessionContext {
    pub user: User,
    pub session_id: Uuid,
    /// Raw opaque token (returned to the client, never stored).
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service.
///
/// Generic over the storage contract so the auth layer has no
/// dependency on either backend crate.
#[derive(Clone)]
pub struct AuthService<S> {
    storage: S,
    config: AuthConfig,
}

impl<S: UserStore + SessionStore> AuthService<S> {
    pub fn new(storage: S, config: AuthConfig) -> Self {
        Self { storage, config }
    }

    /// Create a user and open their first session.
    pub async fn register(&self, input: RegisterInput) -> CoreResult<SessionContext> {
        if input.username.trim().is_empty() {
            return Err(AuthError::UsernameEmpty.into());
        }
        if input.password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort {
                min: self.config.min_password_length,
            }
            .into());
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        let user = self
            .storage
            .create_user(NewUser {
                username: input.username,
                password_hash,
                full_name: input.full_name,
                email: input.email,
                phone_number: input.phone_number,
                avatar_url: None,
            })
            .await?;

        self.open_session(user, input.ip_address, input.user_agent)
            .await
    }

    /// Authenticate with username + password and open a session.
    pub async fn login(&self, input: Credentials) -> CoreResult<SessionContext> {
        // Absence and a wrong password are indistinguishable to the
        // caller.
        let user = match self.storage.get_user_by_username(&input.username).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.storage.record_login(user.id).await?;

        self.open_session(user, input.ip_address, input.user_agent)
            .await
    }

    /// Resolve a raw bearer token to its user. Fails with
    /// `AuthenticationFailed` for unknown or expired tokens.
    pub async fn authenticate(&self, raw_token: &str) -> CoreResult<(User, Session)> {
        let token_hash = token::hash_session_token(raw_token);
        let session = match self.storage.get_session_by_token_hash(&token_hash).await {
            Ok(s) => s,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::SessionInvalid.into()),
            Err(e) => return Err(e),
        };

        if session.expires_at <= Utc::now() {
            let _ = self.storage.delete_session(session.id).await;
            return Err(AuthError::SessionExpired.into());
        }

        let user = self.storage.get_user(session.user_id).await?;
        Ok((user, session))
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> CoreResult<()> {
        self.storage.delete_session(session_id).await
    }

    async fn open_session(
        &self,
        user: User,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> CoreResult<SessionContext> {
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .storage
            .create_session(NewSession {
                user_id: user.id,
                token_hash,
                ip_address,
                user_agent,
                expires_at,
            })
            .await?;

        Ok(SessionContext {
            user,
            session_id: session.id,
            token: raw_token,
            expires_at: session.expires_at,
        })
    }
}
