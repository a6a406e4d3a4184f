//! Shared application state.

use brickvest_auth::{AuthConfig, AuthService};
use brickvest_core::storage::Storage;

/// Application state injected into every handler. Generic over the
/// storage backend so both backends share one route layer.
pub struct AppState<S> {
    pub storage: S,
    pub auth: AuthService<S>,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<S: Storage> AppState<S> {
    pub fn new(storage: S, auth_config: AuthConfig) -> Self {
        let auth = AuthService::new(storage.clone(), auth_config);
        Self { storage, auth }
    }
}
