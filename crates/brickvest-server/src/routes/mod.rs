//! Route assembly.

mod admin;
mod auth;
mod cards;
mod portfolio;
mod profile;
mod properties;
mod wallet;

use axum::Router;
use brickvest_core::storage::Storage;

use crate::state::AppState;

/// Build the full API router over the given backend.
pub fn router<S: Storage>(state: AppState<S>) -> Router {
    Router::new()
        .merge(auth::router::<S>())
        .merge(properties::router::<S>())
        .merge(portfolio::router::<S>())
        .merge(wallet::router::<S>())
        .merge(cards::router::<S>())
        .merge(profile::router::<S>())
        .merge(admin::router::<S>())
        .with_state(state)
}
