//! Own-profile view and merge-update.

use axum::routing::get;
use axum::{Router, extract::State};
use brickvest_core::models::user::{UpdateUserProfile, User};
use brickvest_core::storage::Storage;

use crate::error::ApiResult;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new().route(
        "/api/profile",
        get(get_profile::<S>).patch(update_profile::<S>),
    )
}

async fn get_profile<S: Storage>(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

async fn update_profile<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Json(input): Json<UpdateUserProfile>,
) -> ApiResult<Json<User>> {
    let user = state
        .storage
        .update_user_profile(current.user.id, input)
        .await?;
    Ok(Json(user))
}
