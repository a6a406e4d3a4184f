//! The caller's investment portfolio.

use axum::routing::get;
use axum::{Router, extract::State};
use brickvest_core::models::stake::StakeWithProperty;
use brickvest_core::storage::Storage;

use crate::error::ApiResult;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new().route("/api/portfolio", get(portfolio::<S>))
}

async fn portfolio<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<StakeWithProperty>>> {
    let stakes = state.storage.get_user_stakes(current.user.id).await?;
    Ok(Json(stakes))
}
