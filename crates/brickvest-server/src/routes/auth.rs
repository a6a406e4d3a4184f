//! Registration, login, logout, and the current-user endpoint.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Router, extract::State};
use brickvest_auth::{Credentials, RegisterInput};
use brickvest_core::error::CoreError;
use brickvest_core::models::user::User;
use brickvest_core::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/register", post(register::<S>))
        .route("/api/login", post(login::<S>))
        .route("/api/logout", post(logout::<S>))
        .route("/api/user", get(current_user::<S>))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// Session payload returned by register and login. The raw token is
/// the client's bearer credential; it is never stored server-side.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

async fn register<S: Storage>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let ctx = state
        .auth
        .register(RegisterInput {
            username: body.username,
            password: body.password,
            full_name: body.full_name,
            email: body.email,
            phone_number: body.phone_number,
            ip_address: client_ip(&headers),
            user_agent: user_agent(&headers),
        })
        .await
        .map_err(|err| match err {
            CoreError::AlreadyExists { .. } => ApiError::bad_request("Username already exists"),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: ctx.token,
            expires_at: ctx.expires_at,
            user: ctx.user,
        }),
    ))
}

async fn login<S: Storage>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<SessionResponse>> {
    let ctx = state
        .auth
        .login(Credentials {
            username: body.username,
            password: body.password,
            ip_address: client_ip(&headers),
            user_agent: user_agent(&headers),
        })
        .await?;

    Ok(Json(SessionResponse {
        token: ctx.token,
        expires_at: ctx.expires_at,
        user: ctx.user,
    }))
}

async fn logout<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    state.auth.logout(current.session.id).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}

async fn current_user<S: Storage>(current: CurrentUser) -> Json<User> {
    Json(current.user)
}
