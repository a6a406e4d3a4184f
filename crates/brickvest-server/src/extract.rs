//! Request extractors: authenticated callers and the JSON body
//! wrapper used by every route.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use brickvest_core::models::session::Session;
use brickvest_core::models::user::User;
use brickvest_core::storage::Storage;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::AppState;

/// `axum::Json` with its rejection reshaped into the API's uniform
/// `{"message": ...}` body. Malformed and mistyped requests come back
/// as 400 like every other validation failure.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// The authenticated caller, resolved from the bearer token.
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

/// An authenticated caller holding the admin role.
pub struct AdminUser {
    pub user: User,
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(ApiError::unauthorized)
}

#[axum::async_trait]
impl<S: Storage> FromRequestParts<AppState<S>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let (user, session) = state
            .auth
            .authenticate(token)
            .await
            .map_err(|_| ApiError::unauthorized())?;
        Ok(CurrentUser { user, session })
    }
}

#[axum::async_trait]
impl<S: Storage> FromRequestParts<AppState<S>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.user.is_admin() {
            return Err(ApiError::forbidden());
        }
        Ok(AdminUser { user: current.user })
    }
}
