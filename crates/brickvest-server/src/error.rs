//! API error type and the mapping from domain errors to HTTP.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brickvest_core::error::CoreError;
use serde_json::json;
use tracing::error;

/// An error ready to leave the route layer as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".into(),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Forbidden".into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

/// `payment_card` -> `Payment card`, for user-facing messages.
fn display_entity(s: &str) -> String {
    let spaced = s.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, .. } => {
                ApiError::not_found(format!("{} not found", display_entity(&entity)))
            }
            CoreError::AlreadyExists { entity } => {
                ApiError::bad_request(format!("{} already exists", display_entity(&entity)))
            }
            CoreError::AuthenticationFailed { .. } => ApiError::unauthorized(),
            CoreError::AuthorizationDenied { .. } => ApiError::forbidden(),
            CoreError::Validation { message } | CoreError::BusinessRule { message } => {
                ApiError::bad_request(message)
            }
            // Internal failures are logged in full and reduced to a
            // generic message. No detail leaks to the client.
            CoreError::Inconsistent { .. }
            | CoreError::Database(_)
            | CoreError::Crypto(_)
            | CoreError::Internal(_) => {
                error!(error = %err, "Request failed");
                ApiError::internal()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
