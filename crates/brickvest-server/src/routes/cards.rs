//! Payment card management. Responses never carry the raw card
//! number, only the masked display form.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use brickvest_core::models::payment_card::{NewPaymentCard, PaymentCard};
use brickvest_core::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::properties::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/cards", get(list_cards::<S>).post(add_card::<S>))
        .route("/api/cards/:id", axum::routing::delete(delete_card::<S>))
        .route("/api/cards/:id/default", post(set_default::<S>))
}

/// Outbound card shape: `card_number` is always the masked form.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry_date: String,
    pub card_type: String,
    pub is_default: bool,
    pub last_four_digits: String,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentCard> for CardResponse {
    fn from(card: PaymentCard) -> Self {
        Self {
            id: card.id,
            card_number: card.masked_number(),
            cardholder_name: card.cardholder_name,
            expiry_date: card.expiry_date,
            card_type: card.card_type,
            is_default: card.is_default,
            last_four_digits: card.last_four_digits,
            created_at: card.created_at,
        }
    }
}

async fn list_cards<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<CardResponse>>> {
    let cards = state.storage.get_payment_cards(current.user.id).await?;
    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
struct AddCardBody {
    card_number: String,
    cardholder_name: String,
    expiry_date: String,
    card_type: String,
}

async fn add_card<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Json(body): Json<AddCardBody>,
) -> ApiResult<(StatusCode, Json<CardResponse>)> {
    if body.card_number.chars().count() < 4 {
        return Err(ApiError::bad_request("Invalid card number"));
    }

    let card = state
        .storage
        .add_payment_card(NewPaymentCard {
            user_id: current.user.id,
            card_number: body.card_number,
            cardholder_name: body.cardholder_name,
            expiry_date: body.expiry_date,
            card_type: body.card_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

async fn delete_card<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id, "Invalid card ID")?;
    state
        .storage
        .delete_payment_card(id, current.user.id)
        .await?;
    Ok(Json(json!({ "message": "Card deleted" })))
}

async fn set_default<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<CardResponse>> {
    let id = parse_id(&id, "Invalid card ID")?;
    let card = state
        .storage
        .set_default_payment_card(id, current.user.id)
        .await?;
    Ok(Json(card.into()))
}
