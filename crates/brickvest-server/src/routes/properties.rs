//! Property browsing, creation, and the invest operation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use brickvest_core::models::media::{PropertyDocument, PropertyImage};
use brickvest_core::models::property::{NewProperty, Property, PropertyFilter};
use brickvest_core::models::stake::Stake;
use brickvest_core::storage::Storage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/properties",
            get(list_properties::<S>).post(create_property::<S>),
        )
        .route("/api/properties/:id", get(get_property::<S>))
        .route("/api/properties/:id/invest", post(invest::<S>))
        .route("/api/properties/:id/images", get(get_images::<S>))
        .route("/api/properties/:id/documents", get(get_documents::<S>))
}

pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(message))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    filter: Option<String>,
}

async fn list_properties<S: Storage>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Property>>> {
    let filter = match query.filter.as_deref() {
        None => PropertyFilter::Available,
        Some(raw) => {
            PropertyFilter::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid filter"))?
        }
    };
    let properties = state.storage.get_properties(filter).await?;
    Ok(Json(properties))
}

async fn get_property<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Property>> {
    let id = parse_id(&id, "Invalid property ID")?;
    let property = state.storage.get_property(id).await?;
    Ok(Json(property))
}

async fn create_property<S: Storage>(
    State(state): State<AppState<S>>,
    _current: CurrentUser,
    Json(input): Json<NewProperty>,
) -> ApiResult<(StatusCode, Json<Property>)> {
    let property = state.storage.create_property(input).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

async fn get_images<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PropertyImage>>> {
    let id = parse_id(&id, "Invalid property ID")?;
    state.storage.get_property(id).await?;
    let images = state.storage.get_property_images(id).await?;
    Ok(Json(images))
}

async fn get_documents<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PropertyDocument>>> {
    let id = parse_id(&id, "Invalid property ID")?;
    state.storage.get_property(id).await?;
    let documents = state.storage.get_property_documents(id).await?;
    Ok(Json(documents))
}

#[derive(Debug, Deserialize)]
struct InvestBody {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

#[derive(Debug, Serialize)]
struct InvestResponse {
    message: String,
    investment: Stake,
}

async fn invest<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<InvestBody>,
) -> ApiResult<(StatusCode, Json<InvestResponse>)> {
    let property_id = parse_id(&id, "Invalid property ID")?;

    if body.amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Invalid investment amount"));
    }

    let property = state.storage.get_property(property_id).await?;
    if property.filter != PropertyFilter::Available {
        return Err(ApiError::bad_request(
            "Property is not available for investment",
        ));
    }

    // Debit, stake, and ledger entry commit together.
    let stake = state
        .storage
        .record_investment(
            current.user.id,
            property.id,
            body.amount,
            format!("Investment in property: {}", property.title),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvestResponse {
            message: "Investment successful".into(),
            investment: stake,
        }),
    ))
}
