//! Admin surface: unrestricted listings, user/property mutation, and
//! property media management. Every mutation appends an audit entry.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use brickvest_core::models::audit::{AuditLogEntry, NewAuditLogEntry};
use brickvest_core::models::media::{
    NewPropertyDocument, NewPropertyImage, PropertyDocument, PropertyImage,
};
use brickvest_core::models::property::{AdminUpdateProperty, Property};
use brickvest_core::models::user::{AdminUpdateUser, User};
use brickvest_core::models::wallet::WalletTransaction;
use brickvest_core::storage::Storage;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::auth::client_ip;
use super::properties::parse_id;
use crate::error::ApiResult;
use crate::extract::{AdminUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/admin/users", get(list_users::<S>))
        .route("/api/admin/users/:id", patch(update_user::<S>))
        .route("/api/admin/properties", get(list_properties::<S>))
        .route("/api/admin/properties/:id", patch(update_property::<S>))
        .route(
            "/api/admin/properties/:id/images",
            post(add_image::<S>),
        )
        .route(
            "/api/admin/properties/:id/documents",
            post(add_document::<S>),
        )
        .route("/api/admin/images/:id", delete(delete_image::<S>))
        .route("/api/admin/documents/:id", delete(delete_document::<S>))
        .route("/api/admin/transactions", get(list_transactions::<S>))
        .route("/api/admin/audit-logs", get(list_audit_logs::<S>))
}

async fn audit<S: Storage>(
    state: &AppState<S>,
    admin_id: Uuid,
    action: &str,
    entity_type: &str,
    entity_id: Option<Uuid>,
    details: serde_json::Value,
    headers: &HeaderMap,
) -> ApiResult<()> {
    state
        .storage
        .add_audit_log(NewAuditLogEntry {
            admin_id,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id,
            details,
            ip_address: client_ip(headers),
        })
        .await?;
    Ok(())
}

async fn list_users<S: Storage>(
    State(state): State<AppState<S>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.storage.get_all_users().await?))
}

async fn update_user<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<AdminUpdateUser>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "Invalid user ID")?;
    let details = serde_json::to_value(&input).unwrap_or_else(|_| json!({}));

    let user = state.storage.update_user_by_admin(id, input).await?;
    audit(
        &state,
        admin.user.id,
        "update_user",
        "user",
        Some(id),
        details,
        &headers,
    )
    .await?;

    Ok(Json(user))
}

async fn list_properties<S: Storage>(
    State(state): State<AppState<S>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Property>>> {
    Ok(Json(state.storage.get_all_properties().await?))
}

async fn update_property<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<AdminUpdateProperty>,
) -> ApiResult<Json<Property>> {
    let id = parse_id(&id, "Invalid property ID")?;
    let details = serde_json::to_value(&input).unwrap_or_else(|_| json!({}));

    let property = state.storage.update_property_by_admin(id, input).await?;
    audit(
        &state,
        admin.user.id,
        "update_property",
        "property",
        Some(id),
        details,
        &headers,
    )
    .await?;

    Ok(Json(property))
}

#[derive(Debug, Deserialize)]
struct AddImageBody {
    image_url: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    display_order: i32,
}

async fn add_image<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<AddImageBody>,
) -> ApiResult<(StatusCode, Json<PropertyImage>)> {
    let property_id = parse_id(&id, "Invalid property ID")?;
    // 404 for images attached to a property that does not exist.
    state.storage.get_property(property_id).await?;

    let image = state
        .storage
        .add_property_image(NewPropertyImage {
            property_id,
            image_url: body.image_url,
            caption: body.caption,
            display_order: body.display_order,
        })
        .await?;

    audit(
        &state,
        admin.user.id,
        "add_property_image",
        "property_image",
        Some(image.id),
        json!({ "property_id": property_id }),
        &headers,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

#[derive(Debug, Deserialize)]
struct AddDocumentBody {
    title: String,
    document_url: String,
    document_type: String,
}

async fn add_document<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<AddDocumentBody>,
) -> ApiResult<(StatusCode, Json<PropertyDocument>)> {
    let property_id = parse_id(&id, "Invalid property ID")?;
    state.storage.get_property(property_id).await?;

    let document = state
        .storage
        .add_property_document(NewPropertyDocument {
            property_id,
            title: body.title,
            document_url: body.document_url,
            document_type: body.document_type,
        })
        .await?;

    audit(
        &state,
        admin.user.id,
        "add_property_document",
        "property_document",
        Some(document.id),
        json!({ "property_id": property_id }),
        &headers,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

async fn delete_image<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id, "Invalid image ID")?;
    state.storage.delete_property_image(id).await?;

    audit(
        &state,
        admin.user.id,
        "delete_property_image",
        "property_image",
        Some(id),
        json!({}),
        &headers,
    )
    .await?;

    Ok(Json(json!({ "message": "Image deleted" })))
}

async fn delete_document<S: Storage>(
    State(state): State<AppState<S>>,
    admin: AdminUser,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id, "Invalid document ID")?;
    state.storage.delete_property_document(id).await?;

    audit(
        &state,
        admin.user.id,
        "delete_property_document",
        "property_document",
        Some(id),
        json!({}),
        &headers,
    )
    .await?;

    Ok(Json(json!({ "message": "Document deleted" })))
}

async fn list_transactions<S: Storage>(
    State(state): State<AppState<S>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<WalletTransaction>>> {
    Ok(Json(state.storage.get_all_transactions().await?))
}

async fn list_audit_logs<S: Storage>(
    State(state): State<AppState<S>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<AuditLogEntry>>> {
    Ok(Json(state.storage.get_audit_logs().await?))
}
