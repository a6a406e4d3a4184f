//! Property media: gallery images and attached documents.
//! Both are append/delete only; no update path exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPropertyImage {
    pub property_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDocument {
    pub id: Uuid,
    pub property_id: Uuid,
    pub title: String,
    pub document_url: String,
    /// e.g. `deed`, `valuation`, `prospectus`.
    pub document_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPropertyDocument {
    pub property_id: Uuid,
    pub title: String,
    pub document_url: String,
    pub document_type: String,
}
