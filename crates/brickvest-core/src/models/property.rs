//! Property domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Investability lifecycle state. Not a display label: `Available` is
/// the gate for the invest operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyFilter {
    Available,
    Funded,
    Exited,
}

impl PropertyFilter {
    /// Parse a lifecycle bucket from a query-string value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(PropertyFilter::Available),
            "Funded" => Some(PropertyFilter::Funded),
            "Exited" => Some(PropertyFilter::Exited),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyFilter::Available => "Available",
            PropertyFilter::Funded => "Funded",
            PropertyFilter::Exited => "Exited",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub city: String,
    pub bedrooms: u32,
    /// Display price string, e.g. `AED 1,823,000`.
    pub price: String,
    pub image_url: String,
    /// Investment strategy label: `Balanced`, `Capital Growth`, ...
    pub property_type: String,
    /// 0–100.
    pub funding_percentage: u8,
    pub yearly_return: f64,
    pub total_return: f64,
    pub projected_yield: f64,
    /// External display code shown to investors.
    pub property_code: String,
    /// Occupancy status label: `Ready`, `Rented`, ...
    pub status: String,
    pub filter: PropertyFilter,
    pub floor_area: Option<String>,
    pub year_built: Option<u32>,
    pub parking_spaces: Option<u32>,
    pub monthly_rent: Option<String>,
    pub service_charges: Option<String>,
    pub maintenance_fees: Option<String>,
    pub occupancy_rate: Option<f64>,
    /// Owning administrator, when created through the admin surface.
    pub admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub location: String,
    pub city: String,
    pub bedrooms: u32,
    pub price: String,
    pub image_url: String,
    pub property_type: String,
    pub funding_percentage: u8,
    pub yearly_return: f64,
    pub total_return: f64,
    pub projected_yield: f64,
    pub property_code: String,
    pub status: String,
    pub filter: PropertyFilter,
    #[serde(default)]
    pub floor_area: Option<String>,
    #[serde(default)]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub parking_spaces: Option<u32>,
    #[serde(default)]
    pub monthly_rent: Option<String>,
    #[serde(default)]
    pub service_charges: Option<String>,
    #[serde(default)]
    pub maintenance_fees: Option<String>,
    #[serde(default)]
    pub occupancy_rate: Option<f64>,
    #[serde(default)]
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdateProperty {
    pub title: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub bedrooms: Option<u32>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub property_type: Option<String>,
    pub funding_percentage: Option<u8>,
    pub yearly_return: Option<f64>,
    pub total_return: Option<f64>,
    pub projected_yield: Option<f64>,
    pub status: Option<String>,
    pub filter: Option<PropertyFilter>,
    pub floor_area: Option<String>,
    pub year_built: Option<u32>,
    pub parking_spaces: Option<u32>,
    pub monthly_rent: Option<String>,
    pub service_charges: Option<String>,
    pub maintenance_fees: Option<String>,
    pub occupancy_rate: Option<f64>,
}
