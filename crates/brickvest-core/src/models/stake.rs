//! Investment stake (user ↔ property) domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::property::Property;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StakeStatus {
    Active,
}

/// One user's investment in one property. Created only by the invest
/// operation; never deleted (exit/redemption is not modeled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub investment_amount: Decimal,
    /// 1:1 nominal ratio; shares always equal the invested amount.
    pub shares: Decimal,
    pub status: StakeStatus,
    pub date_invested: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStake {
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub investment_amount: Decimal,
    pub shares: Decimal,
}

/// Portfolio row: a stake joined to the property it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeWithProperty {
    #[serde(flatten)]
    pub stake: Stake,
    pub property: Property,
}
