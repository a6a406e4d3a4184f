//! SurrealDB implementation of the BrickVest storage contract.
//!
//! Row structs mirror the table shapes: UUIDs are stored as strings
//! and parsed back, money amounts are stored as numbers and converted
//! to [`Decimal`] at the row boundary.

mod audit;
mod cards;
mod media;
mod properties;
mod sessions;
mod stakes;
mod users;
mod wallet;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// SurrealDB-backed storage. Cheap to clone; the underlying client
/// is shared.
#[derive(Clone)]
pub struct SurrealStorage<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStorage<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub(crate) fn db(&self) -> &Surreal<C> {
        &self.db
    }
}

pub(crate) fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

pub(crate) fn to_decimal(value: f64, what: &str) -> Result<Decimal, DbError> {
    Decimal::from_f64(value)
        .ok_or_else(|| DbError::Corrupt(format!("non-finite {what}: {value}")))
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
