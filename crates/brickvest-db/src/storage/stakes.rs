//! SurrealDB implementation of [`StakeStore`].

use brickvest_core::error::{CoreError, CoreResult};
use brickvest_core::models::stake::{NewStake, Stake, StakeStatus, StakeWithProperty};
use brickvest_core::storage::{PropertyStore, StakeStore};
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{SurrealStorage, parse_uuid, to_decimal, to_f64};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct StakeRow {
    user_id: String,
    property_id: String,
    investment_amount: f64,
    shares: f64,
    status: String,
    date_invested: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct StakeRowWithId {
    record_id: String,
    user_id: String,
    property_id: String,
    investment_amount: f64,
    shares: f64,
    status: String,
    date_invested: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<StakeStatus, DbError> {
    match s {
        "active" => Ok(StakeStatus::Active),
        other => Err(DbError::Corrupt(format!("unknown stake status: {other}"))),
    }
}

impl StakeRow {
    fn into_stake(self, id: Uuid) -> Result<Stake, DbError> {
        Ok(Stake {
            id,
            user_id: parse_uuid(&self.user_id, "stake user")?,
            property_id: parse_uuid(&self.property_id, "stake property")?,
            investment_amount: to_decimal(self.investment_amount, "investment amount")?,
            shares: to_decimal(self.shares, "share count")?,
            status: parse_status(&self.status)?,
            date_invested: self.date_invested,
        })
    }
}

impl StakeRowWithId {
    pub(crate) fn try_into_stake(self) -> Result<Stake, DbError> {
        let id = parse_uuid(&self.record_id, "stake")?;
        Ok(Stake {
            id,
            user_id: parse_uuid(&self.user_id, "stake user")?,
            property_id: parse_uuid(&self.property_id, "stake property")?,
            investment_amount: to_decimal(self.investment_amount, "investment amount")?,
            shares: to_decimal(self.shares, "share count")?,
            status: parse_status(&self.status)?,
            date_invested: self.date_invested,
        })
    }
}

impl<C: Connection> StakeStore for SurrealStorage<C> {
    async fn get_user_stakes(&self, user_id: Uuid) -> CoreResult<Vec<StakeWithProperty>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM stake \
                 WHERE user_id = $user_id \
                 ORDER BY date_invested ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StakeRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut portfolio = Vec::with_capacity(rows.len());
        for row in rows {
            let stake = row.try_into_stake()?;
            // A stake pointing at a missing property is corrupted state.
            let property = match self.get_property(stake.property_id).await {
                Ok(property) => property,
                Err(CoreError::NotFound { .. }) => {
                    return Err(CoreError::Inconsistent {
                        message: format!(
                            "stake {} references missing property {}",
                            stake.id, stake.property_id,
                        ),
                    });
                }
                Err(e) => return Err(e),
            };
            portfolio.push(StakeWithProperty { stake, property });
        }
        Ok(portfolio)
    }

    async fn add_stake(&self, input: NewStake) -> CoreResult<Stake> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db()
            .query(
                "CREATE type::record('stake', $id) SET \
                 user_id = $user_id, \
                 property_id = $property_id, \
                 investment_amount = $investment_amount, \
                 shares = $shares, \
                 status = 'active'",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("investment_amount", to_f64(input.investment_amount)))
            .bind(("shares", to_f64(input.shares)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<StakeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "stake".into(),
            id: id_str,
        })?;

        Ok(row.into_stake(id)?)
    }
}
