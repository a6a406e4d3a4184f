//! SurrealDB implementation of [`PaymentCardStore`].

use brickvest_core::error::CoreResult;
use brickvest_core::models::payment_card::{NewPaymentCard, PaymentCard, last_four};
use brickvest_core::storage::PaymentCardStore;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{SurrealStorage, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CardRow {
    user_id: String,
    card_number: String,
    cardholder_name: String,
    expiry_date: String,
    card_type: String,
    is_default: bool,
    last_four_digits: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CardRowWithId {
    record_id: String,
    user_id: String,
    card_number: String,
    cardholder_name: String,
    expiry_date: String,
    card_type: String,
    is_default: bool,
    last_four_digits: String,
    created_at: DateTime<Utc>,
}

impl CardRow {
    fn into_card(self, id: Uuid) -> Result<PaymentCard, DbError> {
        Ok(PaymentCard {
            id,
            user_id: parse_uuid(&self.user_id, "card user")?,
            card_number: self.card_number,
            cardholder_name: self.cardholder_name,
            expiry_date: self.expiry_date,
            card_type: self.card_type,
            is_default: self.is_default,
            last_four_digits: self.last_four_digits,
            created_at: self.created_at,
        })
    }
}

impl CardRowWithId {
    fn try_into_card(self) -> Result<PaymentCard, DbError> {
        let id = parse_uuid(&self.record_id, "card")?;
        Ok(PaymentCard {
            id,
            user_id: parse_uuid(&self.user_id, "card user")?,
            card_number: self.card_number,
            cardholder_name: self.cardholder_name,
            expiry_date: self.expiry_date,
            card_type: self.card_type,
            is_default: self.is_default,
            last_four_digits: self.last_four_digits,
            created_at: self.created_at,
        })
    }
}

impl<C: Connection> PaymentCardStore for SurrealStorage<C> {
    async fn add_payment_card(&self, input: NewPaymentCard) -> CoreResult<PaymentCard> {
        let existing = self.get_payment_cards(input.user_id).await?;
        let is_default = existing.is_empty();

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let last_four_digits = last_four(&input.card_number);

        let result = self
            .db()
            .query(
                "CREATE type::record('payment_card', $id) SET \
                 user_id = $user_id, \
                 card_number = $card_number, \
                 cardholder_name = $cardholder_name, \
                 expiry_date = $expiry_date, \
                 card_type = $card_type, \
                 is_default = $is_default, \
                 last_four_digits = $last_four_digits",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("card_number", input.card_number))
            .bind(("cardholder_name", input.cardholder_name))
            .bind(("expiry_date", input.expiry_date))
            .bind(("card_type", input.card_type))
            .bind(("is_default", is_default))
            .bind(("last_four_digits", last_four_digits))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<CardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payment_card".into(),
            id: id_str,
        })?;

        Ok(row.into_card(id)?)
    }

    async fn get_payment_cards(&self, user_id: Uuid) -> CoreResult<Vec<PaymentCard>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM payment_card \
                 WHERE user_id = $user_id \
                 ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CardRowWithId> = result.take(0).map_err(DbError::from)?;
        let cards = rows
            .into_iter()
            .map(|row| row.try_into_card())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(cards)
    }

    async fn get_payment_card(&self, id: Uuid) -> CoreResult<PaymentCard> {
        let id_str = id.to_string();

        let mut result = self
            .db()
            .query("SELECT * FROM type::record('payment_card', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payment_card".into(),
            id: id_str,
        })?;

        Ok(row.into_card(id)?)
    }

    async fn delete_payment_card(&self, id: Uuid, user_id: Uuid) -> CoreResult<()> {
        let card = self.get_payment_card(id).await?;
        if card.user_id != user_id {
            return Err(DbError::NotFound {
                entity: "payment_card".into(),
                id: id.to_string(),
            }
            .into());
        }

        self.db()
            .query("DELETE type::record('payment_card', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        // Deleting the default promotes the first remaining card in
        // enumeration order.
        if card.is_default {
            let remaining = self.get_payment_cards(user_id).await?;
            if let Some(next) = remaining.first() {
                self.db()
                    .query(
                        "UPDATE type::record('payment_card', $id) \
                         SET is_default = true",
                    )
                    .bind(("id", next.id.to_string()))
                    .await
                    .map_err(DbError::from)?
                    .check()
                    .map_err(DbError::from)?;
            }
        }

        Ok(())
    }

    async fn set_default_payment_card(&self, id: Uuid, user_id: Uuid) -> CoreResult<PaymentCard> {
        let card = self.get_payment_card(id).await?;
        if card.user_id != user_id {
            return Err(DbError::NotFound {
                entity: "payment_card".into(),
                id: id.to_string(),
            }
            .into());
        }

        self.db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE payment_card SET is_default = false \
                     WHERE user_id = $user_id; \
                 UPDATE type::record('payment_card', $id) \
                     SET is_default = true; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        self.get_payment_card(id).await
    }
}
