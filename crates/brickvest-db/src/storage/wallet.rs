//! SurrealDB implementation of [`WalletStore`].
//!
//! The deposit/withdrawal/investment composites run as single
//! SurrealDB transactions so the balance mutation and its paired
//! ledger entry commit or fail together. Shortfalls are raised inside
//! the transaction with THROW and surfaced as a business-rule error.

use brickvest_core::error::{CoreError, CoreResult};
use brickvest_core::models::stake::Stake;
use brickvest_core::models::user::User;
use brickvest_core::models::wallet::{
    DEFAULT_ACCOUNT, DEFAULT_ORGANIZATION, NewWalletTransaction, PaymentMethod, TransactionKind,
    WalletEntryMeta, WalletTransaction,
};
use brickvest_core::storage::{UserStore, WalletStore};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::stakes::StakeRowWithId;
use super::{SurrealStorage, parse_uuid, to_decimal, to_f64};
use crate::error::DbError;

/// Marker raised by THROW when a conditional debit finds the balance
/// short. Detected by substring match on the surfaced error.
const SHORTFALL_MARKER: &str = "wallet-balance-shortfall";

#[derive(Debug, SurrealValue)]
struct TransactionRow {
    user_id: String,
    amount: f64,
    kind: String,
    method: String,
    organization: String,
    account: String,
    description: String,
    related_property_id: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TransactionRowWithId {
    record_id: String,
    user_id: String,
    amount: f64,
    kind: String,
    method: String,
    organization: String,
    account: String,
    description: String,
    related_property_id: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BalanceRow {
    wallet_balance: f64,
}

fn parse_kind(s: &str) -> Result<TransactionKind, DbError> {
    match s {
        "deposit" => Ok(TransactionKind::Deposit),
        "withdrawal" => Ok(TransactionKind::Withdrawal),
        "investment" => Ok(TransactionKind::Investment),
        "return" => Ok(TransactionKind::Return),
        other => Err(DbError::Corrupt(format!(
            "unknown transaction kind: {other}"
        ))),
    }
}

fn parse_method(s: &str) -> Result<PaymentMethod, DbError> {
    match s {
        "card" => Ok(PaymentMethod::Card),
        "mobile-money" => Ok(PaymentMethod::MobileMoney),
        "bank" => Ok(PaymentMethod::Bank),
        "standard" => Ok(PaymentMethod::Standard),
        other => Err(DbError::Corrupt(format!("unknown payment method: {other}"))),
    }
}

impl TransactionRow {
    fn into_transaction(self, id: Uuid) -> Result<WalletTransaction, DbError> {
        Ok(WalletTransaction {
            id,
            user_id: parse_uuid(&self.user_id, "transaction user")?,
            amount: to_decimal(self.amount, "transaction amount")?,
            kind: parse_kind(&self.kind)?,
            method: parse_method(&self.method)?,
            organization: self.organization,
            account: self.account,
            description: self.description,
            related_property_id: self
                .related_property_id
                .as_deref()
                .map(|s| parse_uuid(s, "transaction property"))
                .transpose()?,
            created_at: self.created_at,
        })
    }
}

impl TransactionRowWithId {
    fn try_into_transaction(self) -> Result<WalletTransaction, DbError> {
        let id = parse_uuid(&self.record_id, "transaction")?;
        let row = TransactionRow {
            user_id: self.user_id,
            amount: self.amount,
            kind: self.kind,
            method: self.method,
            organization: self.organization,
            account: self.account,
            description: self.description,
            related_property_id: self.related_property_id,
            created_at: self.created_at,
        };
        row.into_transaction(id)
    }
}

/// Distinguish a THROWn shortfall from a genuine database failure.
fn map_composite_error(err: surrealdb::Error, shortfall_message: &str) -> CoreError {
    if err.to_string().contains(SHORTFALL_MARKER) {
        CoreError::business_rule(shortfall_message)
    } else {
        DbError::from(err).into()
    }
}

impl<C: Connection> WalletStore for SurrealStorage<C> {
    async fn get_wallet_balance(&self, user_id: Uuid) -> CoreResult<Decimal> {
        let user = self.get_user(user_id).await?;
        Ok(user.wallet_balance)
    }

    async fn update_wallet_balance(&self, user_id: Uuid, delta: Decimal) -> CoreResult<User> {
        let id_str = user_id.to_string();

        let mut result = self
            .db()
            .query(
                "UPDATE type::record('user', $id) \
                 SET wallet_balance += $delta \
                 RETURN wallet_balance",
            )
            .bind(("id", id_str.clone()))
            .bind(("delta", to_f64(delta)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BalanceRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        self.get_user(user_id).await
    }

    async fn add_wallet_transaction(
        &self,
        input: NewWalletTransaction,
    ) -> CoreResult<WalletTransaction> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let method = input.method.unwrap_or_default();
        let organization = input
            .organization
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());
        let account = input
            .account
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        let result = self
            .db()
            .query(
                "CREATE type::record('wallet_transaction', $id) SET \
                 user_id = $user_id, \
                 amount = $amount, \
                 kind = $kind, \
                 method = $method, \
                 organization = $organization, \
                 account = $account, \
                 description = $description, \
                 related_property_id = $related_property_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("amount", to_f64(input.amount)))
            .bind(("kind", input.kind.as_str().to_string()))
            .bind(("method", method.as_str().to_string()))
            .bind(("organization", organization))
            .bind(("account", account))
            .bind(("description", input.description))
            .bind((
                "related_property_id",
                input.related_property_id.map(|id| id.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "wallet_transaction".into(),
            id: id_str,
        })?;

        Ok(row.into_transaction(id)?)
    }

    async fn get_wallet_transactions(&self, user_id: Uuid) -> CoreResult<Vec<WalletTransaction>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM wallet_transaction \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRowWithId> = result.take(0).map_err(DbError::from)?;
        let transactions = rows
            .into_iter()
            .map(|row| row.try_into_transaction())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(transactions)
    }

    async fn get_all_transactions(&self) -> CoreResult<Vec<WalletTransaction>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM wallet_transaction \
                 ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRowWithId> = result.take(0).map_err(DbError::from)?;
        let transactions = rows
            .into_iter()
            .map(|row| row.try_into_transaction())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(transactions)
    }

    async fn record_deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> CoreResult<Decimal> {
        // Existence first so an empty UPDATE inside the transaction
        // can only mean one thing.
        self.get_user(user_id).await?;

        let txn_id = Uuid::new_v4().to_string();
        let organization = meta
            .organization
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());
        let account = meta.account.unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        self.db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE type::record('user', $user_id) \
                     SET wallet_balance += $amount; \
                 CREATE type::record('wallet_transaction', $txn_id) SET \
                     user_id = $user_id_str, \
                     amount = $amount, \
                     kind = 'deposit', \
                     method = $method, \
                     organization = $organization, \
                     account = $account, \
                     description = $description, \
                     related_property_id = NONE; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("user_id_str", user_id.to_string()))
            .bind(("txn_id", txn_id))
            .bind(("amount", to_f64(amount)))
            .bind(("method", meta.method.as_str().to_string()))
            .bind(("organization", organization))
            .bind(("account", account))
            .bind(("description", meta.description))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        self.get_wallet_balance(user_id).await
    }

    async fn record_withdrawal(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> CoreResult<Decimal> {
        self.get_user(user_id).await?;

        let txn_id = Uuid::new_v4().to_string();
        let organization = meta
            .organization
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());
        let account = meta.account.unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        let result = self
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $updated = UPDATE type::record('user', $user_id) \
                     SET wallet_balance -= $amount \
                     WHERE wallet_balance >= $amount; \
                 IF array::len($updated) == 0 \
                     { THROW 'wallet-balance-shortfall' }; \
                 CREATE type::record('wallet_transaction', $txn_id) SET \
                     user_id = $user_id_str, \
                     amount = $debit, \
                     kind = 'withdrawal', \
                     method = $method, \
                     organization = $organization, \
                     account = $account, \
                     description = $description, \
                     related_property_id = NONE; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("user_id_str", user_id.to_string()))
            .bind(("txn_id", txn_id))
            .bind(("amount", to_f64(amount)))
            .bind(("debit", to_f64(-amount)))
            .bind(("method", meta.method.as_str().to_string()))
            .bind(("organization", organization))
            .bind(("account", account))
            .bind(("description", meta.description))
            .await
            .map_err(|e| map_composite_error(e, "Insufficient funds"))?;

        result
            .check()
            .map_err(|e| map_composite_error(e, "Insufficient funds"))?;

        self.get_wallet_balance(user_id).await
    }

    async fn record_investment(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        amount: Decimal,
        description: String,
    ) -> CoreResult<Stake> {
        self.get_user(user_id).await?;

        let stake_id = Uuid::new_v4();
        let txn_id = Uuid::new_v4().to_string();

        let result = self
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $updated = UPDATE type::record('user', $user_id) \
                     SET wallet_balance -= $amount \
                     WHERE wallet_balance >= $amount; \
                 IF array::len($updated) == 0 \
                     { THROW 'wallet-balance-shortfall' }; \
                 CREATE type::record('stake', $stake_id) SET \
                     user_id = $user_id_str, \
                     property_id = $property_id, \
                     investment_amount = $amount, \
                     shares = $amount, \
                     status = 'active'; \
                 CREATE type::record('wallet_transaction', $txn_id) SET \
                     user_id = $user_id_str, \
                     amount = $debit, \
                     kind = 'investment', \
                     method = 'standard', \
                     organization = $organization, \
                     account = $account, \
                     description = $description, \
                     related_property_id = $property_id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("user_id_str", user_id.to_string()))
            .bind(("property_id", property_id.to_string()))
            .bind(("stake_id", stake_id.to_string()))
            .bind(("txn_id", txn_id))
            .bind(("amount", to_f64(amount)))
            .bind(("debit", to_f64(-amount)))
            .bind(("organization", DEFAULT_ORGANIZATION.to_string()))
            .bind(("account", DEFAULT_ACCOUNT.to_string()))
            .bind(("description", description))
            .await
            .map_err(|e| map_composite_error(e, "Insufficient wallet balance"))?;

        result
            .check()
            .map_err(|e| map_composite_error(e, "Insufficient wallet balance"))?;

        // Read the committed stake back outside the transaction to
        // avoid depending on statement result indices.
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('stake', $id)",
            )
            .bind(("id", stake_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StakeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "stake".into(),
            id: stake_id.to_string(),
        })?;

        Ok(row.try_into_stake()?)
    }
}
