//! Wallet transaction domain model.
//!
//! The transaction log is the audit trail for balance mutations, not
//! the source of truth: the balance itself lives denormalized on
//! [`crate::models::user::User`]. Every balance mutation is paired
//! with exactly one transaction recording it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Investment,
    Return,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Investment => "investment",
            TransactionKind::Return => "return",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    MobileMoney,
    Bank,
    #[default]
    Standard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile-money",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Signed: positive = credit, negative = debit.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    /// Display label: bank name, mobile provider, or card brand.
    pub organization: String,
    /// Masked display string: last 4 digits or a phone number.
    pub account: String,
    pub description: String,
    /// Set for investment-type transactions.
    pub related_property_id: Option<Uuid>,
    /// Server-assigned, immutable.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWalletTransaction {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    /// Defaults to [`PaymentMethod::Standard`] when omitted.
    pub method: Option<PaymentMethod>,
    /// Defaults to a placeholder label when omitted.
    pub organization: Option<String>,
    /// Defaults to a placeholder when omitted.
    pub account: Option<String>,
    pub description: String,
    pub related_property_id: Option<Uuid>,
}

/// Presentation metadata attached to a deposit or withdrawal entry:
/// how the money notionally moved, for the transaction history.
#[derive(Debug, Clone)]
pub struct WalletEntryMeta {
    pub method: PaymentMethod,
    pub organization: Option<String>,
    pub account: Option<String>,
    pub description: String,
}

/// Placeholder organization label for entries without one.
pub const DEFAULT_ORGANIZATION: &str = "BrickVest";
/// Placeholder account display for entries without one.
pub const DEFAULT_ACCOUNT: &str = "wallet";
