//! Wallet balance, deposits, withdrawals, and transaction history.

use axum::routing::{get, post};
use axum::{Router, extract::State};
use brickvest_core::models::payment_card::last_four;
use brickvest_core::models::wallet::{PaymentMethod, WalletEntryMeta, WalletTransaction};
use brickvest_core::storage::Storage;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router<S: Storage>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/wallet", get(balance::<S>))
        .route("/api/wallet/deposit", post(deposit::<S>))
        .route("/api/wallet/withdraw", post(withdraw::<S>))
        .route("/api/wallet/transactions", get(transactions::<S>))
}

async fn balance<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let balance = state.storage.get_wallet_balance(current.user.id).await?;
    Ok(Json(json!({ "balance": balance })))
}

// Amounts arrive as JSON numbers; aliases accept the camelCase keys
// clients send. A `cvv` key, if present, is ignored.
#[derive(Debug, Deserialize)]
struct DepositBody {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(default)]
    method: Option<PaymentMethod>,
    /// Required for card deposits.
    #[serde(default, alias = "cardId")]
    card_id: Option<Uuid>,
    /// Required for mobile-money deposits.
    #[serde(default)]
    provider: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    phone_number: Option<String>,
}

async fn deposit<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Json(body): Json<DepositBody>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Invalid amount"));
    }

    let method = body.method.unwrap_or_default();
    let meta = match method {
        PaymentMethod::Card => {
            let card_id = body
                .card_id
                .ok_or_else(|| ApiError::bad_request("Card ID is required"))?;
            let card = state.storage.get_payment_card(card_id).await?;
            if card.user_id != current.user.id {
                return Err(ApiError::not_found("Card not found"));
            }
            WalletEntryMeta {
                method: PaymentMethod::Card,
                organization: Some(card.card_type.clone()),
                account: Some(card.masked_number()),
                description: format!(
                    "Deposit via {} card ending in {}",
                    card.card_type, card.last_four_digits,
                ),
            }
        }
        PaymentMethod::MobileMoney => {
            let provider = body
                .provider
                .ok_or_else(|| ApiError::bad_request("Provider is required"))?;
            let phone_number = body
                .phone_number
                .ok_or_else(|| ApiError::bad_request("Phone number is required"))?;
            WalletEntryMeta {
                method: PaymentMethod::MobileMoney,
                organization: Some(provider.clone()),
                account: Some(phone_number),
                description: format!("Deposit via {provider} mobile money"),
            }
        }
        _ => WalletEntryMeta {
            method: PaymentMethod::Standard,
            organization: None,
            account: None,
            description: "Funds deposited to wallet".into(),
        },
    };

    let balance = state
        .storage
        .record_deposit(current.user.id, body.amount, meta)
        .await?;

    Ok(Json(json!({
        "message": "Deposit successful",
        "balance": balance,
    })))
}

#[derive(Debug, Deserialize)]
struct WithdrawBody {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(default)]
    method: Option<PaymentMethod>,
    /// Bank withdrawals only. Recorded as descriptive metadata, no
    /// settlement happens.
    #[serde(default, alias = "bankName")]
    bank_name: Option<String>,
    #[serde(default, alias = "accountNumber")]
    account_number: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default, alias = "swiftCode")]
    swift_code: Option<String>,
}

async fn withdraw<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    Json(body): Json<WithdrawBody>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Invalid amount"));
    }

    let method = body.method.unwrap_or_default();
    let meta = match method {
        PaymentMethod::Bank => {
            let bank_name = body
                .bank_name
                .ok_or_else(|| ApiError::bad_request("Bank name is required"))?;
            let account_number = body
                .account_number
                .ok_or_else(|| ApiError::bad_request("Account number is required"))?;

            let mut description = format!("Withdrawal to {bank_name}");
            if let Some(branch) = &body.branch {
                description.push_str(&format!(", branch {branch}"));
            }
            if let Some(swift) = &body.swift_code {
                description.push_str(&format!(", SWIFT {swift}"));
            }

            WalletEntryMeta {
                method: PaymentMethod::Bank,
                organization: Some(bank_name),
                account: Some(format!("****{}", last_four(&account_number))),
                description,
            }
        }
        _ => WalletEntryMeta {
            method: PaymentMethod::Standard,
            organization: None,
            account: None,
            description: "Funds withdrawn from wallet".into(),
        },
    };

    let balance = state
        .storage
        .record_withdrawal(current.user.id, body.amount, meta)
        .await?;

    Ok(Json(json!({
        "message": "Withdrawal successful",
        "balance": balance,
    })))
}

async fn transactions<S: Storage>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<WalletTransaction>>> {
    let transactions = state
        .storage
        .get_wallet_transactions(current.user.id)
        .await?;
    Ok(Json(transactions))
}
