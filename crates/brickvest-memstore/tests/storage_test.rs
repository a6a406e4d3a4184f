//! Behavior tests for the in-memory storage backend, covering the
//! wallet/investment/card invariants both backends must satisfy.

use brickvest_core::error::CoreError;
use brickvest_core::models::payment_card::NewPaymentCard;
use brickvest_core::models::property::PropertyFilter;
use brickvest_core::models::stake::{NewStake, StakeStatus};
use brickvest_core::models::user::NewUser;
use brickvest_core::models::wallet::{PaymentMethod, TransactionKind, WalletEntryMeta};
use brickvest_core::storage::{
    PaymentCardStore, PropertyStore, StakeStore, UserStore, WalletStore,
};
use brickvest_memstore::MemStorage;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password_hash: "$argon2id$stub".into(),
        full_name: None,
        email: None,
        phone_number: None,
        avatar_url: None,
    }
}

fn standard_meta(description: &str) -> WalletEntryMeta {
    WalletEntryMeta {
        method: PaymentMethod::Standard,
        organization: None,
        account: None,
        description: description.into(),
    }
}

/// Helper: user funded through a real deposit, so the ledger and the
/// balance start out consistent.
async fn funded_user(storage: &MemStorage, username: &str, amount: Decimal) -> Uuid {
    let user = storage.create_user(new_user(username)).await.unwrap();
    storage
        .record_deposit(user.id, amount, standard_meta("Funds deposited to wallet"))
        .await
        .unwrap();
    user.id
}

async fn ledger_sum(storage: &MemStorage, user_id: Uuid) -> Decimal {
    storage
        .get_wallet_transactions(user_id)
        .await
        .unwrap()
        .iter()
        .map(|t| t.amount)
        .sum()
}

// -----------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------

#[tokio::test]
async fn new_user_starts_with_zero_balance() {
    let storage = MemStorage::new();
    let user = storage.create_user(new_user("alice")).await.unwrap();
    assert_eq!(user.wallet_balance, Decimal::ZERO);
    assert!(!user.is_verified);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let storage = MemStorage::new();
    storage.create_user(new_user("alice")).await.unwrap();
    let result = storage.create_user(new_user("alice")).await;
    assert!(matches!(result, Err(CoreError::AlreadyExists { .. })));
}

// -----------------------------------------------------------------------
// Seeding
// -----------------------------------------------------------------------

#[tokio::test]
async fn initialize_properties_is_idempotent() {
    let storage = MemStorage::new();
    storage.initialize_properties().await.unwrap();
    let after_first = storage.get_all_properties().await.unwrap().len();

    storage.initialize_properties().await.unwrap();
    let after_second = storage.get_all_properties().await.unwrap().len();

    assert_eq!(after_first, after_second);
    assert!(after_first > 0);
}

#[tokio::test]
async fn properties_are_bucketed_by_filter() {
    let storage = MemStorage::new();
    storage.initialize_properties().await.unwrap();

    let available = storage
        .get_properties(PropertyFilter::Available)
        .await
        .unwrap();
    assert!(available.iter().all(|p| p.filter == PropertyFilter::Available));

    let exited = storage.get_properties(PropertyFilter::Exited).await.unwrap();
    assert!(!exited.is_empty());
}

// -----------------------------------------------------------------------
// Wallet: deposits, withdrawals, ledger consistency
// -----------------------------------------------------------------------

#[tokio::test]
async fn deposit_credits_balance_and_appends_transaction() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(1000)).await;

    let balance = storage.get_wallet_balance(user_id).await.unwrap();
    assert_eq!(balance, dec!(1000));

    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].kind, TransactionKind::Deposit);
    assert_eq!(txns[0].amount, dec!(1000));
}

#[tokio::test]
async fn withdrawal_over_balance_leaves_state_unchanged() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(50_000)).await;

    let result = storage
        .record_withdrawal(user_id, dec!(80_000), standard_meta("Funds withdrawn"))
        .await;
    assert!(matches!(result, Err(CoreError::BusinessRule { .. })));

    assert_eq!(storage.get_wallet_balance(user_id).await.unwrap(), dec!(50_000));
    // No withdrawal transaction was recorded.
    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    assert_eq!(txns.len(), 1);
}

#[tokio::test]
async fn balance_always_equals_ledger_sum() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(100_000)).await;

    storage
        .record_withdrawal(user_id, dec!(20_000), standard_meta("Funds withdrawn"))
        .await
        .unwrap();
    storage
        .record_deposit(user_id, dec!(5_000), standard_meta("Funds deposited"))
        .await
        .unwrap();

    storage.initialize_properties().await.unwrap();
    let property = storage
        .get_properties(PropertyFilter::Available)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    storage
        .record_investment(user_id, property.id, dec!(30_000), "Investment".into())
        .await
        .unwrap();

    let balance = storage.get_wallet_balance(user_id).await.unwrap();
    assert_eq!(balance, dec!(55_000));
    assert_eq!(balance, ledger_sum(&storage, user_id).await);
}

#[tokio::test]
async fn transactions_are_newest_first() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(10)).await;
    for _ in 0..4 {
        storage
            .record_deposit(user_id, dec!(10), standard_meta("Funds deposited"))
            .await
            .unwrap();
    }

    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    assert!(txns.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn omitted_transaction_meta_gets_placeholders() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(10)).await;
    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    assert!(!txns[0].organization.is_empty());
    assert!(!txns[0].account.is_empty());
}

// -----------------------------------------------------------------------
// Investment
// -----------------------------------------------------------------------

#[tokio::test]
async fn invest_debits_balance_and_records_stake_and_transaction() {
    let storage = MemStorage::new();
    storage.initialize_properties().await.unwrap();
    let user_id = funded_user(&storage, "alice", dec!(100_000)).await;
    let property = storage
        .get_properties(PropertyFilter::Available)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let stake = storage
        .record_investment(
            user_id,
            property.id,
            dec!(30_000),
            format!("Investment in property: {}", property.title),
        )
        .await
        .unwrap();

    assert_eq!(stake.shares, dec!(30_000));
    assert_eq!(stake.investment_amount, dec!(30_000));
    assert_eq!(stake.status, StakeStatus::Active);

    assert_eq!(storage.get_wallet_balance(user_id).await.unwrap(), dec!(70_000));

    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    let investment = txns
        .iter()
        .find(|t| t.kind == TransactionKind::Investment)
        .unwrap();
    assert_eq!(investment.amount, dec!(-30_000));
    assert_eq!(investment.related_property_id, Some(property.id));

    let stakes = storage.get_user_stakes(user_id).await.unwrap();
    assert_eq!(stakes.len(), 1);
    assert_eq!(stakes[0].property.id, property.id);
}

#[tokio::test]
async fn invest_with_insufficient_balance_leaves_state_unchanged() {
    let storage = MemStorage::new();
    storage.initialize_properties().await.unwrap();
    let user_id = funded_user(&storage, "alice", dec!(1_000)).await;
    let property = storage
        .get_properties(PropertyFilter::Available)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let result = storage
        .record_investment(user_id, property.id, dec!(30_000), "Investment".into())
        .await;
    assert!(matches!(result, Err(CoreError::BusinessRule { .. })));

    assert_eq!(storage.get_wallet_balance(user_id).await.unwrap(), dec!(1_000));
    assert!(storage.get_user_stakes(user_id).await.unwrap().is_empty());
    let txns = storage.get_wallet_transactions(user_id).await.unwrap();
    assert_eq!(txns.len(), 1); // only the funding deposit
}

#[tokio::test]
async fn stake_referencing_missing_property_is_inconsistent() {
    let storage = MemStorage::new();
    let user_id = funded_user(&storage, "alice", dec!(1_000)).await;
    storage
        .add_stake(NewStake {
            user_id,
            property_id: Uuid::new_v4(),
            investment_amount: dec!(100),
            shares: dec!(100),
        })
        .await
        .unwrap();

    let result = storage.get_user_stakes(user_id).await;
    assert!(matches!(result, Err(CoreError::Inconsistent { .. })));
}

// -----------------------------------------------------------------------
// Payment cards
// -----------------------------------------------------------------------

fn card_input(user_id: Uuid, number: &str) -> NewPaymentCard {
    NewPaymentCard {
        user_id,
        card_number: number.into(),
        cardholder_name: "A. Investor".into(),
        expiry_date: "12/27".into(),
        card_type: "Visa".into(),
    }
}

#[tokio::test]
async fn first_card_is_default_second_is_not() {
    let storage = MemStorage::new();
    let user = storage.create_user(new_user("alice")).await.unwrap();

    let first = storage
        .add_payment_card(card_input(user.id, "4242424242424242"))
        .await
        .unwrap();
    assert!(first.is_default);
    assert_eq!(first.last_four_digits, "4242");

    let second = storage
        .add_payment_card(card_input(user.id, "5555444433331111"))
        .await
        .unwrap();
    assert!(!second.is_default);

    // First card is still the default.
    let cards = storage.get_payment_cards(user.id).await.unwrap();
    assert_eq!(
        cards.iter().filter(|c| c.is_default).count(),
        1
    );
    assert!(cards.iter().find(|c| c.id == first.id).unwrap().is_default);
}

#[tokio::test]
async fn deleting_default_card_promotes_exactly_one_remaining() {
    let storage = MemStorage::new();
    let user = storage.create_user(new_user("alice")).await.unwrap();
    let first = storage
        .add_payment_card(card_input(user.id, "4242424242424242"))
        .await
        .unwrap();
    storage
        .add_payment_card(card_input(user.id, "5555444433331111"))
        .await
        .unwrap();
    storage
        .add_payment_card(card_input(user.id, "378282246310005"))
        .await
        .unwrap();

    storage.delete_payment_card(first.id, user.id).await.unwrap();

    let cards = storage.get_payment_cards(user.id).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards.iter().filter(|c| c.is_default).count(), 1);
}

#[tokio::test]
async fn set_default_clears_previous_default() {
    let storage = MemStorage::new();
    let user = storage.create_user(new_user("alice")).await.unwrap();
    let first = storage
        .add_payment_card(card_input(user.id, "4242424242424242"))
        .await
        .unwrap();
    let second = storage
        .add_payment_card(card_input(user.id, "5555444433331111"))
        .await
        .unwrap();

    storage
        .set_default_payment_card(second.id, user.id)
        .await
        .unwrap();

    let cards = storage.get_payment_cards(user.id).await.unwrap();
    assert!(!cards.iter().find(|c| c.id == first.id).unwrap().is_default);
    assert!(cards.iter().find(|c| c.id == second.id).unwrap().is_default);
}

#[tokio::test]
async fn card_operations_are_scoped_to_owner() {
    let storage = MemStorage::new();
    let alice = storage.create_user(new_user("alice")).await.unwrap();
    let mallory = storage.create_user(new_user("mallory")).await.unwrap();
    let card = storage
        .add_payment_card(card_input(alice.id, "4242424242424242"))
        .await
        .unwrap();

    let delete = storage.delete_payment_card(card.id, mallory.id).await;
    assert!(matches!(delete, Err(CoreError::NotFound { .. })));

    let promote = storage.set_default_payment_card(card.id, mallory.id).await;
    assert!(matches!(promote, Err(CoreError::NotFound { .. })));
}
