//! In-memory implementation of the BrickVest storage contract.
//!
//! All entities live in maps behind a single `tokio::sync::RwLock`.
//! The wallet composites (`record_deposit`, `record_withdrawal`,
//! `record_investment`) run under one write-lock acquisition, so the
//! balance check and the paired mutations are serialized against
//! concurrent requests for the same user.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use brickvest_core::error::{CoreError, CoreResult};
use brickvest_core::models::{
    audit::{AuditLogEntry, NewAuditLogEntry},
    media::{NewPropertyDocument, NewPropertyImage, PropertyDocument, PropertyImage},
    payment_card::{self, NewPaymentCard, PaymentCard},
    property::{AdminUpdateProperty, NewProperty, Property, PropertyFilter},
    session::{NewSession, Session},
    stake::{NewStake, Stake, StakeStatus, StakeWithProperty},
    user::{AdminUpdateUser, NewUser, Role, UpdateUserProfile, User},
    wallet::{
        DEFAULT_ACCOUNT, DEFAULT_ORGANIZATION, NewWalletTransaction, TransactionKind,
        WalletEntryMeta, WalletTransaction,
    },
};
use brickvest_core::seed;
use brickvest_core::storage::{
    AuditLogStore, MediaStore, PaymentCardStore, PropertyStore, SessionStore, StakeStore,
    UserStore, WalletStore,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
    properties: HashMap<Uuid, Property>,
    stakes: HashMap<Uuid, Stake>,
    transactions: HashMap<Uuid, WalletTransaction>,
    cards: HashMap<Uuid, PaymentCard>,
    audit_logs: Vec<AuditLogEntry>,
    images: HashMap<Uuid, PropertyImage>,
    documents: HashMap<Uuid, PropertyDocument>,
}

/// Map-backed storage. Cheap to clone; clones share the same state.
#[derive(Clone, Default)]
pub struct MemStorage {
    inner: Arc<RwLock<State>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_property(state: &mut State, input: NewProperty) -> Property {
    let now = Utc::now();
    let property = Property {
        id: Uuid::new_v4(),
        title: input.title,
        location: input.location,
        city: input.city,
        bedrooms: input.bedrooms,
        price: input.price,
        image_url: input.image_url,
        property_type: input.property_type,
        funding_percentage: input.funding_percentage,
        yearly_return: input.yearly_return,
        total_return: input.total_return,
        projected_yield: input.projected_yield,
        property_code: input.property_code,
        status: input.status,
        filter: input.filter,
        floor_area: input.floor_area,
        year_built: input.year_built,
        parking_spaces: input.parking_spaces,
        monthly_rent: input.monthly_rent,
        service_charges: input.service_charges,
        maintenance_fees: input.maintenance_fees,
        occupancy_rate: input.occupancy_rate,
        admin_id: input.admin_id,
        created_at: now,
        updated_at: now,
    };
    state.properties.insert(property.id, property.clone());
    property
}

fn insert_transaction(state: &mut State, input: NewWalletTransaction) -> WalletTransaction {
    let txn = WalletTransaction {
        id: Uuid::new_v4(),
        user_id: input.user_id,
        amount: input.amount,
        kind: input.kind,
        method: input.method.unwrap_or_default(),
        organization: input
            .organization
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.into()),
        account: input.account.unwrap_or_else(|| DEFAULT_ACCOUNT.into()),
        description: input.description,
        related_property_id: input.related_property_id,
        created_at: Utc::now(),
    };
    state.transactions.insert(txn.id, txn.clone());
    txn
}

/// Conditional debit under an already-held write guard. The check and
/// the mutation are inseparable here.
fn debit_checked(
    state: &mut State,
    user_id: Uuid,
    amount: Decimal,
    shortfall_message: &str,
) -> CoreResult<Decimal> {
    let user = state
        .users
        .get_mut(&user_id)
        .ok_or_else(|| CoreError::not_found("user", user_id))?;
    if user.wallet_balance < amount {
        return Err(CoreError::business_rule(shortfall_message));
    }
    user.wallet_balance -= amount;
    Ok(user.wallet_balance)
}

impl UserStore for MemStorage {
    async fn get_user(&self, id: Uuid) -> CoreResult<User> {
        let state = self.inner.read().await;
        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    async fn get_user_by_username(&self, username: &str) -> CoreResult<User> {
        let state = self.inner.read().await;
        state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| CoreError::not_found("user", format!("username={username}")))
    }

    async fn create_user(&self, input: NewUser) -> CoreResult<User> {
        let mut state = self.inner.write().await;
        if state.users.values().any(|u| u.username == input.username) {
            return Err(CoreError::AlreadyExists {
                entity: "user".into(),
            });
        }
        let user = User {
            id: Uuid::new_v4(),
            username: input.username,
            password_hash: input.password_hash,
            full_name: input.full_name,
            email: input.email,
            phone_number: input.phone_number,
            avatar_url: input.avatar_url,
            wallet_balance: Decimal::ZERO,
            role: Role::User,
            is_verified: false,
            created_at: Utc::now(),
            last_login: None,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user_profile(&self, id: Uuid, input: UpdateUserProfile) -> CoreResult<User> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("user", id))?;
        if let Some(full_name) = input.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(email) = input.email {
            user.email = Some(email);
        }
        if let Some(phone_number) = input.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(avatar_url) = input.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        Ok(user.clone())
    }

    async fn record_login(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("user", id))?;
        user.last_login = Some(Utc::now());
        Ok(())
    }

    async fn get_all_users(&self) -> CoreResult<Vec<User>> {
        let state = self.inner.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_user_by_admin(&self, id: Uuid, input: AdminUpdateUser) -> CoreResult<User> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("user", id))?;
        if let Some(full_name) = input.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(email) = input.email {
            user.email = Some(email);
        }
        if let Some(phone_number) = input.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        if let Some(is_verified) = input.is_verified {
            user.is_verified = is_verified;
        }
        Ok(user.clone())
    }
}

impl SessionStore for MemStorage {
    async fn create_session(&self, input: NewSession) -> CoreResult<Session> {
        let mut state = self.inner.write().await;
        let session = Session {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            token_hash: input.token_hash,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session_by_token_hash(&self, token_hash: &str) -> CoreResult<Session> {
        let state = self.inner.read().await;
        let now = Utc::now();
        state
            .sessions
            .values()
            .find(|s| s.token_hash == token_hash && s.expires_at > now)
            .cloned()
            .ok_or_else(|| CoreError::not_found("session", "token"))
    }

    async fn delete_session(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        state.sessions.remove(&id);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }
}

impl PropertyStore for MemStorage {
    async fn get_properties(&self, filter: PropertyFilter) -> CoreResult<Vec<Property>> {
        let state = self.inner.read().await;
        let mut properties: Vec<Property> = state
            .properties
            .values()
            .filter(|p| p.filter == filter)
            .cloned()
            .collect();
        properties.sort_by_key(|p| p.created_at);
        Ok(properties)
    }

    async fn get_property(&self, id: Uuid) -> CoreResult<Property> {
        let state = self.inner.read().await;
        state
            .properties
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("property", id))
    }

    async fn create_property(&self, input: NewProperty) -> CoreResult<Property> {
        let mut state = self.inner.write().await;
        Ok(insert_property(&mut state, input))
    }

    async fn initialize_properties(&self) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        if !state.properties.is_empty() {
            return Ok(());
        }
        for input in seed::sample_properties() {
            insert_property(&mut state, input);
        }
        tracing::info!(count = state.properties.len(), "seeded sample properties");
        Ok(())
    }

    async fn get_all_properties(&self) -> CoreResult<Vec<Property>> {
        let state = self.inner.read().await;
        let mut properties: Vec<Property> = state.properties.values().cloned().collect();
        properties.sort_by_key(|p| p.created_at);
        Ok(properties)
    }

    async fn update_property_by_admin(
        &self,
        id: Uuid,
        input: AdminUpdateProperty,
    ) -> CoreResult<Property> {
        let mut state = self.inner.write().await;
        let property = state
            .properties
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("property", id))?;
        if let Some(title) = input.title {
            property.title = title;
        }
        if let Some(location) = input.location {
            property.location = location;
        }
        if let Some(city) = input.city {
            property.city = city;
        }
        if let Some(bedrooms) = input.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(price) = input.price {
            property.price = price;
        }
        if let Some(image_url) = input.image_url {
            property.image_url = image_url;
        }
        if let Some(property_type) = input.property_type {
            property.property_type = property_type;
        }
        if let Some(funding_percentage) = input.funding_percentage {
            property.funding_percentage = funding_percentage;
        }
        if let Some(yearly_return) = input.yearly_return {
            property.yearly_return = yearly_return;
        }
        if let Some(total_return) = input.total_return {
            property.total_return = total_return;
        }
        if let Some(projected_yield) = input.projected_yield {
            property.projected_yield = projected_yield;
        }
        if let Some(status) = input.status {
            property.status = status;
        }
        if let Some(filter) = input.filter {
            property.filter = filter;
        }
        if let Some(floor_area) = input.floor_area {
            property.floor_area = Some(floor_area);
        }
        if let Some(year_built) = input.year_built {
            property.year_built = Some(year_built);
        }
        if let Some(parking_spaces) = input.parking_spaces {
            property.parking_spaces = Some(parking_spaces);
        }
        if let Some(monthly_rent) = input.monthly_rent {
            property.monthly_rent = Some(monthly_rent);
        }
        if let Some(service_charges) = input.service_charges {
            property.service_charges = Some(service_charges);
        }
        if let Some(maintenance_fees) = input.maintenance_fees {
            property.maintenance_fees = Some(maintenance_fees);
        }
        if let Some(occupancy_rate) = input.occupancy_rate {
            property.occupancy_rate = Some(occupancy_rate);
        }
        property.updated_at = Utc::now();
        Ok(property.clone())
    }
}

impl StakeStore for MemStorage {
    async fn get_user_stakes(&self, user_id: Uuid) -> CoreResult<Vec<StakeWithProperty>> {
        let state = self.inner.read().await;
        let mut stakes: Vec<Stake> = state
            .stakes
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        stakes.sort_by_key(|s| s.date_invested);

        stakes
            .into_iter()
            .map(|stake| {
                let property = state
                    .properties
                    .get(&stake.property_id)
                    .cloned()
                    .ok_or_else(|| CoreError::Inconsistent {
                        message: format!(
                            "stake {} references missing property {}",
                            stake.id, stake.property_id
                        ),
                    })?;
                Ok(StakeWithProperty { stake, property })
            })
            .collect()
    }

    async fn add_stake(&self, input: NewStake) -> CoreResult<Stake> {
        let mut state = self.inner.write().await;
        let stake = Stake {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            property_id: input.property_id,
            investment_amount: input.investment_amount,
            shares: input.shares,
            status: StakeStatus::Active,
            date_invested: Utc::now(),
        };
        state.stakes.insert(stake.id, stake.clone());
        Ok(stake)
    }
}

impl WalletStore for MemStorage {
    async fn get_wallet_balance(&self, user_id: Uuid) -> CoreResult<Decimal> {
        let state = self.inner.read().await;
        state
            .users
            .get(&user_id)
            .map(|u| u.wallet_balance)
            .ok_or_else(|| CoreError::not_found("user", user_id))
    }

    async fn update_wallet_balance(&self, user_id: Uuid, delta: Decimal) -> CoreResult<User> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| CoreError::not_found("user", user_id))?;
        user.wallet_balance += delta;
        Ok(user.clone())
    }

    async fn add_wallet_transaction(
        &self,
        input: NewWalletTransaction,
    ) -> CoreResult<WalletTransaction> {
        let mut state = self.inner.write().await;
        Ok(insert_transaction(&mut state, input))
    }

    async fn get_wallet_transactions(&self, user_id: Uuid) -> CoreResult<Vec<WalletTransaction>> {
        let state = self.inner.read().await;
        let mut txns: Vec<WalletTransaction> = state
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        txns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(txns)
    }

    async fn get_all_transactions(&self) -> CoreResult<Vec<WalletTransaction>> {
        let state = self.inner.read().await;
        let mut txns: Vec<WalletTransaction> = state.transactions.values().cloned().collect();
        txns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(txns)
    }

    async fn record_deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> CoreResult<Decimal> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| CoreError::not_found("user", user_id))?;
        user.wallet_balance += amount;
        let balance = user.wallet_balance;

        insert_transaction(
            &mut state,
            NewWalletTransaction {
                user_id,
                amount,
                kind: TransactionKind::Deposit,
                method: Some(meta.method),
                organization: meta.organization,
                account: meta.account,
                description: meta.description,
                related_property_id: None,
            },
        );
        Ok(balance)
    }

    async fn record_withdrawal(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> CoreResult<Decimal> {
        let mut state = self.inner.write().await;
        let balance = debit_checked(&mut state, user_id, amount, "Insufficient funds")?;

        insert_transaction(
            &mut state,
            NewWalletTransaction {
                user_id,
                amount: -amount,
                kind: TransactionKind::Withdrawal,
                method: Some(meta.method),
                organization: meta.organization,
                account: meta.account,
                description: meta.description,
                related_property_id: None,
            },
        );
        Ok(balance)
    }

    async fn record_investment(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        amount: Decimal,
        description: String,
    ) -> CoreResult<Stake> {
        let mut state = self.inner.write().await;
        if !state.properties.contains_key(&property_id) {
            return Err(CoreError::not_found("property", property_id));
        }
        debit_checked(&mut state, user_id, amount, "Insufficient wallet balance")?;

        let stake = Stake {
            id: Uuid::new_v4(),
            user_id,
            property_id,
            investment_amount: amount,
            shares: amount,
            status: StakeStatus::Active,
            date_invested: Utc::now(),
        };
        state.stakes.insert(stake.id, stake.clone());

        insert_transaction(
            &mut state,
            NewWalletTransaction {
                user_id,
                amount: -amount,
                kind: TransactionKind::Investment,
                method: None,
                organization: None,
                account: None,
                description,
                related_property_id: Some(property_id),
            },
        );
        Ok(stake)
    }
}

impl PaymentCardStore for MemStorage {
    async fn add_payment_card(&self, input: NewPaymentCard) -> CoreResult<PaymentCard> {
        let mut state = self.inner.write().await;
        let has_cards = state.cards.values().any(|c| c.user_id == input.user_id);
        let card = PaymentCard {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            last_four_digits: payment_card::last_four(&input.card_number),
            card_number: input.card_number,
            cardholder_name: input.cardholder_name,
            expiry_date: input.expiry_date,
            card_type: input.card_type,
            is_default: !has_cards,
            created_at: Utc::now(),
        };
        state.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_payment_cards(&self, user_id: Uuid) -> CoreResult<Vec<PaymentCard>> {
        let state = self.inner.read().await;
        let mut cards: Vec<PaymentCard> = state
            .cards
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.created_at);
        Ok(cards)
    }

    async fn get_payment_card(&self, id: Uuid) -> CoreResult<PaymentCard> {
        let state = self.inner.read().await;
        state
            .cards
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("payment card", id))
    }

    async fn delete_payment_card(&self, id: Uuid, user_id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        let owned = state
            .cards
            .get(&id)
            .is_some_and(|c| c.user_id == user_id);
        if !owned {
            return Err(CoreError::not_found("payment card", id));
        }
        let removed = state
            .cards
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("payment card", id))?;

        // Deleting the default promotes whichever card the map
        // enumerates first; not necessarily the oldest.
        if removed.is_default {
            let next = state
                .cards
                .values_mut()
                .find(|c| c.user_id == user_id);
            if let Some(card) = next {
                card.is_default = true;
            }
        }
        Ok(())
    }

    async fn set_default_payment_card(&self, id: Uuid, user_id: Uuid) -> CoreResult<PaymentCard> {
        let mut state = self.inner.write().await;
        let owned = state
            .cards
            .get(&id)
            .is_some_and(|c| c.user_id == user_id);
        if !owned {
            return Err(CoreError::not_found("payment card", id));
        }
        for card in state.cards.values_mut() {
            if card.user_id == user_id {
                card.is_default = false;
            }
        }
        let card = state
            .cards
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("payment card", id))?;
        card.is_default = true;
        Ok(card.clone())
    }
}

impl AuditLogStore for MemStorage {
    async fn add_audit_log(&self, input: NewAuditLogEntry) -> CoreResult<AuditLogEntry> {
        let mut state = self.inner.write().await;
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            admin_id: input.admin_id,
            action: input.action,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            details: input.details,
            ip_address: input.ip_address,
            created_at: Utc::now(),
        };
        state.audit_logs.push(entry.clone());
        Ok(entry)
    }

    async fn get_audit_logs(&self) -> CoreResult<Vec<AuditLogEntry>> {
        let state = self.inner.read().await;
        let mut entries = state.audit_logs.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

impl MediaStore for MemStorage {
    async fn add_property_image(&self, input: NewPropertyImage) -> CoreResult<PropertyImage> {
        let mut state = self.inner.write().await;
        let image = PropertyImage {
            id: Uuid::new_v4(),
            property_id: input.property_id,
            image_url: input.image_url,
            caption: input.caption,
            display_order: input.display_order,
            created_at: Utc::now(),
        };
        state.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn get_property_images(&self, property_id: Uuid) -> CoreResult<Vec<PropertyImage>> {
        let state = self.inner.read().await;
        let mut images: Vec<PropertyImage> = state
            .images
            .values()
            .filter(|i| i.property_id == property_id)
            .cloned()
            .collect();
        images.sort_by_key(|i| i.display_order);
        Ok(images)
    }

    async fn delete_property_image(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        state
            .images
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("property image", id))
    }

    async fn add_property_document(
        &self,
        input: NewPropertyDocument,
    ) -> CoreResult<PropertyDocument> {
        let mut state = self.inner.write().await;
        let document = PropertyDocument {
            id: Uuid::new_v4(),
            property_id: input.property_id,
            title: input.title,
            document_url: input.document_url,
            document_type: input.document_type,
            created_at: Utc::now(),
        };
        state.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn get_property_documents(
        &self,
        property_id: Uuid,
    ) -> CoreResult<Vec<PropertyDocument>> {
        let state = self.inner.read().await;
        let mut documents: Vec<PropertyDocument> = state
            .documents
            .values()
            .filter(|d| d.property_id == property_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.created_at);
        Ok(documents)
    }

    async fn delete_property_document(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.inner.write().await;
        state
            .documents
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("property document", id))
    }
}
