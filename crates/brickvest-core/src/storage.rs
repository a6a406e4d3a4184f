//! Storage trait definitions for data access abstraction.
//!
//! All storage operations are async. The traits are implemented by
//! two interchangeable backends, an in-memory map-backed store and a
//! SurrealDB-backed store, selected once at process start; both must
//! satisfy identical semantics so either is a drop-in.
//!
//! Absence of an entity is reported as [`CoreError::NotFound`]; the
//! route layer decides whether that is a 404 or something else.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    audit::{AuditLogEntry, NewAuditLogEntry},
    media::{NewPropertyDocument, NewPropertyImage, PropertyDocument, PropertyImage},
    payment_card::{NewPaymentCard, PaymentCard},
    property::{AdminUpdateProperty, NewProperty, Property, PropertyFilter},
    session::{NewSession, Session},
    stake::{NewStake, Stake, StakeWithProperty},
    user::{AdminUpdateUser, NewUser, UpdateUserProfile, User},
    wallet::{NewWalletTransaction, WalletEntryMeta, WalletTransaction},
};

pub trait UserStore: Send + Sync {
    fn get_user(&self, id: Uuid) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    /// Create a user with `wallet_balance = 0`, `role = user`,
    /// `is_verified = false`. Fails with `AlreadyExists` if the
    /// username is taken.
    fn create_user(&self, input: NewUser) -> impl Future<Output = CoreResult<User>> + Send;
    /// Merge only the allowed profile fields.
    fn update_user_profile(
        &self,
        id: Uuid,
        input: UpdateUserProfile,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    /// Stamp `last_login` with the current server time.
    fn record_login(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn get_all_users(&self) -> impl Future<Output = CoreResult<Vec<User>>> + Send;
    fn update_user_by_admin(
        &self,
        id: Uuid,
        input: AdminUpdateUser,
    ) -> impl Future<Output = CoreResult<User>> + Send;
}

pub trait SessionStore: Send + Sync {
    fn create_session(&self, input: NewSession)
    -> impl Future<Output = CoreResult<Session>> + Send;
    /// Look up a live session. Expired sessions are treated as absent.
    fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = CoreResult<Session>> + Send;
    fn delete_session(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    /// Drop every session a user holds (e.g. on password change).
    fn delete_user_sessions(&self, user_id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait PropertyStore: Send + Sync {
    /// All properties in the requested lifecycle bucket. An empty
    /// result is valid, not an error.
    fn get_properties(
        &self,
        filter: PropertyFilter,
    ) -> impl Future<Output = CoreResult<Vec<Property>>> + Send;
    fn get_property(&self, id: Uuid) -> impl Future<Output = CoreResult<Property>> + Send;
    fn create_property(
        &self,
        input: NewProperty,
    ) -> impl Future<Output = CoreResult<Property>> + Send;
    /// Idempotent seeding: a no-op when any property already exists,
    /// otherwise inserts the fixed sample catalog.
    fn initialize_properties(&self) -> impl Future<Output = CoreResult<()>> + Send;
    fn get_all_properties(&self) -> impl Future<Output = CoreResult<Vec<Property>>> + Send;
    fn update_property_by_admin(
        &self,
        id: Uuid,
        input: AdminUpdateProperty,
    ) -> impl Future<Output = CoreResult<Property>> + Send;
}

pub trait StakeStore: Send + Sync {
    /// The caller's stakes joined to their properties. A stake whose
    /// property is missing surfaces as `Inconsistent`; that is
    /// corrupted state, not a normal runtime condition.
    fn get_user_stakes(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<StakeWithProperty>>> + Send;
    /// Append a stake record. Does not touch the wallet; pairing a
    /// stake with its debit is the invest operation's job.
    fn add_stake(&self, input: NewStake) -> impl Future<Output = CoreResult<Stake>> + Send;
}

pub trait WalletStore: Send + Sync {
    fn get_wallet_balance(&self, user_id: Uuid)
    -> impl Future<Output = CoreResult<Decimal>> + Send;
    /// Unconditional `balance := balance + delta` (delta may be
    /// negative). No floor at zero is enforced here; spending paths
    /// go through the conditional composites below instead.
    fn update_wallet_balance(
        &self,
        user_id: Uuid,
        delta: Decimal,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    /// Append with a server-assigned timestamp; method/organization/
    /// account fall back to placeholder values when omitted.
    fn add_wallet_transaction(
        &self,
        input: NewWalletTransaction,
    ) -> impl Future<Output = CoreResult<WalletTransaction>> + Send;
    /// All of the user's transactions, newest first.
    fn get_wallet_transactions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<WalletTransaction>>> + Send;
    fn get_all_transactions(
        &self,
    ) -> impl Future<Output = CoreResult<Vec<WalletTransaction>>> + Send;

    /// Credit the wallet and append the paired `deposit` transaction
    /// as one atomic unit. Returns the updated balance.
    fn record_deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> impl Future<Output = CoreResult<Decimal>> + Send;
    /// Conditionally debit the wallet (`balance >= amount`, otherwise
    /// `BusinessRule`) and append the paired `withdrawal` transaction
    /// as one atomic unit. Returns the updated balance.
    fn record_withdrawal(
        &self,
        user_id: Uuid,
        amount: Decimal,
        meta: WalletEntryMeta,
    ) -> impl Future<Output = CoreResult<Decimal>> + Send;
    /// The invest composite: conditional debit, stake append, and
    /// `investment` transaction append in one atomic unit. On any
    /// failure no partial state remains.
    fn record_investment(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        amount: Decimal,
        description: String,
    ) -> impl Future<Output = CoreResult<Stake>> + Send;
}

pub trait PaymentCardStore: Send + Sync {
    /// Derives `last_four_digits` from the supplied number. The
    /// user's first card becomes the default automatically.
    fn add_payment_card(
        &self,
        input: NewPaymentCard,
    ) -> impl Future<Output = CoreResult<PaymentCard>> + Send;
    fn get_payment_cards(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<PaymentCard>>> + Send;
    fn get_payment_card(&self, id: Uuid)
    -> impl Future<Output = CoreResult<PaymentCard>> + Send;
    /// Remove a card the user owns. Deleting the default promotes an
    /// arbitrary remaining card (first in enumeration order); with no
    /// cards left, no default exists.
    fn delete_payment_card(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send;
    /// Two-phase: clear `is_default` on all of the user's cards, then
    /// set it on the target. `NotFound` if the card is absent or not
    /// owned by the user.
    fn set_default_payment_card(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<PaymentCard>> + Send;
}

pub trait AuditLogStore: Send + Sync {
    /// Append a new audit entry. No update or delete operations exist.
    fn add_audit_log(
        &self,
        input: NewAuditLogEntry,
    ) -> impl Future<Output = CoreResult<AuditLogEntry>> + Send;
    /// All entries, newest first.
    fn get_audit_logs(&self) -> impl Future<Output = CoreResult<Vec<AuditLogEntry>>> + Send;
}

pub trait MediaStore: Send + Sync {
    fn add_property_image(
        &self,
        input: NewPropertyImage,
    ) -> impl Future<Output = CoreResult<PropertyImage>> + Send;
    fn get_property_images(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<PropertyImage>>> + Send;
    fn delete_property_image(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn add_property_document(
        &self,
        input: NewPropertyDocument,
    ) -> impl Future<Output = CoreResult<PropertyDocument>> + Send;
    fn get_property_documents(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<PropertyDocument>>> + Send;
    fn delete_property_document(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}

/// The single authoritative contract for all entity reads/writes;
/// anything implementing `Storage` can back the whole application.
pub trait Storage:
    UserStore
    + SessionStore
    + PropertyStore
    + StakeStore
    + WalletStore
    + PaymentCardStore
    + AuditLogStore
    + MediaStore
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Storage for T where
    T: UserStore
        + SessionStore
        + PropertyStore
        + StakeStore
        + WalletStore
        + PaymentCardStore
        + AuditLogStore
        + MediaStore
        + Clone
        + Send
        + Sync
        + 'static
{
}
