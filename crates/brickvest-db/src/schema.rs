//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Money amounts are stored as
//! numbers and converted to `Decimal` at the row boundary.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE option<string>;
DEFINE FIELD email ON TABLE user TYPE option<string>;
DEFINE FIELD phone_number ON TABLE user TYPE option<string>;
DEFINE FIELD avatar_url ON TABLE user TYPE option<string>;
DEFINE FIELD wallet_balance ON TABLE user TYPE number DEFAULT 0.0;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD is_verified ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD last_login ON TABLE user TYPE option<datetime>;
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token_hash ON TABLE session \
    COLUMNS token_hash UNIQUE;

-- =======================================================================
-- Properties
-- =======================================================================
DEFINE TABLE property SCHEMAFULL;
DEFINE FIELD title ON TABLE property TYPE string;
DEFINE FIELD location ON TABLE property TYPE string;
DEFINE FIELD city ON TABLE property TYPE string;
DEFINE FIELD bedrooms ON TABLE property TYPE int;
DEFINE FIELD price ON TABLE property TYPE string;
DEFINE FIELD image_url ON TABLE property TYPE string;
DEFINE FIELD property_type ON TABLE property TYPE string;
DEFINE FIELD funding_percentage ON TABLE property TYPE int \
    ASSERT $value >= 0 AND $value <= 100;
DEFINE FIELD yearly_return ON TABLE property TYPE number;
DEFINE FIELD total_return ON TABLE property TYPE number;
DEFINE FIELD projected_yield ON TABLE property TYPE number;
DEFINE FIELD property_code ON TABLE property TYPE string;
DEFINE FIELD status ON TABLE property TYPE string;
DEFINE FIELD filter ON TABLE property TYPE string \
    ASSERT $value IN ['Available', 'Funded', 'Exited'];
DEFINE FIELD floor_area ON TABLE property TYPE option<string>;
DEFINE FIELD year_built ON TABLE property TYPE option<int>;
DEFINE FIELD parking_spaces ON TABLE property TYPE option<int>;
DEFINE FIELD monthly_rent ON TABLE property TYPE option<string>;
DEFINE FIELD service_charges ON TABLE property TYPE option<string>;
DEFINE FIELD maintenance_fees ON TABLE property TYPE option<string>;
DEFINE FIELD occupancy_rate ON TABLE property TYPE option<number>;
DEFINE FIELD admin_id ON TABLE property TYPE option<string>;
DEFINE FIELD created_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE property TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Investment stakes (user ↔ property)
-- =======================================================================
DEFINE TABLE stake SCHEMAFULL;
DEFINE FIELD user_id ON TABLE stake TYPE string;
DEFINE FIELD property_id ON TABLE stake TYPE string;
DEFINE FIELD investment_amount ON TABLE stake TYPE number;
DEFINE FIELD shares ON TABLE stake TYPE number;
DEFINE FIELD status ON TABLE stake TYPE string \
    ASSERT $value IN ['active'];
DEFINE FIELD date_invested ON TABLE stake TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Wallet transactions (append-only ledger)
-- =======================================================================
DEFINE TABLE wallet_transaction SCHEMAFULL;
DEFINE FIELD user_id ON TABLE wallet_transaction TYPE string;
DEFINE FIELD amount ON TABLE wallet_transaction TYPE number;
DEFINE FIELD kind ON TABLE wallet_transaction TYPE string \
    ASSERT $value IN ['deposit', 'withdrawal', 'investment', 'return'];
DEFINE FIELD method ON TABLE wallet_transaction TYPE string \
    ASSERT $value IN ['card', 'mobile-money', 'bank', 'standard'];
DEFINE FIELD organization ON TABLE wallet_transaction TYPE string;
DEFINE FIELD account ON TABLE wallet_transaction TYPE string;
DEFINE FIELD description ON TABLE wallet_transaction TYPE string;
DEFINE FIELD related_property_id ON TABLE wallet_transaction \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE wallet_transaction TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Payment cards
-- =======================================================================
DEFINE TABLE payment_card SCHEMAFULL;
DEFINE FIELD user_id ON TABLE payment_card TYPE string;
DEFINE FIELD card_number ON TABLE payment_card TYPE string;
DEFINE FIELD cardholder_name ON TABLE payment_card TYPE string;
DEFINE FIELD expiry_date ON TABLE payment_card TYPE string;
DEFINE FIELD card_type ON TABLE payment_card TYPE string;
DEFINE FIELD is_default ON TABLE payment_card TYPE bool DEFAULT false;
DEFINE FIELD last_four_digits ON TABLE payment_card TYPE string;
DEFINE FIELD created_at ON TABLE payment_card TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Admin audit log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL;
DEFINE FIELD admin_id ON TABLE audit_log TYPE string;
DEFINE FIELD action ON TABLE audit_log TYPE string;
DEFINE FIELD entity_type ON TABLE audit_log TYPE string;
DEFINE FIELD entity_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD details ON TABLE audit_log TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD ip_address ON TABLE audit_log TYPE option<string>;
DEFINE FIELD created_at ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Property media
-- =======================================================================
DEFINE TABLE property_image SCHEMAFULL;
DEFINE FIELD property_id ON TABLE property_image TYPE string;
DEFINE FIELD image_url ON TABLE property_image TYPE string;
DEFINE FIELD caption ON TABLE property_image TYPE option<string>;
DEFINE FIELD display_order ON TABLE property_image TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE property_image TYPE datetime \
    DEFAULT time::now();

DEFINE TABLE property_document SCHEMAFULL;
DEFINE FIELD property_id ON TABLE property_document TYPE string;
DEFINE FIELD title ON TABLE property_document TYPE string;
DEFINE FIELD document_url ON TABLE property_document TYPE string;
DEFINE FIELD document_type ON TABLE property_document TYPE string;
DEFINE FIELD created_at ON TABLE property_document TYPE datetime \
    DEFAULT time::now();
";

/// Run all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
