//! SurrealDB connection management, schema migrations, and the
//! SurrealDB-backed implementation of the storage contract.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The [`SurrealStorage`] backend implementing
//!   [`brickvest_core::storage::Storage`]

mod connection;
mod error;
mod schema;
pub mod storage;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use storage::SurrealStorage;
