//! Domain models, the storage contract, and shared error types for
//! the fractional real-estate investment platform.

pub mod error;
pub mod models;
pub mod seed;
pub mod storage;

pub use error::{CoreError, CoreResult};
pub use storage::Storage;
