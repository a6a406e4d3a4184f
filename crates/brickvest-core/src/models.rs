//! Domain models for BrickVest.
//!
//! These are the core types shared across all crates. Each entity
//! comes with its `NewX`/`UpdateX` input structs, mirroring the
//! storage operations that accept them.

pub mod audit;
pub mod media;
pub mod payment_card;
pub mod property;
pub mod session;
pub mod stake;
pub mod user;
pub mod wallet;
