//! BrickVest REST API server.
//!
//! Routing and handlers live here so integration tests can drive the
//! full router against the in-memory backend; `main.rs` only wires
//! configuration, backend selection, and the listener.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
