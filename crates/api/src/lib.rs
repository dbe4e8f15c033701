//! Land office job tracker API server library.
//!
//! The binary in `main.rs` only wires configuration, storage and the
//! listener; everything it serves is built from these modules.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
