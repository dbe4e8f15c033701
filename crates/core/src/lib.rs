//! Domain logic for the land-office job tracker.
//!
//! Everything in this crate is pure apart from the in-memory store in
//! [`store::memory`]. The database and HTTP crates depend on it, never the
//! other way round.

pub mod department;
pub mod error;
pub mod job;
pub mod reception;
pub mod report;
pub mod retention;
pub mod roles;
pub mod sanitize;
pub mod settings;
pub mod sla;
pub mod status;
pub mod store;
pub mod tracking;
pub mod types;
pub mod user;
pub mod workflow;
