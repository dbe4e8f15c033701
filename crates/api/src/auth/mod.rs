//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`bootstrap`] -- First admin account on an empty user store.

pub mod bootstrap;
pub mod jwt;
pub mod password;
