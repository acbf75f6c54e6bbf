//! User Registry Core - Shared domain types.
//!
//! This crate provides the types shared by the registry's storage, service,
//! and HTTP layers:
//! - [`UserId`] - the 10-character system-generated identifier
//! - [`Email`] - a non-empty, lowercase-normalized email address
//! - [`UserInput`] / [`NewUser`] - raw and validated creation requests
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. The optional `postgres` feature adds `sqlx` encode/decode
//! support for the newtypes so they can be bound directly in queries.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
