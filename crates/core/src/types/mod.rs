//! Core types for the user registry.
//!
//! This module provides type-safe wrappers for the registry's domain concepts.

pub mod email;
pub mod id;
pub mod user;

pub use email::{Email, EmailError};
pub use id::{UserId, UserIdError};
pub use user::{MissingFields, NewUser, UserInput};
