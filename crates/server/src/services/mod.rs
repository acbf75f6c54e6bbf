//! Business logic services.
//!
//! # Services
//!
//! - `registry` - User creation and lookup on top of a [`UserStore`](crate::db::UserStore)

pub mod registry;

pub use registry::{RegistryService, ServiceError};
