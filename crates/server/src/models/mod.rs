//! Domain models returned by the registry.

pub mod user;

pub use user::User;
