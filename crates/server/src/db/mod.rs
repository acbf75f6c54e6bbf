//! Storage engine for the user registry.
//!
//! # Table: `users`
//!
//! One row per registered user. `id` is the primary key (`users_pkey`) and
//! `email` carries a unique constraint (`users_email_key`). The schema lives
//! in `crates/server/migrations/` and is applied with:
//! ```bash
//! psql "$REGISTRY_DATABASE_URL" -f crates/server/migrations/0001_create_users.sql
//! ```
//!
//! # Backends
//!
//! - [`PgUserStore`] - `PostgreSQL` via a shared `sqlx` pool
//! - [`MemoryUserStore`] - in-process tables, used by tests and local runs

pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use user_registry_core::{Email, NewUser, UserId, UserIdError};

use crate::config::DatabaseConfig;
use crate::ids::EntropyError;

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested user was not found.
    #[error("not found")]
    NotFound,

    /// The email is already associated with a persisted user.
    #[error("email is already in use")]
    EmailExists,

    /// A concurrent writer inserted the same id first.
    #[error("user id {0} is already taken")]
    DuplicateId(UserId),

    /// The random source failed while generating an id.
    #[error("id generation failed: {0}")]
    Entropy(#[from] EntropyError),

    /// Every candidate id drawn was already taken.
    #[error("no free user id after {attempts} attempts")]
    IdSpaceExhausted {
        /// Candidates drawn before giving up.
        attempts: usize,
    },

    /// An identifier failed validation.
    #[error("invalid user id: {0}")]
    InvalidId(#[from] UserIdError),
}

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub date_of_birth: String,
}

impl UserRecord {
    /// Combine a generated id with validated creation fields.
    #[must_use]
    pub fn new(id: UserId, user: NewUser) -> Self {
        Self {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            address: user.address,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
            date_of_birth: user.date_of_birth,
        }
    }
}

/// Persistence contract for user records.
///
/// Emails arrive already normalized; the `Email` type guarantees it.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user with exactly this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has the email.
    async fn get_by_email(&self, email: &Email) -> Result<UserRecord, RepositoryError>;

    /// Find the user with this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has the id.
    async fn get_by_id(&self, id: &UserId) -> Result<UserRecord, RepositoryError>;

    /// Persist a new user under a freshly generated id.
    ///
    /// Checks the email before opening a transaction, then inserts inside one
    /// with a guard on the email column. Either the whole row is committed or
    /// nothing is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmailExists` if the email is taken, including
    /// when a concurrent writer claims it between the check and the insert.
    /// Id generation and database failures are returned as-is.
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, RepositoryError>;
}

/// Fail with `EmailExists` if a user already holds `email`.
pub(crate) async fn ensure_email_available(
    store: &dyn UserStore,
    email: &Email,
) -> Result<(), RepositoryError> {
    match store.get_by_email(email).await {
        Ok(_) => Err(RepositoryError::EmailExists),
        Err(RepositoryError::NotFound) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.url.expose_secret())
        .await
}
