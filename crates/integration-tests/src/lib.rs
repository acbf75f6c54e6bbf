//! Integration test harness for the user registry.
//!
//! # Running Tests
//!
//! ```bash
//! export TEST_DATABASE_URL=postgres://localhost/registry_test
//! cargo test -p user-registry-integration-tests -- --ignored
//! ```
//!
//! The schema is applied idempotently before each test; rows are left in
//! place, so every test works on emails it generates itself.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use user_registry_core::UserInput;
use user_registry_server::config::DatabaseConfig;
use user_registry_server::db::{PgUserStore, create_pool};
use user_registry_server::ids::IdGenerator;
use user_registry_server::services::RegistryService;

/// Schema shipped with the server crate.
pub const SCHEMA: &str = include_str!("../../server/migrations/0001_create_users.sql");

/// Errors raised while preparing a test database.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("TEST_DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A migrated database plus a registry wired to it.
pub struct TestContext {
    pub pool: PgPool,
    pub store: Arc<PgUserStore>,
    pub registry: RegistryService,
}

impl TestContext {
    /// Connect using `TEST_DATABASE_URL` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError` if the variable is unset or the database is
    /// unreachable.
    pub async fn new() -> Result<Self, HarnessError> {
        let url =
            std::env::var("TEST_DATABASE_URL").map_err(|_| HarnessError::MissingDatabaseUrl)?;
        let config = DatabaseConfig::new(url);

        let pool = create_pool(&config).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        let store = Arc::new(PgUserStore::new(pool.clone(), IdGenerator::default()));
        let registry = RegistryService::new(store.clone());

        Ok(Self {
            pool,
            store,
            registry,
        })
    }

    /// Remove any row holding `email`.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the delete fails.
    pub async fn delete_email(&self, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// An email no other test run will produce.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{:016x}@mail.com", rand::random::<u64>())
}

/// A complete creation request for `email`.
#[must_use]
pub fn user_input(email: &str) -> UserInput {
    UserInput {
        first_name: "Eli".to_owned(),
        last_name: "Fuchsman".to_owned(),
        email: email.to_owned(),
        address: "1123 Street St.".to_owned(),
        city: "Denver".to_owned(),
        state: "CO".to_owned(),
        zip_code: "80108".to_owned(),
        date_of_birth: "12/14/1993".to_owned(),
    }
}
