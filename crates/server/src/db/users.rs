//! `PostgreSQL` user repository.
//!
//! Queries are runtime-checked (`query_as` with `FromRow`) so the crate
//! builds without a live database.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use user_registry_core::{Email, NewUser, UserId};

use super::{RepositoryError, UserRecord, UserStore, create_pool, ensure_email_available};
use crate::config::DatabaseConfig;
use crate::ids::IdGenerator;

const PRIMARY_KEY_CONSTRAINT: &str = "users_pkey";

const SELECT_BY_EMAIL: &str = r"
    SELECT id, first_name, last_name, email, address, city, state, zip, dob
    FROM users
    WHERE email = $1
";

const SELECT_BY_ID: &str = r"
    SELECT id, first_name, last_name, email, address, city, state, zip, dob
    FROM users
    WHERE id = $1
";

// A concurrent insert of the same email makes this return no row.
const INSERT_USER: &str = r"
    INSERT INTO users (id, first_name, last_name, email, address, city, state, zip, dob)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (email) DO NOTHING
    RETURNING id, first_name, last_name, email, address, city, state, zip, dob
";

const COUNT_BY_EMAIL: &str = "SELECT COUNT(*) FROM users WHERE email = $1";

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    first_name: String,
    last_name: String,
    email: Email,
    address: String,
    city: String,
    state: String,
    zip: String,
    dob: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip,
            date_of_birth: row.dob,
        }
    }
}

/// User store backed by a shared `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
    ids: IdGenerator,
}

impl PgUserStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool, ids: IdGenerator) -> Self {
        Self { pool, ids }
    }

    /// Open a pool from `config` and wrap it with the default id generator.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = create_pool(config).await?;
        Ok(Self::new(pool, IdGenerator::default()))
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Count rows holding `email`. Never more than one while the unique
    /// constraint is in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_email(&self, email: &Email) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(COUNT_BY_EMAIL)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<UserRecord, RepositoryError> {
        sqlx::query_as::<_, UserRow>(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: &UserId) -> Result<UserRecord, RepositoryError> {
        sqlx::query_as::<_, UserRow>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, RepositoryError> {
        ensure_email_available(self, &new_user.email).await?;

        let id = self.ids.generate(self).await?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(&id)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.address)
            .bind(&new_user.city)
            .bind(&new_user.state)
            .bind(&new_user.zip_code)
            .bind(&new_user.date_of_birth)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &id));

        match inserted {
            Ok(Some(row)) => {
                tx.commit().await?;
                tracing::info!(user_id = %row.id, "User row committed");
                Ok(row.into())
            }
            Ok(None) => {
                tracing::warn!(
                    email = %new_user.email,
                    "Email claimed by a concurrent writer before insert"
                );
                rollback(tx).await;
                Err(RepositoryError::EmailExists)
            }
            Err(err) => {
                rollback(tx).await;
                Err(err)
            }
        }
    }
}

/// Roll back `tx`, logging rather than returning any failure so the caller's
/// original error is the one reported.
async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(err) = tx.rollback().await {
        tracing::error!(error = %err, "Failed to roll back transaction");
    }
}

// Email conflicts never reach here: `ON CONFLICT (email)` turns them into an
// empty result instead of an error.
fn map_insert_error(err: sqlx::Error, id: &UserId) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
        && db_err.constraint() == Some(PRIMARY_KEY_CONSTRAINT)
    {
        return RepositoryError::DuplicateId(id.clone());
    }
    RepositoryError::Database(err)
}
