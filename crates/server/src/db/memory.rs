//! In-memory user store.
//!
//! Follows the same creation steps as the `PostgreSQL` store: email
//! pre-check, id generation, then a guarded insert. The "transaction" is a
//! critical section over both tables that re-checks the email, stages the
//! row, then either keeps it or removes it again.
//!
//! Column lengths match the `users` table, so values `PostgreSQL` would
//! reject as too long for their `VARCHAR` are rejected here too.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use user_registry_core::{Email, NewUser, UserId};

use super::{RepositoryError, UserRecord, UserStore, ensure_email_available};
use crate::ids::IdGenerator;

#[derive(Debug, Default)]
struct Tables {
    by_id: HashMap<UserId, UserRecord>,
    by_email: HashMap<Email, UserId>,
}

impl Tables {
    fn insert(&mut self, record: UserRecord) -> Result<(), RepositoryError> {
        if self.by_email.contains_key(&record.email) {
            return Err(RepositoryError::EmailExists);
        }
        if self.by_id.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateId(record.id));
        }

        self.by_email.insert(record.email.clone(), record.id.clone());
        self.by_id.insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&mut self, record: &UserRecord) {
        self.by_email.remove(&record.email);
        self.by_id.remove(&record.id);
    }
}

/// `VARCHAR` limits of the `users` table, in characters.
const COLUMN_LIMITS: [(&str, usize); 9] = [
    ("id", 10),
    ("first_name", 50),
    ("last_name", 50),
    ("email", 100),
    ("address", 255),
    ("city", 100),
    ("state", 100),
    ("zip", 20),
    ("dob", 20),
];

/// First column whose value exceeds its limit.
fn oversized_column(record: &UserRecord) -> Option<(&'static str, usize)> {
    let values: [&str; 9] = [
        record.id.as_str(),
        &record.first_name,
        &record.last_name,
        record.email.as_str(),
        &record.address,
        &record.city,
        &record.state,
        &record.zip_code,
        &record.date_of_birth,
    ];

    COLUMN_LIMITS
        .into_iter()
        .zip(values)
        .find(|((_, limit), value)| value.chars().count() > *limit)
        .map(|(column, _)| column)
}

/// User store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    tables: Mutex<Tables>,
    ids: IdGenerator,
    fail_next_commit: AtomicBool,
}

impl MemoryUserStore {
    /// Create an empty store using the OS random source for ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom id generator.
    #[must_use]
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Insert a record as-is, bypassing id generation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmailExists` or
    /// `RepositoryError::DuplicateId` if the record collides.
    pub fn insert_existing(&self, record: UserRecord) -> Result<(), RepositoryError> {
        self.tables().insert(record)
    }

    /// Make the next transactional insert fail after the row was staged.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of persisted users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables().by_id.len()
    }

    /// Whether no user is persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit_insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut tables = self.tables();

        if tables.by_email.contains_key(&record.email) {
            tracing::warn!(
                email = %record.email,
                "Email claimed by a concurrent writer before insert"
            );
            return Err(RepositoryError::EmailExists);
        }

        tables.insert(record.clone())?;

        let failure = if let Some((column, limit)) = oversized_column(&record) {
            Some(sqlx::Error::Protocol(format!(
                "value too long for type character varying({limit}) in column {column}"
            )))
        } else if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            Some(sqlx::Error::PoolClosed)
        } else {
            None
        };

        if let Some(err) = failure {
            tables.remove(&record);
            tracing::error!(user_id = %record.id, error = %err, "Insert failed, rolled back");
            return Err(RepositoryError::Database(err));
        }

        Ok(record)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<UserRecord, RepositoryError> {
        let tables = self.tables();
        tables
            .by_email
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: &UserId) -> Result<UserRecord, RepositoryError> {
        self.tables()
            .by_id
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, RepositoryError> {
        ensure_email_available(self, &new_user.email).await?;

        let id = self.ids.generate(self).await?;

        // Suspend here as a round trip to a real database would, so that
        // concurrent creations interleave between the check and the insert.
        tokio::task::yield_now().await;

        self.commit_insert(UserRecord::new(id, new_user))
    }
}
