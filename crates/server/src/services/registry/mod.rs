//! User registry service.
//!
//! Validates creation requests, normalizes emails, and delegates persistence
//! to a [`UserStore`]. Uniqueness is enforced by the store; this layer only
//! translates its errors.

mod error;

pub use error::ServiceError;

use std::sync::Arc;

use user_registry_core::{Email, MissingFields, UserId, UserInput};

use crate::db::UserStore;
use crate::models::User;

/// Registry service.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct RegistryService {
    store: Arc<dyn UserStore>,
}

impl RegistryService {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` listing every empty field,
    /// `ServiceError::EmailConflict` if the email (compared case-insensitively)
    /// is taken, or `ServiceError::Entropy`/`ServiceError::Storage` on
    /// infrastructure faults.
    pub async fn create_user(&self, input: UserInput) -> Result<User, ServiceError> {
        let new_user = input.validate().inspect_err(|missing| {
            tracing::info!(missing_fields = %missing.joined(), "Rejected incomplete user");
        })?;
        let email = new_user.email.clone();

        match self.store.create_user(new_user).await {
            Ok(record) => {
                tracing::info!(user_id = %record.id, email = %record.email, "User created");
                Ok(record.into())
            }
            Err(err) => {
                let err = ServiceError::from(err);
                match &err {
                    ServiceError::EmailConflict => {
                        tracing::info!(%email, "Email already registered");
                    }
                    other => {
                        tracing::error!(%email, error = %other, "Failed to create user");
                    }
                }
                Err(err)
            }
        }
    }

    /// Look up a user by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if `email` is empty, or
    /// `ServiceError::NotFound` if no user has it.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let email =
            Email::parse(email).map_err(|_| MissingFields::single(UserInput::EMAIL))?;

        let record = self.store.get_by_email(&email).await.inspect_err(|err| {
            tracing::debug!(%email, error = %err, "User lookup by email failed");
        })?;

        Ok(record.into())
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no user has the id. A string that is
    /// not a well-formed id is never found.
    pub async fn get_user_by_id(&self, id: &str) -> Result<User, ServiceError> {
        let Ok(id) = UserId::parse(id) else {
            tracing::debug!(id, "Malformed user id");
            return Err(ServiceError::NotFound);
        };

        let record = self.store.get_by_id(&id).await.inspect_err(|err| {
            tracing::debug!(user_id = %id, error = %err, "User lookup by id failed");
        })?;

        Ok(record.into())
    }
}
