//! User identifier generation.
//!
//! Ids are the first 10 hex characters of a SHA-256 digest over 16 bytes of
//! cryptographically secure random input. A candidate is only handed out
//! after the store confirms no record already uses it; taken candidates are
//! discarded and redrawn.
//!
//! The loop is unbounded by default. Forty bits of hash space make repeated
//! collisions vanishingly unlikely, but tests (and cautious callers) can cap
//! it with [`IdGenerator::with_max_attempts`].

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use user_registry_core::UserId;

use crate::db::{RepositoryError, UserStore};

/// Number of random bytes drawn per candidate.
pub const SEED_LEN: usize = 16;

/// Failure of the random source. Fatal for the current request.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The operating system RNG could not be read.
    #[error("operating system RNG failed: {0}")]
    Os(#[from] rand::rand_core::OsError),

    /// A custom source has no more randomness to give.
    #[error("entropy source unavailable: {0}")]
    Unavailable(String),
}

/// A source of cryptographically secure random bytes.
pub trait EntropySource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` if the source cannot produce randomness.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(buf)?;
        Ok(())
    }
}

/// Produces user ids that are not yet taken in a [`UserStore`].
#[derive(Clone)]
pub struct IdGenerator {
    entropy: Arc<dyn EntropySource>,
    max_attempts: Option<NonZeroUsize>,
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}

impl IdGenerator {
    /// Create an unbounded generator drawing from `entropy`.
    #[must_use]
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            entropy,
            max_attempts: None,
        }
    }

    /// Give up after `attempts` taken candidates.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: NonZeroUsize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Draw candidates until one is confirmed absent from `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Entropy` if the random source fails,
    /// `RepositoryError::IdSpaceExhausted` if the attempt cap is reached, or
    /// whatever non-`NotFound` error the store's lookup reports.
    pub async fn generate(&self, store: &dyn UserStore) -> Result<UserId, RepositoryError> {
        let mut attempts = 0;

        loop {
            if let Some(max) = self.max_attempts
                && attempts >= max.get()
            {
                tracing::error!(attempts, "Gave up generating a free user id");
                return Err(RepositoryError::IdSpaceExhausted { attempts });
            }
            attempts += 1;

            let mut seed = [0_u8; SEED_LEN];
            self.entropy.fill(&mut seed)?;
            let candidate = candidate_from_seed(&seed)?;

            match store.get_by_id(&candidate).await {
                Err(RepositoryError::NotFound) => return Ok(candidate),
                Ok(_) => {
                    tracing::warn!(%candidate, attempt = attempts, "Candidate id already taken");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Derive the candidate id for a random seed.
///
/// # Errors
///
/// Returns `RepositoryError::InvalidId` if the truncated digest is not a
/// valid `UserId`, which hex output never produces.
pub fn candidate_from_seed(seed: &[u8]) -> Result<UserId, RepositoryError> {
    let mut encoded = hex::encode(Sha256::digest(seed));
    encoded.truncate(UserId::LENGTH);
    Ok(UserId::parse(&encoded)?)
}
