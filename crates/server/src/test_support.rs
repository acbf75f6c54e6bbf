//! Fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use user_registry_core::UserInput;

use crate::ids::{EntropyError, EntropySource, SEED_LEN};

/// Entropy source that replays fixed seeds, then fails.
pub struct ScriptedEntropy {
    seeds: Mutex<VecDeque<[u8; SEED_LEN]>>,
}

impl ScriptedEntropy {
    pub fn new(seeds: impl IntoIterator<Item = [u8; SEED_LEN]>) -> Self {
        Self {
            seeds: Mutex::new(seeds.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.seeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let seed = self
            .seeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| EntropyError::Unavailable("scripted seeds exhausted".to_owned()))?;
        buf.copy_from_slice(&seed);
        Ok(())
    }
}

/// A complete, valid creation request.
pub fn eli() -> UserInput {
    UserInput {
        first_name: "Eli".to_owned(),
        last_name: "Fuchsman".to_owned(),
        email: "test@mail.com".to_owned(),
        address: "1123 Street St.".to_owned(),
        city: "Denver".to_owned(),
        state: "CO".to_owned(),
        zip_code: "80108".to_owned(),
        date_of_birth: "12/14/1993".to_owned(),
    }
}

/// [`eli`] with a different email.
pub fn input_with_email(email: &str) -> UserInput {
    UserInput {
        email: email.to_owned(),
        ..eli()
    }
}
