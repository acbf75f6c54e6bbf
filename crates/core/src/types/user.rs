//! User creation request types.
//!
//! [`UserInput`] is what a caller hands the registry: every field as it was
//! received, possibly empty. [`UserInput::validate`] turns it into a
//! [`NewUser`], the only shape the storage layer accepts.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Raw, unvalidated fields of a user creation request.
///
/// Missing JSON keys deserialize to empty strings so that they are reported
/// alongside empty values by [`UserInput::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zip")]
    pub zip_code: String,
    #[serde(rename = "dob")]
    pub date_of_birth: String,
}

/// A validated user creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub date_of_birth: String,
}

/// One or more required fields were empty.
///
/// Lists every missing field, in declaration order, not just the first one
/// encountered.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required fields: {}", self.joined())]
pub struct MissingFields {
    fields: Vec<&'static str>,
}

impl MissingFields {
    /// Labels of the missing fields.
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// The missing field labels joined with `", "`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.fields.join(", ")
    }

    /// A failure naming a single field.
    #[must_use]
    pub fn single(field: &'static str) -> Self {
        Self {
            fields: vec![field],
        }
    }
}

impl UserInput {
    pub const FIRST_NAME: &'static str = "First Name";
    pub const LAST_NAME: &'static str = "Last Name";
    pub const EMAIL: &'static str = "Email";
    pub const ADDRESS: &'static str = "Address";
    pub const CITY: &'static str = "City";
    pub const STATE: &'static str = "State";
    pub const ZIP_CODE: &'static str = "Zip Code";
    pub const DATE_OF_BIRTH: &'static str = "Date of Birth";

    /// Check that every field is present and normalize the email.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` naming every empty field.
    pub fn validate(self) -> Result<NewUser, MissingFields> {
        let email = Email::parse(&self.email).ok();

        let checks = [
            (Self::FIRST_NAME, !self.first_name.is_empty()),
            (Self::LAST_NAME, !self.last_name.is_empty()),
            (Self::EMAIL, email.is_some()),
            (Self::ADDRESS, !self.address.is_empty()),
            (Self::CITY, !self.city.is_empty()),
            (Self::STATE, !self.state.is_empty()),
            (Self::ZIP_CODE, !self.zip_code.is_empty()),
            (Self::DATE_OF_BIRTH, !self.date_of_birth.is_empty()),
        ];

        let fields: Vec<&'static str> = checks
            .iter()
            .filter(|(_, present)| !present)
            .map(|(label, _)| *label)
            .collect();

        match email {
            Some(email) if fields.is_empty() => Ok(NewUser {
                first_name: self.first_name,
                last_name: self.last_name,
                email,
                address: self.address,
                city: self.city,
                state: self.state,
                zip_code: self.zip_code,
                date_of_birth: self.date_of_birth,
            }),
            _ => Err(MissingFields { fields }),
        }
    }
}
