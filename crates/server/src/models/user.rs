//! User domain types.
//!
//! Separate from the storage row type so the JSON shape stays fixed even if
//! the table changes.

use serde::{Deserialize, Serialize};

use user_registry_core::{Email, UserId};

use crate::db::UserRecord;

/// A registered user as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Ten-character identifier assigned at creation.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Always lowercase.
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zip")]
    pub zip_code: String,
    #[serde(rename = "dob")]
    pub date_of_birth: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            address: record.address,
            city: record.city,
            state: record.state,
            zip_code: record.zip_code,
            date_of_birth: record.date_of_birth,
        }
    }
}
