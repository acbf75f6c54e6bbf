//! User identifier type.
//!
//! User ids are short, system-generated tokens. They are never sequential
//! and never supplied by clients.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The input has the wrong number of characters.
    #[error("user id must be exactly {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a character outside `[0-9A-Za-z]`.
    #[error("user id must be ASCII alphanumeric")]
    InvalidCharacter,
}

/// A 10-character user identifier.
///
/// ## Examples
///
/// ```
/// use user_registry_core::UserId;
///
/// let id = UserId::parse("3fa85f6457").unwrap();
/// assert_eq!(id.as_str(), "3fa85f6457");
///
/// assert!(UserId::parse("short").is_err());
/// assert!(UserId::parse("has space!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Number of characters in every user id.
    pub const LENGTH: usize = 10;

    /// Parse a `UserId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly [`UserId::LENGTH`]
    /// ASCII alphanumeric characters.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        if s.len() != Self::LENGTH {
            return Err(UserIdError::InvalidLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(UserIdError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(UserId::parse("0123456789").is_ok());
        assert!(UserId::parse("abcdef0123").is_ok());
        assert!(UserId::parse("12infio8ed").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            UserId::parse("12infioed"),
            Err(UserIdError::InvalidLength {
                expected: 10,
                actual: 9
            })
        );
        assert!(matches!(
            UserId::parse(""),
            Err(UserIdError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            UserId::parse("abc-ef0123"),
            Err(UserIdError::InvalidCharacter)
        );
    }

    #[test]
    fn test_serde() {
        let id = UserId::parse("abcdef0123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abcdef0123\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<UserId>("\"nope\"").is_err());
    }
}
