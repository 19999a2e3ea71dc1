//! Seller handle type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Errors that can occur when parsing an [`AndrewId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AndrewIdError {
    /// The input string is empty.
    #[error("andrew id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("andrew id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9]`.
    #[error("andrew id may only contain lowercase letters and digits (found {0:?})")]
    InvalidCharacter(char),
}

/// Human-readable unique handle identifying a user.
///
/// Derived once from the email local-part at account creation and immutable
/// afterward. Listings record the seller by this handle, and ownership checks
/// compare it for equality.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - Lowercase ASCII letters and digits only (uppercase input is folded)
///
/// ## Examples
///
/// ```
/// use quadmarket_core::AndrewId;
///
/// assert!(AndrewId::parse("mmustard3").is_ok());
/// assert!(AndrewId::parse("").is_err());
/// assert!(AndrewId::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AndrewId(String);

impl AndrewId {
    /// Maximum length of a handle.
    pub const MAX_LENGTH: usize = 32;

    /// Parse an `AndrewId` from a string.
    ///
    /// Uppercase ASCII is lowercased; anything else outside `[a-z0-9]` is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 32 characters, or
    /// contains a character that is not an ASCII letter or digit.
    pub fn parse(s: &str) -> Result<Self, AndrewIdError> {
        if s.is_empty() {
            return Err(AndrewIdError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(AndrewIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        for c in s.chars() {
            if !c.is_ascii_alphanumeric() {
                return Err(AndrewIdError::InvalidCharacter(c));
            }
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Derive the handle from an email address.
    ///
    /// Uses the local-part (before the `@`). This derivation happens exactly
    /// once, at profile creation; the stored handle is authoritative
    /// afterward even if the email changes upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the local-part is not a valid handle (e.g. it
    /// contains `+` or `.`).
    pub fn from_email(email: &Email) -> Result<Self, AndrewIdError> {
        Self::parse(email.local_part())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the handle and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AndrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AndrewId {
    type Err = AndrewIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AndrewId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AndrewId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AndrewId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AndrewId {
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
    fn test_parse_valid_handles() {
        assert!(AndrewId::parse("mmustard3").is_ok());
        assert!(AndrewId::parse("a").is_ok());
        assert!(AndrewId::parse("abc123").is_ok());
    }

    #[test]
    fn test_parse_folds_case() {
        let id = AndrewId::parse("MMustard3").unwrap();
        assert_eq!(id.as_str(), "mmustard3");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(AndrewId::parse(""), Err(AndrewIdError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(33);
        assert!(matches!(
            AndrewId::parse(&long),
            Err(AndrewIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            AndrewId::parse("has space"),
            Err(AndrewIdError::InvalidCharacter(' '))
        ));
        assert!(AndrewId::parse("dot.ted").is_err());
        assert!(AndrewId::parse("plus+tag").is_err());
    }

    #[test]
    fn test_from_email() {
        let email = Email::parse("mmustard3@andrew.cmu.edu").unwrap();
        let id = AndrewId::from_email(&email).unwrap();
        assert_eq!(id.as_str(), "mmustard3");
    }

    #[test]
    fn test_from_email_rejects_tagged_local_part() {
        let email = Email::parse("user+tag@example.com").unwrap();
        assert!(AndrewId::from_email(&email).is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = AndrewId::parse("mmustard3").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"mmustard3\"");
    }
}
