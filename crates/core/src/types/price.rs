//! Listing price type.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input could not be read as a number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative listing price in dollars.
///
/// Creation payloads historically carried the price as either a JSON number
/// or a numeric string, so [`Price::coerce`] accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Wrap a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Coerce a JSON value (number or numeric string) into a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a number nor a numeric
    /// string, or if it is negative.
    pub fn coerce(value: &serde_json::Value) -> Result<Self, PriceError> {
        let amount = match value {
            serde_json::Value::Number(n) => {
                n.as_f64().and_then(Decimal::from_f64_retain)
            }
            serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        }
        .ok_or(PriceError::NotANumber)?;

        Self::new(amount)
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with postgres feature): stored as NUMERIC.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are constrained non-negative
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_from_number() {
        let price = Price::coerce(&json!(19.99)).unwrap();
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_coerce_from_integer() {
        let price = Price::coerce(&json!(25)).unwrap();
        assert_eq!(price.amount(), Decimal::from(25));
    }

    #[test]
    fn test_coerce_from_numeric_string() {
        let price = Price::coerce(&json!("12.50")).unwrap();
        assert_eq!(price.to_string(), "12.50");
    }

    #[test]
    fn test_coerce_zero_is_allowed() {
        assert!(Price::coerce(&json!(0)).is_ok());
    }

    #[test]
    fn test_coerce_rejects_negative() {
        assert!(matches!(
            Price::coerce(&json!(-5)),
            Err(PriceError::Negative)
        ));
        assert!(matches!(
            Price::coerce(&json!("-0.01")),
            Err(PriceError::Negative)
        ));
    }

    #[test]
    fn test_coerce_rejects_non_numeric() {
        assert!(matches!(
            Price::coerce(&json!("free")),
            Err(PriceError::NotANumber)
        ));
        assert!(matches!(
            Price::coerce(&json!(true)),
            Err(PriceError::NotANumber)
        ));
        assert!(matches!(
            Price::coerce(&json!(null)),
            Err(PriceError::NotANumber)
        ));
    }
}
