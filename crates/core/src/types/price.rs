//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are currency agnostic. The backend sends them as plain JSON numbers
//! and they are displayed with a fixed local-currency prefix.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Prefix used when a price is shown to people.
pub const CURRENCY_PREFIX: &str = "Kshs.";

/// Errors that can occur when parsing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("invalid price: {0}")]
    Invalid(String),
    #[error("price must not be negative")]
    Negative,
}

/// A non-negative amount in the shop's display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Add two prices, saturating at the largest representable amount.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_PREFIX} {}", self.0.normalize())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accepts numbers and numeric strings.
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert_eq!(Price::from_str("-1"), Err(PriceError::Negative));
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
    }

    #[test]
    fn test_price_from_json_number() {
        let price: Price = serde_json::from_str("19.5").unwrap();
        assert_eq!(price.amount(), Decimal::new(195, 1));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_units(10)).unwrap();
        assert_eq!(json, "10.0");
    }

    #[test]
    fn test_display_uses_currency_prefix() {
        assert_eq!(Price::from_str("1200.50").unwrap().to_string(), "Kshs. 1200.5");
        assert_eq!(Price::from_units(75).to_string(), "Kshs. 75");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_units(25).times(3), Price::from_units(5)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(80));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = Price::from_str("50000000000000000000000000000").unwrap();
        assert_eq!(huge.times(2).amount(), Decimal::MAX);

        let total: Price = [huge, huge, Price::from_units(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
    }

    #[test]
    fn test_price_from_json_string() {
        let price: Price = serde_json::from_str("\"450.50\"").unwrap();
        assert_eq!(price, Price::from_str("450.5").unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::from_str("ten"), Err(PriceError::Invalid(_))));
    }
}
