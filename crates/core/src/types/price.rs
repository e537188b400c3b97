//! Type-safe price representation using decimal arithmetic.
//!
//! The commerce API reports all amounts as bare JSON numbers denominated
//! in Egyptian pounds. `Price` is a transparent wrapper over
//! [`rust_decimal::Decimal`] so amounts survive parsing without floating
//! point drift and display the way the storefront shows them.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in Egyptian pounds.
///
/// Deserializes transparently from the bare numbers the commerce API
/// returns for `price` and `totalCartPrice` fields.
///
/// # Example
///
/// ```
/// use fresh_cart_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::from(149));
/// assert_eq!(price.to_string(), "149 EGP");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// This amount multiplied by a quantity (line-total display helper).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} EGP", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from(149u32).to_string(), "149 EGP");
        assert_eq!(Price::ZERO.to_string(), "0 EGP");
    }

    #[test]
    fn test_price_deserializes_from_bare_number() {
        let price: Price = serde_json::from_str("150").unwrap();
        assert_eq!(price, Price::from(150u32));
    }

    #[test]
    fn test_price_times() {
        assert_eq!(Price::from(50u32).times(3), Price::from(150u32));
        assert_eq!(Price::from(50u32).times(0), Price::ZERO);
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from(100u32), Price::from(50u32)].into_iter().sum();
        assert_eq!(total, Price::from(150u32));
    }

    #[test]
    fn test_price_is_zero() {
        assert!(Price::ZERO.is_zero());
        assert!(!Price::from(1u32).is_zero());
    }
}
