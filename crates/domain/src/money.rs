//! Money represented in integer minor-currency units.

use serde::{Deserialize, Serialize};

/// A monetary amount in minor units (e.g., cents) to avoid floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new amount from minor units.
    pub fn from_minor(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money(self.0 * i64::from(quantity))
    }

    /// Applies the one-time 10% discount, truncating toward zero.
    ///
    /// Integer arithmetic only: `270 == Money::from_minor(300).discounted()`.
    pub fn discounted(&self) -> Money {
        Money(self.0 * 9 / 10)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1234);
        assert_eq!(money.minor(), 1234);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!(a.multiply(3).minor(), 3000);
    }

    #[test]
    fn test_discount_truncates_toward_zero() {
        assert_eq!(Money::from_minor(300).discounted().minor(), 270);
        assert_eq!(Money::from_minor(100).discounted().minor(), 90);
        // 95 * 0.9 = 85.5, truncated to 85
        assert_eq!(Money::from_minor(95).discounted().minor(), 85);
        assert_eq!(Money::from_minor(0).discounted().minor(), 0);
    }

    #[test]
    fn test_add_assign_and_sub_assign() {
        let mut money = Money::from_minor(100);
        money += Money::from_minor(50);
        assert_eq!(money.minor(), 150);
        money -= Money::from_minor(30);
        assert_eq!(money.minor(), 120);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let money = Money::from_minor(270);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "270");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }
}
