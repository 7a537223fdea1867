use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A signed monetary amount in whole currency units.
///
/// Wraps `rust_decimal::Decimal` so financial arithmetic stays exact. Fines
/// and deposits at this layer never carry fractional-currency rounding
/// concerns, but rent amounts supplied by the property directory may.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const MAX: Self = Self(Decimal::MAX);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Doubles the value, pinning at `Balance::MAX` instead of overflowing.
    /// Keeps the fine escalation total even for absurd lateness.
    pub fn saturating_double(self) -> Self {
        match self.0.checked_mul(Decimal::TWO) {
            Some(doubled) => Self(doubled),
            None => Self::MAX,
        }
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
