//! Money types with precise decimal arithmetic
//!
//! All payment amounts in the KDRG schedule are denominated in Korean won.
//! Amounts use rust_decimal so that weight-times-rate arithmetic is exact;
//! floating point never enters payment math.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// A won-denominated monetary amount
///
/// Stored with 2 decimal places internally so intermediate per-diem and
/// percentage calculations keep sub-won precision; schedule amounts are
/// whole won and round via [`Money::round_to_won`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new amount
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// Creates an amount from whole won
    pub fn from_won(won: i64) -> Self {
        Self(Decimal::new(won, 0))
    }

    /// The zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to whole won
    pub fn round_to_won(&self) -> Self {
        Self(self.0.round_dp(0))
    }

    /// Multiplies by a scalar factor (e.g. an outlier adjustment)
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.0 * factor)
    }

    /// Percentage this amount represents of `base`, rounded to 2 decimal places
    ///
    /// Returns zero when the base is zero rather than erroring; revenue
    /// deltas over an unknown base are reported as 0% changes.
    pub fn percent_of(&self, base: Money) -> Decimal {
        if base.0.is_zero() {
            return dec!(0);
        }
        (self.0 / base.0 * dec!(100)).round_dp(2)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₩{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// The configurable won-per-point conversion rate
///
/// Every scheduled amount is relative weight times this rate. The rate is a
/// collaborator-supplied configuration value; [`PointRate::krw_2024`] is the
/// published 2024 schedule rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRate(Decimal);

impl PointRate {
    /// Creates a rate from won per point
    pub fn new(won_per_point: Decimal) -> Self {
        Self(won_per_point)
    }

    /// The published 2024 rate: 87,000 won per point
    pub fn krw_2024() -> Self {
        Self(dec!(87000))
    }

    /// Returns the rate in won per point
    pub fn won_per_point(&self) -> Decimal {
        self.0
    }

    /// Converts a relative weight into a payment amount
    pub fn amount_for(&self, relative_weight: Decimal) -> Money {
        Money::new(relative_weight * self.0)
    }
}

impl fmt::Display for PointRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₩{}/point", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_add_sub_round_trips(
            a in -1_000_000_000i64..1_000_000_000i64,
            b in -1_000_000_000i64..1_000_000_000i64
        ) {
            let ma = Money::from_won(a);
            let mb = Money::from_won(b);

            prop_assert_eq!((ma + mb) - mb, ma);
        }

        #[test]
        fn point_rate_scales_linearly(weight in 1u32..10_000u32) {
            let rate = PointRate::krw_2024();
            let w = Decimal::new(weight as i64, 2);

            prop_assert_eq!(rate.amount_for(w).amount(), w * dec!(87000));
        }
    }
}
