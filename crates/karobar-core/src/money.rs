//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All amounts are stored as integer paisa (hundredths of a rupee). The only
//! place fractional values appear is when a price is extended by a fractional
//! quantity (sub-unit sales: 6 pieces out of a 12-piece box); the product is
//! rounded to the nearest paisa at that single point.
//!
//! ## Usage
//! ```rust
//! use karobar_core::money::Money;
//!
//! // Create from paisa (preferred)
//! let price = Money::from_paisa(1550); // Rs 15.50
//!
//! // Extend by a fractional quantity, rounded to the paisa
//! let line = price.multiply_quantity(2.5);
//! assert_eq!(line.paisa(), 3875);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paisa).
///
/// ## Design
/// - **i64 (signed)**: amount due may go negative (overpayment / credit)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Full serde support**: serializes as a bare integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa (the smallest currency unit).
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from rupees and paisa.
    ///
    /// ## Example
    /// ```rust
    /// use karobar_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // Rs 10.99
    /// assert_eq!(price.paisa(), 1099);
    ///
    /// let credit = Money::from_major_minor(-5, 50); // -Rs 5.50
    /// assert_eq!(credit.paisa(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Creates a Money value from a fractional paisa amount, rounding
    /// half-away-from-zero to the nearest paisa.
    ///
    /// This is the single rounding point for quantity-extended amounts
    /// (e.g. cost of 6 pieces at Rs 120.00 / 12 per box).
    #[inline]
    pub fn from_paisa_f64(paisa: f64) -> Self {
        Money(paisa.round() as i64)
    }

    /// Creates a Money value from a decimal rupee amount, e.g. a catalog
    /// price entered as `120.50`.
    #[inline]
    pub fn from_rupees_f64(rupees: f64) -> Self {
        Money::from_paisa_f64(rupees * 100.0)
    }

    /// Returns the value in paisa.
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Extends this amount by a (possibly fractional) quantity, rounding
    /// to the nearest paisa.
    ///
    /// ## Example
    /// ```rust
    /// use karobar_core::money::Money;
    ///
    /// let per_piece = Money::from_paisa(150); // Rs 1.50
    /// assert_eq!(per_piece.multiply_quantity(6.0).paisa(), 900);
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: f64) -> Self {
        Money::from_paisa_f64(self.0 as f64 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// For debugging and statements; the presentation layer handles
/// localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.rupees().abs(), self.paisa_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summation over iterators of Money (for totalling line items).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paisa() {
        let money = Money::from_paisa(1099);
        assert_eq!(money.paisa(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paisa_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).paisa(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).paisa(), -550);
    }

    #[test]
    fn test_from_rupees_f64() {
        assert_eq!(Money::from_rupees_f64(120.5).paisa(), 12_050);
        assert_eq!(Money::from_rupees_f64(0.015).paisa(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paisa(1099)), "Rs 10.99");
        assert_eq!(format!("{}", Money::from_paisa(500)), "Rs 5.00");
        assert_eq!(format!("{}", Money::from_paisa(-550)), "-Rs 5.50");
        assert_eq!(format!("{}", Money::from_paisa(0)), "Rs 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paisa(1000);
        let b = Money::from_paisa(500);

        assert_eq!((a + b).paisa(), 1500);
        assert_eq!((a - b).paisa(), 500);
        assert_eq!((-a).paisa(), -1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].iter().map(|p| Money::from_paisa(*p)).sum();
        assert_eq!(total.paisa(), 400);
    }

    #[test]
    fn test_multiply_fractional_quantity() {
        // 6 pieces at Rs 1.50 per piece
        assert_eq!(Money::from_paisa(150).multiply_quantity(6.0).paisa(), 900);
        // 2.5 boxes at Rs 15.50 per box
        assert_eq!(Money::from_paisa(1550).multiply_quantity(2.5).paisa(), 3875);
    }

    #[test]
    fn test_multiply_rounds_to_paisa() {
        // Rs 1.00 per piece, a third of a piece -> 33.33.. paisa -> 33
        assert_eq!(Money::from_paisa(100).multiply_quantity(1.0 / 3.0).paisa(), 33);
        // Negative amounts round away from zero symmetrically
        assert_eq!(Money::from_paisa(-100).multiply_quantity(1.0 / 3.0).paisa(), -33);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paisa(100).is_positive());
        assert!(Money::from_paisa(-100).is_negative());
        assert_eq!(Money::from_paisa(-100).abs().paisa(), 100);
    }
}
