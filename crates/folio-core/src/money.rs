//! # Money Module
//!
//! Provides the `Money` and `Percentage` types and currency display.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE ROUNDING PROBLEM                                                   │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  With integer cents, every step rounds:                                 │
//! │    315.00 × 16.5% = 51.975 → 51.98 (before the total is known)         │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimals                                         │
//! │    315 × 16.5 / 100 = 51.975 exactly                                   │
//! │    Rounded to 51.98 only when printed                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::{Money, Percentage};
//! use rust_decimal::Decimal;
//!
//! let subtotal = Money::from(315);
//! let vat = Percentage::from(Decimal::new(165, 1)); // 16.5%
//!
//! assert_eq!(vat.of(subtotal), Money::from(Decimal::new(51975, 3)));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use crate::DEFAULT_CURRENCY_CODE;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the document currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values pass through untouched so that
///   bad input stays visible instead of being clamped
/// - **Saturating arithmetic**: operators never panic on overflow
/// - **No rounding**: values are exact until [`Money::round_for_display`]
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► LineItem.total ──► Document.subtotal           │
/// │                                                  │                      │
/// │                          discount % ─────────────┤                      │
/// │                          tax rate % ─────────────┤                      │
/// │                                                  ▼                      │
/// │                        Document.tax_amount, Document.total              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let unit_price = Money::from(50);
    /// assert_eq!(unit_price.times(Decimal::from(3)), Money::from(150));
    /// ```
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Money {
        Money(self.0.saturating_mul(quantity))
    }

    /// Rounds half away from zero to `decimals` places.
    ///
    /// Only call this when presenting a value; calculations keep full
    /// precision.
    pub fn round_for_display(&self, decimals: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl From<i32> for Money {
    fn from(amount: i32) -> Self {
        Money(Decimal::from(amount))
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }
}

impl From<u32> for Money {
    fn from(amount: u32) -> Self {
        Money(Decimal::from(amount))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A rate expressed in percent: `16.5` means 16.5%.
///
/// Tax rates and discounts are both percentages. The calculator accepts
/// any value; range checks live in [`crate::validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage from a percent value (`16.5` = 16.5%).
    #[inline]
    pub const fn new(percent: Decimal) -> Self {
        Percentage(percent)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Returns the value in percent.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies the rate to an amount: `amount × rate / 100`.
    ///
    /// The division is by the constant 100, so this cannot fail.
    pub fn of(&self, amount: Money) -> Money {
        Money(amount.0.saturating_mul(self.0) / Decimal::ONE_HUNDRED)
    }
}

impl From<Decimal> for Percentage {
    fn from(percent: Decimal) -> Self {
        Percentage(percent)
    }
}

impl From<i32> for Percentage {
    fn from(percent: i32) -> Self {
        Percentage(Decimal::from(percent))
    }
}

impl From<u32> for Percentage {
    fn from(percent: u32) -> Self {
        Percentage(Decimal::from(percent))
    }
}

impl FromStr for Percentage {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim().trim_end_matches('%')).map(Percentage)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Currency Display
// =============================================================================

/// How amounts are printed on documents and in emails.
///
/// ## Example
/// ```rust
/// use folio_core::money::{CurrencyFormat, Money};
/// use rust_decimal::Decimal;
///
/// let mwk = CurrencyFormat::default();
/// assert_eq!(mwk.format(Money::from(Decimal::new(366975, 3))), "MWK 366.98");
/// assert_eq!(mwk.format(Money::from(1_234_567)), "MWK 1,234,567.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Currency code (ISO 4217)
    pub code: String,

    /// Number of decimal places shown
    pub decimals: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            code: DEFAULT_CURRENCY_CODE.to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormat {
    /// Creates a format for the given currency code with 2 decimals.
    pub fn new(code: impl Into<String>) -> Self {
        CurrencyFormat {
            code: code.into(),
            decimals: 2,
        }
    }

    /// Formats an amount as `CODE 1,234.50`.
    pub fn format(&self, amount: Money) -> String {
        let rounded = amount.round_for_display(self.decimals).amount();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let mut fixed = rounded.abs();
        fixed.rescale(self.decimals);
        let text = fixed.to_string();

        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (text.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!(
            "{}{} {}{}",
            if negative { "-" } else { "" },
            self.code,
            grouped,
            frac.map(|f| format!(".{f}")).unwrap_or_default()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
