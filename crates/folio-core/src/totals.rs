//! # Totals Module
//!
//! The financial calculator: subtotal, discount, tax and grand total for a
//! set of line items.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  items ──► subtotal = Σ quantity × unit_price                           │
//! │                 │                                                       │
//! │                 ├──► discount_amount = subtotal × discount / 100        │
//! │                 ▼                                                       │
//! │            taxable = subtotal − discount_amount                         │
//! │                 │                                                       │
//! │                 ├──► tax_amount = taxable × tax_rate / 100              │
//! │                 ▼                                                       │
//! │            total = taxable + tax_amount                                 │
//! │                                                                         │
//! │  Discount before tax. No rounding between steps.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator does not validate. A negative quantity, or a discount
//! above 100%, flows through the formula and shows up in the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percentage};
use crate::types::LineItem;

// =============================================================================
// Inputs
// =============================================================================

/// Anything exposing a quantity and a unit price.
pub trait Priced {
    fn quantity(&self) -> Decimal;
    fn unit_price(&self) -> Money;
}

impl Priced for LineItem {
    #[inline]
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    #[inline]
    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl<T: Priced> Priced for &T {
    #[inline]
    fn quantity(&self) -> Decimal {
        (*self).quantity()
    }

    #[inline]
    fn unit_price(&self) -> Money {
        (*self).unit_price()
    }
}

/// A bare `{quantity, unit_price}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAmounts {
    pub quantity: Decimal,
    pub unit_price: Money,
}

impl ItemAmounts {
    pub const fn new(quantity: Decimal, unit_price: Money) -> Self {
        ItemAmounts {
            quantity,
            unit_price,
        }
    }
}

impl Priced for ItemAmounts {
    #[inline]
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    #[inline]
    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Result of [`compute_totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[ts(as = "String")]
    pub subtotal: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total: Money,
}

/// Every intermediate value, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBreakdown {
    #[ts(as = "String")]
    pub subtotal: Money,
    #[ts(as = "String")]
    pub discount_amount: Money,
    #[ts(as = "String")]
    pub taxable_amount: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total: Money,
}

impl From<TotalsBreakdown> for Totals {
    fn from(b: TotalsBreakdown) -> Self {
        Totals {
            subtotal: b.subtotal,
            tax_amount: b.tax_amount,
            total: b.total,
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// `Σ quantity × unit_price`. Zero for an empty slice.
pub fn subtotal<I: Priced>(items: &[I]) -> Money {
    items
        .iter()
        .map(|item| item.unit_price().times(item.quantity()))
        .sum()
}

/// `subtotal × discount / 100`.
///
/// Anything that displays a discount amount must use this, so the shown
/// figure matches the one the total was built from.
#[inline]
pub fn discount_amount(subtotal: Money, discount: Percentage) -> Money {
    discount.of(subtotal)
}

/// Runs the full calculation and keeps every step.
pub fn breakdown<I: Priced>(items: &[I], tax_rate: Percentage, discount: Percentage) -> TotalsBreakdown {
    let subtotal = subtotal(items);
    let discount_amount = discount_amount(subtotal, discount);
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = tax_rate.of(taxable_amount);

    TotalsBreakdown {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total: taxable_amount + tax_amount,
    }
}

/// Computes subtotal, tax amount and total.
///
/// Pure and infallible. See the module docs for the formula.
///
/// ## Example
/// ```rust
/// use folio_core::totals::{compute_totals, ItemAmounts};
/// use folio_core::{Money, Percentage};
/// use rust_decimal::Decimal;
///
/// let items = [
///     ItemAmounts::new(Decimal::from(3), Money::from(50)),
///     ItemAmounts::new(Decimal::from(1), Money::from(200)),
/// ];
/// let totals = compute_totals(&items, Percentage::from(Decimal::new(165, 1)), Percentage::from(10));
///
/// assert_eq!(totals.subtotal, Money::from(350));
/// assert_eq!(totals.tax_amount, Money::from(Decimal::new(51975, 3)));
/// assert_eq!(totals.total, Money::from(Decimal::new(366975, 3)));
/// ```
pub fn compute_totals<I: Priced>(items: &[I], tax_rate: Percentage, discount: Percentage) -> Totals {
    breakdown(items, tax_rate, discount).into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal) -> ItemAmounts {
        ItemAmounts::new(quantity, Money::from(unit_price))
    }

    fn pct(value: Decimal) -> Percentage {
        Percentage::from(value)
    }

    #[test]
    fn test_single_item_with_tax() {
        let totals = compute_totals(&[item(dec!(2), dec!(100))], pct(dec!(16.5)), Percentage::zero());

        assert_eq!(totals.subtotal, Money::from(200));
        assert_eq!(totals.tax_amount, Money::from(33));
        assert_eq!(totals.total, Money::from(233));
    }

    #[test]
    fn test_discount_without_tax() {
        let totals = compute_totals(&[item(dec!(1), dec!(1000))], Percentage::zero(), pct(dec!(10)));

        assert_eq!(totals.subtotal, Money::from(1000));
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.total, Money::from(900));
    }

    #[test]
    fn test_discount_applied_before_tax() {
        let items = [item(dec!(3), dec!(50)), item(dec!(1), dec!(200))];
        let b = breakdown(&items, pct(dec!(16.5)), pct(dec!(10)));

        assert_eq!(b.subtotal, Money::from(350));
        assert_eq!(b.discount_amount, Money::from(35));
        assert_eq!(b.taxable_amount, Money::from(315));
        assert_eq!(b.tax_amount, Money::from(dec!(51.975)));
        assert_eq!(b.total, Money::from(dec!(366.975)));

        let totals = compute_totals(&items, pct(dec!(16.5)), pct(dec!(10)));
        assert_eq!(totals, Totals::from(b));
    }

    #[test]
    fn test_empty_items_are_zero() {
        let none: [ItemAmounts; 0] = [];
        for (tax, discount) in [(dec!(0), dec!(0)), (dec!(16.5), dec!(10)), (dec!(100), dec!(100))] {
            let totals = compute_totals(&none, pct(tax), pct(discount));
            assert_eq!(totals, Totals::default());
        }
    }

    #[test]
    fn test_negative_inputs_pass_through() {
        let totals = compute_totals(&[item(dec!(-2), dec!(10))], pct(dec!(10)), Percentage::zero());

        assert_eq!(totals.subtotal, Money::from(-20));
        assert_eq!(totals.tax_amount, Money::from(-2));
        assert_eq!(totals.total, Money::from(-22));
    }

    #[test]
    fn test_discount_over_100_goes_negative() {
        let totals = compute_totals(&[item(dec!(1), dec!(100))], pct(dec!(10)), pct(dec!(150)));

        assert_eq!(totals.subtotal, Money::from(100));
        assert_eq!(totals.tax_amount, Money::from(-5));
        assert_eq!(totals.total, Money::from(-55));
    }

    #[test]
    fn test_line_items_use_quantity_and_price_not_cached_total() {
        let mut li = LineItem::new("Stale", dec!(1), Money::from(10));
        li.quantity = dec!(5); // total still says 10

        let totals = compute_totals(&[li], Percentage::zero(), Percentage::zero());
        assert_eq!(totals.subtotal, Money::from(50));
    }

    #[test]
    fn test_no_intermediate_rounding() {
        // 0.333 × 3 at 1% tax: a per-step 2dp round would give 0.01
        let totals = compute_totals(&[item(dec!(3), dec!(0.333))], pct(dec!(1)), Percentage::zero());
        assert_eq!(totals.subtotal, Money::from(dec!(0.999)));
        assert_eq!(totals.tax_amount, Money::from(dec!(0.00999)));
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn quantity() -> impl Strategy<Value = Decimal> {
        (0i64..100_000).prop_map(|v| Decimal::new(v, 2))
    }

    fn price() -> impl Strategy<Value = Decimal> {
        (0i64..100_000_000).prop_map(|v| Decimal::new(v, 2))
    }

    fn percent() -> impl Strategy<Value = Decimal> {
        (0i64..=1000).prop_map(|v| Decimal::new(v, 1))
    }

    fn items() -> impl Strategy<Value = Vec<ItemAmounts>> {
        prop::collection::vec(
            (quantity(), price()).prop_map(|(q, p)| item(q, p)),
            1..8,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_subtotal_is_exact_sum(items in items(), tax in percent(), discount in percent()) {
            let expected = items
                .iter()
                .fold(Decimal::ZERO, |acc, i| acc + i.quantity * i.unit_price.amount());
            let totals = compute_totals(&items, pct(tax), pct(discount));
            prop_assert_eq!(totals.subtotal.amount(), expected);
        }

        #[test]
        fn prop_zero_tax_means_total_is_discounted_subtotal(items in items(), discount in percent()) {
            let totals = compute_totals(&items, Percentage::zero(), pct(discount));
            prop_assert!(totals.tax_amount.is_zero());
            prop_assert_eq!(
                totals.total,
                totals.subtotal - discount_amount(totals.subtotal, pct(discount))
            );
        }

        #[test]
        fn prop_zero_discount_means_total_is_subtotal_plus_tax(items in items(), tax in percent()) {
            let totals = compute_totals(&items, pct(tax), Percentage::zero());
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        }

        #[test]
        fn prop_total_identity(items in items(), tax in percent(), discount in percent()) {
            let totals = compute_totals(&items, pct(tax), pct(discount));
            let discount_amount = discount_amount(totals.subtotal, pct(discount));
            prop_assert_eq!(totals.total, totals.subtotal - discount_amount + totals.tax_amount);
        }

        #[test]
        fn prop_idempotent(items in items(), tax in percent(), discount in percent()) {
            let first = compute_totals(&items, pct(tax), pct(discount));
            let second = compute_totals(&items, pct(tax), pct(discount));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_monotonic_in_quantity(
            items in items(),
            index in any::<prop::sample::Index>(),
            extra in quantity(),
            tax in percent(),
            discount in percent(),
        ) {
            let before = compute_totals(&items, pct(tax), pct(discount));

            let mut bumped = items.clone();
            let i = index.index(bumped.len());
            bumped[i].quantity += extra;
            let after = compute_totals(&bumped, pct(tax), pct(discount));

            prop_assert!(after.subtotal >= before.subtotal);
            prop_assert!(after.tax_amount >= before.tax_amount);
            prop_assert!(after.total >= before.total);
        }
    }
}
