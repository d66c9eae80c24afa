//! Money helpers using rust_decimal
//!
//! Amounts travel as `f64` on the wire; every sum is done in `Decimal` and
//! rounded back to 2 places so cached totals never drift.

use rust_decimal::prelude::*;

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Exact conversion; `None` for NaN, infinities and values outside the
/// `Decimal` range
pub fn try_to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Lenient conversion for amounts already on an order
///
/// NaN becomes zero; values beyond the `Decimal` range saturate.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if let Some(d) = try_to_decimal(value) {
        d
    } else if value.is_nan() {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}

/// Convert back to f64, rounded half away from zero to 2 places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price * quantity`, saturating at `Decimal::MAX`
pub fn line_total(unit_price: f64, quantity: u32) -> Decimal {
    to_decimal(unit_price).saturating_mul(Decimal::from(quantity))
}

/// Saturating sum
pub fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Whether two amounts agree within one cent
pub fn amounts_match(a: f64, b: f64) -> bool {
    to_decimal(a).saturating_sub(to_decimal(b)).abs() < MONEY_TOLERANCE
}
