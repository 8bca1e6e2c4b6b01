//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64`. Sums and products are carried
//! out in `Decimal` and converted back rounded to 2 decimal places.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum a sequence of amounts without accumulating float error
pub fn sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Unit amount multiplied by a whole quantity
pub fn times(amount: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(amount) * Decimal::from(quantity))
}

/// Arithmetic mean, 0 for an empty sequence
pub fn mean<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut total = Decimal::ZERO;
    let mut n = 0u64;
    for a in amounts {
        total += to_decimal(a);
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    to_f64(total / Decimal::from(n))
}
