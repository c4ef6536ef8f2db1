//! Decimal odds to implied probability conversions, and back.

use rust_decimal::Decimal;

/// Implied probability of a decimal price: `1 / price`.
///
/// Guarded against non-positive prices so corrupt rows can never divide
/// by zero. Valid quotes (`price > 1`) always land in `(0, 1)`.
pub fn implied_probability(price: Decimal) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        return None;
    }
    Some(Decimal::ONE / price)
}

/// Margin-free price for a probability, defined only on `(0, 1)`.
pub fn fair_price(probability: Decimal) -> Option<Decimal> {
    if probability <= Decimal::ZERO || probability >= Decimal::ONE {
        return None;
    }
    Some(Decimal::ONE / probability)
}
