//! Derived double-chance markets.
//!
//! Double-chance prices are never raw quotes. They are derived from a
//! complete 1X2 best-price set: each pair of outcomes takes the better
//! of its two constituent best prices, since holding either constituent
//! bet covers the double-chance outcome.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EngineError;
use crate::prob;
use crate::stakes;
use crate::types::{
    BestPrice, DoubleChanceArb, DoubleChanceArbSide, DoubleChancePrice, DoubleChanceSide, Side,
};

const PAIRS: [DoubleChanceSide; 3] = [
    DoubleChanceSide::HomeOrDraw,
    DoubleChanceSide::HomeOrAway,
    DoubleChanceSide::DrawOrAway,
];

/// Derive the three double-chance prices from a 1X2 best-price set.
///
/// Requires best prices for all of home, draw and away; anything less
/// returns `None`. When the two constituent prices tie, the first
/// constituent in pair order wins, keeping the derivation deterministic.
pub fn derive(best: &[BestPrice]) -> Option<[DoubleChancePrice; 3]> {
    let find = |side: Side| best.iter().find(|b| b.side == side);
    let home = find(Side::Home)?;
    let draw = find(Side::Draw)?;
    let away = find(Side::Away)?;

    let pick = |dc: DoubleChanceSide| {
        let (first, second) = match dc {
            DoubleChanceSide::HomeOrDraw => (home, draw),
            DoubleChanceSide::HomeOrAway => (home, away),
            DoubleChanceSide::DrawOrAway => (draw, away),
        };
        let chosen = if first.price >= second.price { first } else { second };
        DoubleChancePrice {
            side: dc,
            price: chosen.price,
            bookmaker: chosen.bookmaker.clone(),
        }
    };

    Some([pick(PAIRS[0]), pick(PAIRS[1]), pick(PAIRS[2])])
}

/// Pairwise 2-way arbitrage among the derived double-chance prices.
///
/// Each pair is treated as its own independent 2-outcome market and
/// checked with the same sum-of-inverses formula as raw markets.
pub fn pairwise_arbs(
    derived: &[DoubleChancePrice; 3],
    bankroll: Decimal,
    min_roi_pct: Decimal,
) -> Result<Vec<DoubleChanceArb>, EngineError> {
    let mut out = Vec::new();

    for i in 0..derived.len() {
        for j in (i + 1)..derived.len() {
            let (a, b) = (&derived[i], &derived[j]);
            let sum_implied = match (
                prob::implied_probability(a.price),
                prob::implied_probability(b.price),
            ) {
                (Some(pa), Some(pb)) => pa + pb,
                _ => continue,
            };
            if sum_implied >= Decimal::ONE {
                continue;
            }
            let roi_pct = (Decimal::ONE - sum_implied) * dec!(100);
            if roi_pct < min_roi_pct {
                continue;
            }

            let plan = stakes::allocate(bankroll, &[a.price, b.price])?;
            out.push(DoubleChanceArb {
                sides: [
                    DoubleChanceArbSide {
                        side: a.side,
                        price: a.price,
                        bookmaker: a.bookmaker.clone(),
                        stake: plan.stakes[0],
                        payout: plan.payouts[0],
                    },
                    DoubleChanceArbSide {
                        side: b.side,
                        price: b.price,
                        bookmaker: b.bookmaker.clone(),
                        stake: plan.stakes[1],
                        payout: plan.payouts[1],
                    },
                ],
                sum_implied_probability: sum_implied,
                roi_pct,
            });
        }
    }

    Ok(out)
}
