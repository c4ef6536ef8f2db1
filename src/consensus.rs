//! Margin-free consensus pricing.
//!
//! The fair price averages implied probabilities across every book
//! quoting a side, not just the best one, so a single generous outlier
//! cannot drag the benchmark toward itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::market::MarketGroup;
use crate::prob;
use crate::types::{BestPrice, FairPrice};

/// Fair prices for a complete group, one per required side.
///
/// Returns `None` when the group is incomplete or when any side's mean
/// implied probability falls outside `(0, 1)`, which only happens on
/// corrupt input and excludes the whole group from fair pricing.
pub fn fair_prices(group: &MarketGroup, best: &[BestPrice]) -> Option<Vec<FairPrice>> {
    if !group.is_complete() {
        return None;
    }

    let mut out = Vec::with_capacity(group.required_sides().len());
    for &side in group.required_sides() {
        let mut sum = Decimal::ZERO;
        let mut count = 0u32;
        for quote in group.quotes_for(side) {
            sum += prob::implied_probability(quote.price)?;
            count += 1;
        }
        // count > 0: the group is complete, so every required side has a quote.
        let consensus_prob = sum / Decimal::from(count);

        let fair = match prob::fair_price(consensus_prob) {
            Some(f) => f,
            None => {
                warn!(
                    "{}: degenerate consensus probability {} for {:?}, skipping fair prices",
                    group.key.event_id, consensus_prob, side
                );
                return None;
            }
        };

        let best_price = best.iter().find(|b| b.side == side)?.price;
        let edge_pct = (best_price / fair - Decimal::ONE) * dec!(100);

        out.push(FairPrice {
            side,
            consensus_prob,
            fair_price: fair,
            edge_pct,
        });
    }

    Some(out)
}
