//! Arbitrage detection over best-price sets.
//!
//! The same sum-of-inverses test covers 2-way and 3-way shapes; only
//! the required side count differs. Line-grouped markets (totals,
//! spreads) arrive here already split per line, so each line is its own
//! independent 2-way check.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::EngineError;
use crate::prob;
use crate::stakes;
use crate::types::{ArbSide, ArbitrageOpportunity, BestPrice, MarketType};

/// Check one best-price set for a guaranteed profit.
///
/// Returns `Ok(None)` when any required side is missing, when implied
/// probabilities sum to 1 or more, or when the ROI falls under the
/// caller's reporting threshold. None of those are errors; a market
/// without an arbitrage is the normal case.
pub fn find_arbitrage(
    market_type: MarketType,
    best: &[BestPrice],
    bankroll: Decimal,
    min_roi_pct: Decimal,
) -> Result<Option<ArbitrageOpportunity>, EngineError> {
    let mut picked = Vec::with_capacity(market_type.required_sides().len());
    for &side in market_type.required_sides() {
        match best.iter().find(|b| b.side == side) {
            Some(b) => picked.push(b),
            None => return Ok(None),
        }
    }

    let mut sum_implied = Decimal::ZERO;
    for b in &picked {
        match prob::implied_probability(b.price) {
            Some(p) => sum_implied += p,
            None => return Ok(None),
        }
    }

    if sum_implied >= Decimal::ONE {
        return Ok(None);
    }

    let roi_pct = (Decimal::ONE - sum_implied) * dec!(100);
    if roi_pct < min_roi_pct {
        debug!("arbitrage below ROI threshold: {}% < {}%", roi_pct, min_roi_pct);
        return Ok(None);
    }

    let prices: Vec<Decimal> = picked.iter().map(|b| b.price).collect();
    let plan = stakes::allocate(bankroll, &prices)?;

    let sides = picked
        .iter()
        .zip(plan.stakes.iter().zip(plan.payouts.iter()))
        .map(|(b, (stake, payout))| ArbSide {
            side: b.side,
            price: b.price,
            bookmaker: b.bookmaker.clone(),
            stake: *stake,
            payout: *payout,
        })
        .collect();

    Ok(Some(ArbitrageOpportunity {
        sides,
        sum_implied_probability: sum_implied,
        roi_pct,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    const TOLERANCE: Decimal = dec!(0.000001);

    fn best(side: Side, book: &str, price: Decimal) -> BestPrice {
        BestPrice {
            side,
            price,
            bookmaker: book.to_string(),
            margin_over_next: None,
        }
    }

    #[test]
    fn test_overbroke_market_reports_nothing() {
        // Home 2.10 / Draw 3.40 / Away 4.20 sums to ~1.0084.
        let set = vec![
            best(Side::Home, "A", dec!(2.10)),
            best(Side::Draw, "B", dec!(3.40)),
            best(Side::Away, "C", dec!(4.20)),
        ];
        let result =
            find_arbitrage(MarketType::MatchResult3Way, &set, dec!(100), Decimal::ZERO).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_three_way_arbitrage_detected() {
        // Home 2.40 / Draw 3.60 / Away 4.50 sums to ~0.9167.
        let set = vec![
            best(Side::Home, "A", dec!(2.40)),
            best(Side::Draw, "B", dec!(3.60)),
            best(Side::Away, "C", dec!(4.50)),
        ];
        let arb = find_arbitrage(MarketType::MatchResult3Way, &set, dec!(100), Decimal::ZERO)
            .unwrap()
            .unwrap();

        assert!(arb.sum_implied_probability < Decimal::ONE);
        assert!((arb.roi_pct - dec!(8.33)).abs() < dec!(0.01));

        let total_stake: Decimal = arb.sides.iter().map(|s| s.stake).sum();
        assert!((total_stake - dec!(100)).abs() < TOLERANCE);

        let first_payout = arb.sides[0].payout;
        for side in &arb.sides {
            assert!((side.payout - first_payout).abs() < TOLERANCE);
        }
        assert!((first_payout - dec!(109.09)).abs() < dec!(0.01));
    }

    #[test]
    fn test_two_way_arbitrage_detected() {
        // 1/2.08 + 1/2.10 = 0.9569..., a 4.3% return.
        let set = vec![
            best(Side::Over, "A", dec!(2.08)),
            best(Side::Under, "B", dec!(2.10)),
        ];
        let arb = find_arbitrage(MarketType::Totals, &set, dec!(100), Decimal::ZERO)
            .unwrap()
            .unwrap();
        assert!((arb.roi_pct - dec!(4.30)).abs() < dec!(0.01));
        assert_eq!(arb.sides.len(), 2);
    }

    #[test]
    fn test_missing_side_reports_nothing() {
        let set = vec![best(Side::Over, "A", dec!(1.95))];
        let result = find_arbitrage(MarketType::Totals, &set, dec!(100), Decimal::ZERO).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_roi_threshold_filters_thin_arbs() {
        // 1/2.02 + 1/2.02 = 0.9901, just under a 1% return.
        let set = vec![
            best(Side::Over, "A", dec!(2.02)),
            best(Side::Under, "B", dec!(2.02)),
        ];
        let kept = find_arbitrage(MarketType::Totals, &set, dec!(100), Decimal::ZERO).unwrap();
        assert!(kept.is_some());

        let filtered = find_arbitrage(MarketType::Totals, &set, dec!(100), dec!(1.0)).unwrap();
        assert!(filtered.is_none());
    }

    #[test]
    fn test_strict_inequality_at_break_even() {
        // 1/2 + 1/2 = 1 exactly: no profit, nothing reported.
        let set = vec![
            best(Side::Over, "A", dec!(2.0)),
            best(Side::Under, "B", dec!(2.0)),
        ];
        let result = find_arbitrage(MarketType::Totals, &set, dec!(100), Decimal::ZERO).unwrap();
        assert!(result.is_none());
    }
}
