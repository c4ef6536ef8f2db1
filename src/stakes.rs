//! Constant-payout stake allocation.

use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::prob;

/// Stake split for one opportunity: one stake and payout per price, in
/// input order.
#[derive(Debug, Clone, PartialEq)]
pub struct StakePlan {
    pub stakes: Vec<Decimal>,
    pub payouts: Vec<Decimal>,
    pub sum_implied: Decimal,
}

/// Split a bankroll across mutually exclusive prices so the payout is
/// the same whichever side wins.
///
/// `stake(side) = (bankroll / price(side)) / sum_implied`. The stakes
/// sum to the bankroll and every payout equals `bankroll / sum_implied`;
/// that constant payout is exactly what makes a sub-1 implied sum
/// risk-free.
pub fn allocate(bankroll: Decimal, prices: &[Decimal]) -> Result<StakePlan, EngineError> {
    if bankroll <= Decimal::ZERO {
        return Err(EngineError::InvalidBankroll(bankroll));
    }

    let mut sum_implied = Decimal::ZERO;
    for &price in prices {
        match prob::implied_probability(price) {
            Some(p) => sum_implied += p,
            None => return Err(EngineError::InvalidPrice(price)),
        }
    }

    let mut stakes = Vec::with_capacity(prices.len());
    let mut payouts = Vec::with_capacity(prices.len());
    for &price in prices {
        let stake = (bankroll / price) / sum_implied;
        stakes.push(stake);
        payouts.push(stake * price);
    }

    Ok(StakePlan {
        stakes,
        payouts,
        sum_implied,
    })
}
