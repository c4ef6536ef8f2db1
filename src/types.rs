use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One flattened provider row: a single bookmaker's price for a single
/// outcome, as handed over by the upstream feed after deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuoteRecord {
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
    pub sport: SportKind,
    /// Raw market key from the source, e.g. "h2h", "totals", "spreads", "btts".
    pub market_key: String,
    /// Raw outcome label, e.g. a team name, "Draw", "Over 2.5", "Yes".
    pub outcome_label: String,
    /// Point value attached to totals/spreads quotes.
    pub point: Option<Decimal>,
    pub bookmaker: String,
    pub price: Option<Decimal>,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Parse a JSON array of flattened quote rows.
pub fn records_from_json(payload: &str) -> serde_json::Result<Vec<RawQuoteRecord>> {
    serde_json::from_str(payload)
}

/// Whether a fixture's head-to-head market settles with a draw option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportKind {
    /// Soccer-style 1X2: home / draw / away.
    ThreeWay,
    /// Moneyline sports: home / away only.
    TwoWay,
}

/// Canonical market shapes the engine understands.
///
/// Provider vocabularies map onto this closed set during classification;
/// a new market type means a new variant plus a classifier branch, not a
/// new type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarketType {
    #[serde(rename = "MATCH_RESULT_3WAY")]
    MatchResult3Way,
    #[serde(rename = "MONEYLINE_2WAY")]
    Moneyline2Way,
    #[serde(rename = "TOTALS")]
    Totals,
    #[serde(rename = "SPREADS")]
    Spreads,
    #[serde(rename = "BOTH_TEAMS_SCORE")]
    BothTeamsScore,
}

impl MarketType {
    /// The sides a group of this shape needs before consensus or
    /// arbitrage runs over it.
    pub fn required_sides(&self) -> &'static [Side] {
        match self {
            MarketType::MatchResult3Way => &[Side::Home, Side::Draw, Side::Away],
            MarketType::Moneyline2Way => &[Side::Home, Side::Away],
            MarketType::Totals => &[Side::Over, Side::Under],
            MarketType::Spreads => &[Side::Home, Side::Away],
            MarketType::BothTeamsScore => &[Side::Yes, Side::No],
        }
    }

    /// Whether quotes of this shape carry a line.
    pub fn has_line(&self) -> bool {
        matches!(self, MarketType::Totals | MarketType::Spreads)
    }
}

/// Canonical outcome of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
    Draw,
    Over,
    Under,
    Yes,
    No,
}

/// One bookmaker's price for one canonical outcome.
///
/// Quotes only exist with a resolved side; raw rows that fail
/// classification never become quotes.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub event_id: String,
    pub market_type: MarketType,
    pub side: Side,
    /// Present for totals/spreads, absent otherwise.
    pub line: Option<Decimal>,
    pub bookmaker: String,
    /// Decimal odds, strictly greater than 1.
    pub price: Decimal,
    /// Used only for staleness filtering; missing means fresh.
    pub observed_at: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            event_id: self.event_id.clone(),
            market_type: self.market_type,
            line: self.line,
        }
    }
}

/// Identity of one market group: quotes on different lines never mix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub event_id: String,
    pub market_type: MarketType,
    pub line: Option<Decimal>,
}

/// Best available price for one side of a group.
#[derive(Debug, Clone, Serialize)]
pub struct BestPrice {
    pub side: Side,
    pub price: Decimal,
    pub bookmaker: String,
    /// Gap to the next-best quote for the same side; `None` when the
    /// side has a single quote.
    pub margin_over_next: Option<Decimal>,
}

/// Margin-free consensus price for one side of a complete group.
#[derive(Debug, Clone, Serialize)]
pub struct FairPrice {
    pub side: Side,
    /// Mean implied probability across every book quoting the side.
    pub consensus_prob: Decimal,
    pub fair_price: Decimal,
    /// Value of the best available price versus consensus, in percent.
    pub edge_pct: Decimal,
}

/// One leg of a reported arbitrage.
#[derive(Debug, Clone, Serialize)]
pub struct ArbSide {
    pub side: Side,
    pub price: Decimal,
    pub bookmaker: String,
    pub stake: Decimal,
    pub payout: Decimal,
}

/// A cross-book price set whose implied probabilities sum below 1.
#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageOpportunity {
    pub sides: Vec<ArbSide>,
    pub sum_implied_probability: Decimal,
    pub roi_pct: Decimal,
}

/// Derived 2-outcome bet covering two of the three 1X2 outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DoubleChanceSide {
    #[serde(rename = "HOME_OR_DRAW")]
    HomeOrDraw,
    #[serde(rename = "HOME_OR_AWAY")]
    HomeOrAway,
    #[serde(rename = "DRAW_OR_AWAY")]
    DrawOrAway,
}

impl DoubleChanceSide {
    pub fn constituents(&self) -> (Side, Side) {
        match self {
            DoubleChanceSide::HomeOrDraw => (Side::Home, Side::Draw),
            DoubleChanceSide::HomeOrAway => (Side::Home, Side::Away),
            DoubleChanceSide::DrawOrAway => (Side::Draw, Side::Away),
        }
    }
}

/// Price for a derived double-chance outcome.
#[derive(Debug, Clone, Serialize)]
pub struct DoubleChancePrice {
    pub side: DoubleChanceSide,
    pub price: Decimal,
    pub bookmaker: String,
}

/// One leg of a pairwise double-chance arbitrage.
#[derive(Debug, Clone, Serialize)]
pub struct DoubleChanceArbSide {
    pub side: DoubleChanceSide,
    pub price: Decimal,
    pub bookmaker: String,
    pub stake: Decimal,
    pub payout: Decimal,
}

/// A profitable pair among the three derived double-chance prices.
#[derive(Debug, Clone, Serialize)]
pub struct DoubleChanceArb {
    pub sides: [DoubleChanceArbSide; 2],
    pub sum_implied_probability: Decimal,
    pub roi_pct: Decimal,
}

/// A single book's margin over a complete group, in percent.
#[derive(Debug, Clone, Serialize)]
pub struct BookOverround {
    pub bookmaker: String,
    pub overround_pct: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_wire_vocabulary() {
        assert_eq!(serde_json::to_string(&Side::Home).unwrap(), "\"HOME\"");
        assert_eq!(serde_json::to_string(&Side::Over).unwrap(), "\"OVER\"");
        assert_eq!(
            serde_json::to_string(&MarketType::MatchResult3Way).unwrap(),
            "\"MATCH_RESULT_3WAY\""
        );
        assert_eq!(
            serde_json::to_string(&DoubleChanceSide::DrawOrAway).unwrap(),
            "\"DRAW_OR_AWAY\""
        );
    }

    #[test]
    fn test_required_sides_per_shape() {
        assert_eq!(MarketType::MatchResult3Way.required_sides().len(), 3);
        assert_eq!(MarketType::Moneyline2Way.required_sides().len(), 2);
        assert_eq!(MarketType::Totals.required_sides().len(), 2);
        assert!(MarketType::Spreads.has_line());
        assert!(!MarketType::BothTeamsScore.has_line());
    }

    #[test]
    fn test_records_from_json() {
        let payload = r#"[
            {
                "event_id": "ev1",
                "home_team": "Arsenal",
                "away_team": "Chelsea",
                "sport": "three_way",
                "market_key": "h2h",
                "outcome_label": "Arsenal",
                "point": null,
                "bookmaker": "PaddyPower",
                "price": "2.10",
                "observed_at": "2024-09-01T12:00:00Z"
            }
        ]"#;

        let records = records_from_json(payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sport, SportKind::ThreeWay);
        assert_eq!(records[0].price, Some(rust_decimal_macros::dec!(2.10)));
        assert!(records[0].observed_at.is_some());
    }
}
