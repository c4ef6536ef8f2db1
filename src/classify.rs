//! Maps raw provider outcome labels onto the canonical market model.
//!
//! Provider vocabularies are noisy. Anything that does not classify
//! cleanly is dropped, never defaulted: a quote with a guessed side is
//! worse than no quote at all.

use rust_decimal::Decimal;

use crate::types::{MarketType, Quote, RawQuoteRecord, Side, SportKind};

/// Canonical assignment for one raw outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub market_type: MarketType,
    pub side: Side,
    pub line: Option<Decimal>,
}

/// Classify a raw outcome label against its market key.
///
/// Team matching is exact string equality after trimming and
/// lower-casing. No fuzzy matching: an ambiguous or renamed team
/// surfaces as unclassified rather than silently mis-assigned.
pub fn classify_outcome(
    market_key: &str,
    label: &str,
    home_team: &str,
    away_team: &str,
    sport: SportKind,
    point: Option<Decimal>,
) -> Option<Classification> {
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }
    let home = home_team.trim().to_lowercase();
    let away = away_team.trim().to_lowercase();

    match market_key {
        "h2h" => {
            let market_type = match sport {
                SportKind::ThreeWay => MarketType::MatchResult3Way,
                SportKind::TwoWay => MarketType::Moneyline2Way,
            };
            let side = if label == home {
                Side::Home
            } else if label == away {
                Side::Away
            } else if label == "draw" && sport == SportKind::ThreeWay {
                Side::Draw
            } else {
                return None;
            };
            Some(Classification {
                market_type,
                side,
                line: None,
            })
        }
        "totals" => {
            // A totals quote without a line is meaningless.
            let line = point?;
            let side = if label.contains("over") {
                Side::Over
            } else if label.contains("under") {
                Side::Under
            } else {
                return None;
            };
            Some(Classification {
                market_type: MarketType::Totals,
                side,
                line: Some(line),
            })
        }
        "spreads" => {
            let line = point?;
            let side = if label == home {
                Side::Home
            } else if label == away {
                Side::Away
            } else {
                return None;
            };
            Some(Classification {
                market_type: MarketType::Spreads,
                side,
                line: Some(line),
            })
        }
        "btts" => {
            let side = match label.as_str() {
                "yes" => Side::Yes,
                "no" => Side::No,
                _ => return None,
            };
            Some(Classification {
                market_type: MarketType::BothTeamsScore,
                side,
                line: None,
            })
        }
        _ => None,
    }
}

/// Classify one pre-filtered raw record into a canonical quote.
///
/// Returns `None` when the record has no price or its label cannot be
/// resolved; the caller counts and logs drops.
pub fn classify_record(record: &RawQuoteRecord) -> Option<Quote> {
    let price = record.price?;
    let c = classify_outcome(
        &record.market_key,
        &record.outcome_label,
        &record.home_team,
        &record.away_team,
        record.sport,
        record.point,
    )?;

    Some(Quote {
        event_id: record.event_id.clone(),
        market_type: c.market_type,
        side: c.side,
        line: c.line,
        bookmaker: record.bookmaker.clone(),
        price,
        observed_at: record.observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn h2h(label: &str, sport: SportKind) -> Option<Classification> {
        classify_outcome("h2h", label, "Arsenal", "Chelsea", sport, None)
    }

    #[test]
    fn test_h2h_three_way() {
        let c = h2h("Arsenal", SportKind::ThreeWay).unwrap();
        assert_eq!(c.market_type, MarketType::MatchResult3Way);
        assert_eq!(c.side, Side::Home);
        assert_eq!(c.line, None);

        assert_eq!(h2h("chelsea", SportKind::ThreeWay).unwrap().side, Side::Away);
        assert_eq!(h2h("Draw", SportKind::ThreeWay).unwrap().side, Side::Draw);
    }

    #[test]
    fn test_h2h_two_way_has_no_draw() {
        let c = h2h("Arsenal", SportKind::TwoWay).unwrap();
        assert_eq!(c.market_type, MarketType::Moneyline2Way);
        assert_eq!(h2h("Draw", SportKind::TwoWay), None);
    }

    #[test]
    fn test_h2h_unknown_label_dropped() {
        // "Tie" is not the literal "draw"; no fuzzy rescue.
        assert_eq!(h2h("Tie", SportKind::ThreeWay), None);
        assert_eq!(h2h("Arsenal FC", SportKind::ThreeWay), None);
    }

    #[test]
    fn test_totals() {
        let c = classify_outcome(
            "totals",
            "Over 2.5",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            Some(dec!(2.5)),
        )
        .unwrap();
        assert_eq!(c.market_type, MarketType::Totals);
        assert_eq!(c.side, Side::Over);
        assert_eq!(c.line, Some(dec!(2.5)));

        let c = classify_outcome(
            "totals",
            "under",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            Some(dec!(3.5)),
        )
        .unwrap();
        assert_eq!(c.side, Side::Under);
    }

    #[test]
    fn test_totals_without_line_dropped() {
        let c = classify_outcome(
            "totals",
            "Over 2.5",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            None,
        );
        assert_eq!(c, None);
    }

    #[test]
    fn test_spreads() {
        let c = classify_outcome(
            "spreads",
            "Chelsea",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            Some(dec!(1.0)),
        )
        .unwrap();
        assert_eq!(c.market_type, MarketType::Spreads);
        assert_eq!(c.side, Side::Away);
        assert_eq!(c.line, Some(dec!(1.0)));

        let no_line = classify_outcome(
            "spreads",
            "Arsenal",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            None,
        );
        assert_eq!(no_line, None);
    }

    #[test]
    fn test_btts() {
        let yes = classify_outcome("btts", "Yes", "Arsenal", "Chelsea", SportKind::ThreeWay, None);
        assert_eq!(yes.unwrap().side, Side::Yes);
        let no = classify_outcome("btts", "NO", "Arsenal", "Chelsea", SportKind::ThreeWay, None);
        assert_eq!(no.unwrap().side, Side::No);
        let junk = classify_outcome("btts", "maybe", "Arsenal", "Chelsea", SportKind::ThreeWay, None);
        assert_eq!(junk, None);
    }

    #[test]
    fn test_unknown_market_key_dropped() {
        let c = classify_outcome(
            "corners",
            "Over 9.5",
            "Arsenal",
            "Chelsea",
            SportKind::ThreeWay,
            Some(dec!(9.5)),
        );
        assert_eq!(c, None);
    }

    #[test]
    fn test_classify_record_requires_price() {
        let record = RawQuoteRecord {
            event_id: "ev1".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            sport: SportKind::ThreeWay,
            market_key: "h2h".to_string(),
            outcome_label: "Arsenal".to_string(),
            point: None,
            bookmaker: "PaddyPower".to_string(),
            price: None,
            observed_at: None,
        };
        assert!(classify_record(&record).is_none());

        let priced = RawQuoteRecord {
            price: Some(dec!(2.10)),
            ..record
        };
        let quote = classify_record(&priced).unwrap();
        assert_eq!(quote.side, Side::Home);
        assert_eq!(quote.price, dec!(2.10));
    }
}
