//! The canonical snapshot pipeline.
//!
//! One parameterized, market-type-aware pass: filter raw rows, classify
//! them onto the canonical model, group by `(event, market, line)`,
//! then price and scan each group independently. Pure CPU batch over an
//! in-memory snapshot; no I/O and no shared state, so groups could be
//! fanned out across threads with zero coordination if snapshots ever
//! outgrow a single core.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::arb;
use crate::bestprice::{self, BookPriority};
use crate::classify;
use crate::config::EngineConfig;
use crate::consensus;
use crate::double_chance;
use crate::error::EngineError;
use crate::market::{self, MarketGroup};
use crate::types::{
    ArbitrageOpportunity, BestPrice, BookOverround, DoubleChanceArb, DoubleChancePrice, FairPrice,
    GroupKey, MarketType, RawQuoteRecord, Side,
};

/// Ingest counters for one snapshot run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestStats {
    pub records_seen: usize,
    /// Missing price or empty label.
    pub dropped_malformed: usize,
    /// Price outside the configured sanity bounds.
    pub dropped_price: usize,
    /// Observed before the staleness cutoff.
    pub dropped_stale: usize,
    /// Label or line failed classification.
    pub dropped_unclassified: usize,
    /// Spread line outside the configured allow-list.
    pub dropped_line_filtered: usize,
    pub quotes_kept: usize,
}

/// Derived double-chance view of a 1X2 group.
#[derive(Debug, Clone, Serialize)]
pub struct DoubleChanceReport {
    pub prices: [DoubleChancePrice; 3],
    pub arbs: Vec<DoubleChanceArb>,
}

/// Everything derived for one market group.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub key: GroupKey,
    pub home_team: String,
    pub away_team: String,
    pub complete: bool,
    /// Always populated for the sides present, even in incomplete groups.
    pub best_prices: Vec<BestPrice>,
    /// Complete groups with a sane consensus only.
    pub fair_prices: Option<Vec<FairPrice>>,
    /// Per-book margins; complete groups only.
    pub book_overrounds: Vec<BookOverround>,
    pub arbitrage: Option<ArbitrageOpportunity>,
    /// 1X2 groups only.
    pub double_chance: Option<DoubleChanceReport>,
}

/// A best price beating consensus by at least the configured edge.
#[derive(Debug, Clone, Serialize)]
pub struct ValueSpot {
    pub key: GroupKey,
    pub side: Side,
    pub best_price: Decimal,
    pub best_book: String,
    pub fair_price: Decimal,
    pub edge_pct: Decimal,
}

/// Full output of one snapshot run. Rebuilt from scratch every run;
/// nothing here is ever updated in place.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub generated_at: DateTime<Utc>,
    pub stats: IngestStats,
    pub markets: Vec<MarketReport>,
    pub value_spots: Vec<ValueSpot>,
}

impl SnapshotReport {
    /// Markets with a reported arbitrage.
    pub fn arbitrages(&self) -> impl Iterator<Item = &MarketReport> + '_ {
        self.markets.iter().filter(|m| m.arbitrage.is_some())
    }
}

/// Run the pipeline against the current wall clock.
pub fn run_snapshot(
    records: &[RawQuoteRecord],
    config: &EngineConfig,
) -> Result<SnapshotReport, EngineError> {
    run_snapshot_at(records, config, Utc::now())
}

/// Run the pipeline with an explicit "now" for staleness checks.
pub fn run_snapshot_at(
    records: &[RawQuoteRecord],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<SnapshotReport, EngineError> {
    config.validate()?;

    let mut stats = IngestStats {
        records_seen: records.len(),
        ..Default::default()
    };
    let mut teams: HashMap<String, (String, String)> = HashMap::new();
    let mut quotes = Vec::new();

    let stale_before = config.staleness_cutoff.map(|cutoff| now - cutoff);

    for record in records {
        let price = match record.price {
            Some(p) => p,
            None => {
                stats.dropped_malformed += 1;
                continue;
            }
        };
        if record.outcome_label.trim().is_empty() {
            stats.dropped_malformed += 1;
            continue;
        }
        if price < config.odds_min || price > config.odds_max {
            stats.dropped_price += 1;
            debug!(
                "{}: price {} outside {}..{}, dropping",
                record.event_id, price, config.odds_min, config.odds_max
            );
            continue;
        }
        if let (Some(cutoff), Some(observed)) = (stale_before, record.observed_at) {
            if observed < cutoff {
                stats.dropped_stale += 1;
                continue;
            }
        }

        let quote = match classify::classify_record(record) {
            Some(q) => q,
            None => {
                stats.dropped_unclassified += 1;
                debug!(
                    "{}: unclassifiable outcome '{}' for market '{}'",
                    record.event_id, record.outcome_label, record.market_key
                );
                continue;
            }
        };

        // The allow-list is policy, not classification: quotes on
        // unpopular lines are treated as not present.
        if quote.market_type == MarketType::Spreads {
            if let (Some(allowed), Some(line)) = (config.allowed_spread_lines.as_deref(), quote.line)
            {
                if !allowed.contains(&line) {
                    stats.dropped_line_filtered += 1;
                    continue;
                }
            }
        }

        teams
            .entry(quote.event_id.clone())
            .or_insert_with(|| (record.home_team.clone(), record.away_team.clone()));
        quotes.push(quote);
    }
    stats.quotes_kept = quotes.len();

    let priority = BookPriority::new(&config.bookmaker_priority);
    let groups = market::group_quotes(quotes);

    let mut markets = Vec::with_capacity(groups.len());
    let mut value_spots = Vec::new();

    for group in &groups {
        let report = price_group(group, &priority, config, &teams)?;

        if let Some(fair) = &report.fair_prices {
            for fp in fair {
                if fp.edge_pct < config.min_edge_pct {
                    continue;
                }
                if let Some(best) = report.best_prices.iter().find(|b| b.side == fp.side) {
                    value_spots.push(ValueSpot {
                        key: report.key.clone(),
                        side: fp.side,
                        best_price: best.price,
                        best_book: best.bookmaker.clone(),
                        fair_price: fp.fair_price,
                        edge_pct: fp.edge_pct,
                    });
                }
            }
        }

        markets.push(report);
    }

    info!(
        "snapshot: {} records in, {} quotes kept, {} groups, {} arbitrages",
        stats.records_seen,
        stats.quotes_kept,
        markets.len(),
        markets.iter().filter(|m| m.arbitrage.is_some()).count()
    );

    Ok(SnapshotReport {
        generated_at: now,
        stats,
        markets,
        value_spots,
    })
}

fn price_group(
    group: &MarketGroup,
    priority: &BookPriority,
    config: &EngineConfig,
    teams: &HashMap<String, (String, String)>,
) -> Result<MarketReport, EngineError> {
    let best = bestprice::best_prices(group, priority);
    let complete = group.is_complete();

    let (fair_prices, book_overrounds, arbitrage) = if complete {
        let fair = consensus::fair_prices(group, &best);
        let overrounds = group.book_overrounds();
        let arb = arb::find_arbitrage(
            group.key.market_type,
            &best,
            config.bankroll,
            config.min_roi_pct,
        )?;
        (fair, overrounds, arb)
    } else {
        (None, Vec::new(), None)
    };

    let double_chance = if complete && group.key.market_type == MarketType::MatchResult3Way {
        match double_chance::derive(&best) {
            Some(prices) => {
                let arbs =
                    double_chance::pairwise_arbs(&prices, config.bankroll, config.min_roi_pct)?;
                Some(DoubleChanceReport { prices, arbs })
            }
            None => None,
        }
    } else {
        None
    };

    let (home_team, away_team) = teams
        .get(&group.key.event_id)
        .cloned()
        .unwrap_or_default();

    Ok(MarketReport {
        key: group.key.clone(),
        home_team,
        away_team,
        complete,
        best_prices: best,
        fair_prices,
        book_overrounds,
        arbitrage,
        double_chance,
    })
}
