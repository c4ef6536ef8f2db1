use anyhow::{Context, Result};
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;

use crate::error::EngineError;

/// Engine configuration.
///
/// Every policy knob (priority order, allow-lists, thresholds) is
/// caller-supplied; the core carries no baked-in bookmaker or league
/// constants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bookmaker ranking used to break best-price ties. Books absent
    /// from the list rank behind every listed book.
    pub bookmaker_priority: Vec<String>,

    /// If set, spread quotes on lines outside this list are filtered
    /// out before grouping.
    pub allowed_spread_lines: Option<Vec<Decimal>>,

    /// Minimum ROI for an arbitrage to be reported, in percent.
    pub min_roi_pct: Decimal,

    /// Minimum edge versus consensus for a value spot, in percent.
    pub min_edge_pct: Decimal,

    /// Quotes observed earlier than now minus this cutoff are dropped.
    /// `None` disables the staleness filter.
    pub staleness_cutoff: Option<Duration>,

    /// Bankroll split across the legs of each reported arbitrage.
    pub bankroll: Decimal,

    /// Price sanity floor; quotes below are discarded at ingestion.
    pub odds_min: Decimal,

    /// Price sanity ceiling; quotes above are discarded at ingestion.
    pub odds_max: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bookmaker_priority: Vec::new(),
            allowed_spread_lines: None,
            min_roi_pct: Decimal::ZERO,
            min_edge_pct: Decimal::ZERO,
            staleness_cutoff: None,
            bankroll: dec!(100),
            odds_min: dec!(1.01),
            odds_max: dec!(1000),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let bookmaker_priority = env::var("BOOK_PRIORITY")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let allowed_spread_lines = match env::var("ALLOWED_SPREAD_LINES") {
            Ok(v) if !v.trim().is_empty() => Some(
                v.split(',')
                    .map(|s| s.trim().parse::<Decimal>())
                    .collect::<Result<Vec<_>, _>>()
                    .context("Invalid ALLOWED_SPREAD_LINES")?,
            ),
            _ => None,
        };

        let staleness_cutoff = match env::var("STALE_MINUTES") {
            Ok(v) => Some(Duration::minutes(
                v.parse::<i64>().context("Invalid STALE_MINUTES")?,
            )),
            Err(_) => None,
        };

        let config = EngineConfig {
            bookmaker_priority,
            allowed_spread_lines,
            min_roi_pct: env::var("MIN_ROI_PCT")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .context("Invalid MIN_ROI_PCT")?,
            min_edge_pct: env::var("MIN_EDGE_PCT")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .context("Invalid MIN_EDGE_PCT")?,
            staleness_cutoff,
            bankroll: env::var("BANKROLL")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("Invalid BANKROLL")?,
            odds_min: env::var("ODDS_MIN")
                .unwrap_or_else(|_| "1.01".to_string())
                .parse()
                .context("Invalid ODDS_MIN")?,
            odds_max: env::var("ODDS_MAX")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("Invalid ODDS_MAX")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configuration the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.bankroll <= Decimal::ZERO {
            return Err(EngineError::InvalidBankroll(self.bankroll));
        }
        if self.odds_min <= Decimal::ONE || self.odds_max <= self.odds_min {
            return Err(EngineError::InvalidOddsBounds {
                min: self.odds_min,
                max: self.odds_max,
            });
        }
        if let Some(cutoff) = self.staleness_cutoff {
            if cutoff < Duration::zero() {
                return Err(EngineError::InvalidStalenessCutoff);
            }
        }
        Ok(())
    }
}
