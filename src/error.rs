use rust_decimal::Decimal;
use thiserror::Error;

/// Hard errors surfaced by the engine.
///
/// Only bad configuration (or a violated API contract) errors. Malformed
/// market data never does: noisy provider rows are dropped during
/// ingestion and counted instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("bankroll must be positive, got {0}")]
    InvalidBankroll(Decimal),

    #[error("odds bounds must satisfy 1 < min < max, got {min}..{max}")]
    InvalidOddsBounds { min: Decimal, max: Decimal },

    #[error("staleness cutoff must not be negative")]
    InvalidStalenessCutoff,

    #[error("non-positive price {0} passed to stake allocation")]
    InvalidPrice(Decimal),
}
