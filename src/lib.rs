//! Cross-bookmaker odds engine for sporting fixtures.
//!
//! This library normalizes heterogeneous provider quotes onto a
//! canonical market model, selects best prices with a deterministic
//! tie-break, derives margin-free consensus prices, and scans every
//! market group for cross-book arbitrage, attaching the stake split
//! that locks the profit in for a given bankroll.
//!
//! Fetching quotes, rendering results and scheduling runs are external
//! collaborators; the engine is a pure batch transform over an
//! in-memory snapshot.

pub mod arb;
pub mod bestprice;
pub mod classify;
pub mod config;
pub mod consensus;
pub mod double_chance;
pub mod error;
pub mod market;
pub mod prob;
pub mod snapshot;
pub mod stakes;
pub mod types;
