//! Market group assembly and group-level invariants.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::prob;
use crate::types::{BookOverround, GroupKey, Quote, Side};

/// All quotes sharing one `(event, market type, line)` key.
///
/// Groups are the unit of best-price selection, consensus pricing and
/// arbitrage detection. Quotes on different lines never mix: Totals 2.5
/// and Totals 3.5 are different groups.
#[derive(Debug, Clone)]
pub struct MarketGroup {
    pub key: GroupKey,
    pub quotes: Vec<Quote>,
}

impl MarketGroup {
    pub fn required_sides(&self) -> &'static [Side] {
        self.key.market_type.required_sides()
    }

    /// A group is complete when every required side has at least one
    /// quote. Incomplete groups still report best prices but are
    /// excluded from consensus and arbitrage.
    pub fn is_complete(&self) -> bool {
        self.required_sides()
            .iter()
            .all(|side| self.quotes.iter().any(|q| q.side == *side))
    }

    pub fn quotes_for(&self, side: Side) -> impl Iterator<Item = &Quote> + '_ {
        self.quotes.iter().filter(move |q| q.side == side)
    }

    /// Per-book margin for every book quoting all required sides.
    ///
    /// Overround is how far a single book's implied probabilities sum
    /// above 1, in percent. Books missing a side are skipped; if a book
    /// repeats a side, its most generous price counts.
    pub fn book_overrounds(&self) -> Vec<BookOverround> {
        let mut books: Vec<&str> = Vec::new();
        for quote in &self.quotes {
            if !books.contains(&quote.bookmaker.as_str()) {
                books.push(&quote.bookmaker);
            }
        }

        let mut out = Vec::new();
        for book in books {
            let mut sum = Decimal::ZERO;
            let mut covered = true;
            for &side in self.required_sides() {
                let best = self
                    .quotes
                    .iter()
                    .filter(|q| q.bookmaker == book && q.side == side)
                    .map(|q| q.price)
                    .max();
                match best.and_then(prob::implied_probability) {
                    Some(p) => sum += p,
                    None => {
                        covered = false;
                        break;
                    }
                }
            }
            if covered {
                out.push(BookOverround {
                    bookmaker: book.to_string(),
                    overround_pct: (sum - Decimal::ONE) * dec!(100),
                });
            }
        }

        out
    }
}

/// Group quotes by `(event_id, market_type, line)`, preserving
/// first-seen group order and input order within each group.
pub fn group_quotes(quotes: Vec<Quote>) -> Vec<MarketGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<MarketGroup> = Vec::new();

    for quote in quotes {
        let key = quote.group_key();
        match index.get(&key) {
            Some(&i) => groups[i].quotes.push(quote),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(MarketGroup {
                    key,
                    quotes: vec![quote],
                });
            }
        }
    }

    groups
}
