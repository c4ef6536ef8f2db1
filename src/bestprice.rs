//! Best-price selection with a deterministic tie-break.

use std::collections::HashMap;

use crate::market::MarketGroup;
use crate::types::BestPrice;

/// Bookmaker ranking for tie-breaking.
///
/// Lower rank wins. Books absent from the caller's list all share the
/// rank just past its end, so input order decides between them.
#[derive(Debug, Clone, Default)]
pub struct BookPriority {
    ranks: HashMap<String, usize>,
}

impl BookPriority {
    pub fn new(ordered: &[String]) -> Self {
        let mut ranks = HashMap::new();
        for (i, book) in ordered.iter().enumerate() {
            ranks.entry(book.clone()).or_insert(i);
        }
        Self { ranks }
    }

    pub fn rank(&self, bookmaker: &str) -> usize {
        self.ranks.get(bookmaker).copied().unwrap_or(self.ranks.len())
    }
}

/// Select the single best quote per side present in the group.
///
/// Ties on price go to the higher-priority book, then to the earlier
/// quote in input order, so repeated runs always pick the same book.
/// Output follows the market shape's side order; missing sides are
/// simply absent.
pub fn best_prices(group: &MarketGroup, priority: &BookPriority) -> Vec<BestPrice> {
    let mut out = Vec::new();

    for &side in group.required_sides() {
        let mut best_idx: Option<usize> = None;
        let mut best_rank = usize::MAX;

        for (i, quote) in group.quotes.iter().enumerate() {
            if quote.side != side {
                continue;
            }
            let rank = priority.rank(&quote.bookmaker);
            let better = match best_idx {
                None => true,
                Some(b) => {
                    quote.price > group.quotes[b].price
                        || (quote.price == group.quotes[b].price && rank < best_rank)
                }
            };
            if better {
                best_idx = Some(i);
                best_rank = rank;
            }
        }

        if let Some(idx) = best_idx {
            let chosen = &group.quotes[idx];
            let margin_over_next = group
                .quotes
                .iter()
                .enumerate()
                .filter(|(i, q)| *i != idx && q.side == side)
                .map(|(_, q)| q.price)
                .max()
                .map(|next| chosen.price - next);

            out.push(BestPrice {
                side,
                price: chosen.price,
                bookmaker: chosen.bookmaker.clone(),
                margin_over_next,
            });
        }
    }

    out
}
