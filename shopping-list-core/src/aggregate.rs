//! Merges the cart lines of every recipe in a cart into one line per ingredient key.

use indexmap::IndexMap;
use tracing::debug;

use crate::contract::{AggregatedLine, CartLine};

/// Reduce cart lines to one [`AggregatedLine`] per `(ingredient_name, unit)` key.
///
/// Keys are compared as exact strings: "Sugar"/"sugar" or "g"/"gram" stay separate
/// lines and units are never converted. The output keeps the order in which each key
/// was first seen; adding to an existing key never moves it.
pub fn aggregate<I>(lines: I) -> Vec<AggregatedLine>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut totals: IndexMap<(String, String), u64> = IndexMap::new();
    let mut input_lines = 0usize;

    for line in lines {
        input_lines += 1;
        let total = totals.entry((line.ingredient_name, line.unit)).or_insert(0);
        *total = total.saturating_add(u64::from(line.amount));
    }

    debug!(
        input_lines,
        distinct_lines = totals.len(),
        "Aggregated cart lines"
    );

    totals
        .into_iter()
        .map(|((ingredient_name, unit), total_amount)| AggregatedLine {
            ingredient_name,
            unit,
            total_amount,
        })
        .collect()
}
