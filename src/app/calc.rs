use std::{cmp::Ordering, collections::BTreeMap};

use rust_decimal::Decimal;

use crate::{
    error::GridOverflow,
    models::{BreadthSummary, Grid, GridCell, Movers, Quote, QuoteBasket, SectorAggregate},
};

/// `(change_pct desc, symbol asc)`: the one ordering every ranking uses.
pub fn canonical_cmp(a: &Quote, b: &Quote) -> Ordering {
    b.change_pct()
        .cmp(a.change_pct())
        .then_with(|| a.symbol().cmp(b.symbol()))
}

pub fn canonical_order(basket: &QuoteBasket) -> Vec<&Quote> {
    let mut quotes: Vec<&Quote> = basket.quotes().collect();
    quotes.sort_by(|a, b| canonical_cmp(a, b));
    quotes
}

pub fn top_movers(basket: &QuoteBasket, n: usize) -> Movers {
    let gainers = canonical_order(basket)
        .into_iter()
        .take(n)
        .cloned()
        .collect();

    let mut losers: Vec<&Quote> = basket.quotes().collect();
    losers.sort_by(|a, b| {
        a.change_pct()
            .cmp(b.change_pct())
            .then_with(|| a.symbol().cmp(b.symbol()))
    });
    let losers = losers.into_iter().take(n).cloned().collect();

    Movers::new(gainers, losers)
}

pub fn sector_aggregate(basket: &QuoteBasket) -> SectorAggregate {
    let mut by_sector: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for quote in basket.quotes() {
        by_sector
            .entry(quote.sector().clone())
            .or_default()
            .push(*quote.change_pct());
    }

    by_sector
        .into_iter()
        .map(|(sector, pcts)| (sector, mean(&pcts).round_dp(4)))
        .collect()
}

/// Plain sum-then-divide; a sum that overflows falls back to summing the
/// already divided terms.
fn mean(values: &[Decimal]) -> Decimal {
    let count = Decimal::from(values.len().max(1));
    values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
        .and_then(|sum| sum.checked_div(count))
        .unwrap_or_else(|| {
            values
                .iter()
                .filter_map(|value| value.checked_div(count))
                .fold(Decimal::ZERO, |sum, value| sum.saturating_add(value))
        })
}

pub fn breadth(basket: &QuoteBasket) -> BreadthSummary {
    let (mut advancing, mut declining, mut unchanged) = (0, 0, 0);
    for quote in basket.quotes() {
        match quote.change_pct().cmp(&Decimal::ZERO) {
            Ordering::Greater => advancing += 1,
            Ordering::Less => declining += 1,
            Ordering::Equal => unchanged += 1,
        }
    }
    BreadthSummary::new(advancing, declining, unchanged)
}

/// Row-major heatmap in canonical order, padded with empty cells. A grid too
/// small for the basket is an error rather than a silent truncation.
pub fn grid_layout(basket: &QuoteBasket, rows: usize, cols: usize) -> Result<Grid, GridOverflow> {
    let capacity = rows.saturating_mul(cols);
    if capacity < basket.len() {
        return Err(GridOverflow {
            rows,
            cols,
            capacity,
            len: basket.len(),
        });
    }

    let mut cells = canonical_order(basket)
        .into_iter()
        .map(|quote| GridCell::new(Some(quote.symbol().clone()), *quote.change_pct()));

    Ok((0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| cells.next().unwrap_or_else(GridCell::empty))
                .collect()
        })
        .collect())
}
