use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Quote;

/// All quotes resolved in one fetch cycle, keyed by symbol.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuoteBasket {
    quotes: BTreeMap<String, Quote>,
}

impl QuoteBasket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts by symbol, returning the quote it superseded.
    pub fn insert(&mut self, quote: Quote) -> Option<Quote> {
        self.quotes.insert(quote.symbol().clone(), quote)
    }

    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.quotes.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.values()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    pub fn simulated_count(&self) -> usize {
        self.quotes().filter(|quote| *quote.is_simulated()).count()
    }
}

impl FromIterator<Quote> for QuoteBasket {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        let mut basket = QuoteBasket::new();
        for quote in iter {
            basket.insert(quote);
        }
        basket
    }
}
