//! Synthetic quotes substituted when a live fetch fails.
//!
//! Every value produced here is flagged `is_simulated`. Seed the generator to
//! make its output reproducible.
use chrono::{DateTime, Local};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::models::{IndexSnapshot, Quote};

const INDEX_BASE: f64 = 24750.0;

pub struct FallbackQuoteGenerator {
    rng: StdRng,
}

impl FallbackQuoteGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                rng: StdRng::from_os_rng(),
            },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random walk off a base in [100, 5000) with a move of at most ±5%.
    pub fn quote(&mut self, symbol: &str, sector: &str, now: DateTime<Local>) -> Quote {
        let base: f64 = self.rng.random_range(100.0..5000.0);
        let change_pct: f64 = self.rng.random_range(-5.0..5.0);
        let change = base * change_pct / 100.0;

        let open = base + self.rng.random_range(-10.0..10.0);
        let high = base + self.rng.random_range(0.0..20.0);
        let low = (base - self.rng.random_range(0.0..15.0)).max(0.0);
        let volume: u64 = self.rng.random_range(100_000..=10_000_000);

        Quote::new(
            symbol.to_string(),
            sector.to_string(),
            to_price(open),
            to_price(high),
            to_price(low),
            to_price(base + change),
            to_price(base),
            volume,
            now,
            true,
        )
    }

    pub fn index(&mut self, name: &str, now: DateTime<Local>) -> IndexSnapshot {
        let change_pct: f64 = self.rng.random_range(-2.0..2.0);
        let change = INDEX_BASE * change_pct / 100.0;

        IndexSnapshot::new(
            name.to_string(),
            to_price(INDEX_BASE + change),
            to_price(INDEX_BASE),
            now,
            true,
        )
    }
}

fn to_price(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}
