use chrono::{DateTime, Duration, Local};
use derive_getters::Getters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize)]
pub struct Quote {
    symbol: String,
    sector: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    last_price: Decimal,
    previous_close: Decimal,
    change: Decimal,
    change_pct: Decimal,
    volume: u64,
    fetched_at: DateTime<Local>,
    is_simulated: bool,
}

impl Quote {
    /// Builds a quote from raw prices. `change` and `change_pct` are always
    /// derived here so every provider agrees on their definition. Prices whose
    /// change overflows yield a zero change; adapters reject them beforehand
    /// with [`price_change`].
    pub fn new(
        symbol: String,
        sector: String,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        last_price: Decimal,
        previous_close: Decimal,
        volume: u64,
        fetched_at: DateTime<Local>,
        is_simulated: bool,
    ) -> Self {
        let (change, change_pct) = price_change(last_price, previous_close).unwrap_or_default();
        Self {
            symbol,
            sector,
            open,
            high,
            low,
            last_price,
            previous_close,
            change,
            change_pct,
            volume,
            fetched_at,
            is_simulated,
        }
    }

    pub fn freshness(&self, now: DateTime<Local>, stale_after: Duration) -> Freshness {
        Freshness::classify(self.is_simulated, self.fetched_at, now, stale_after)
    }
}

/// `(change, change_pct)` for a move from `previous_close` to `last`, or
/// `None` when the arithmetic does not fit a `Decimal`.
pub fn price_change(last: Decimal, previous_close: Decimal) -> Option<(Decimal, Decimal)> {
    let change = last.checked_sub(previous_close)?;
    Some((change, change_percent(change, previous_close)?))
}

/// Percentage change relative to `base`, zero when there is no base to divide by.
pub fn change_percent(change: Decimal, base: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return Some(Decimal::ZERO);
    }
    change
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|pct| pct.round_dp(4))
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Freshness {
    Live,
    Simulated,
    Stale,
}

impl Freshness {
    pub fn classify(
        is_simulated: bool,
        fetched_at: DateTime<Local>,
        now: DateTime<Local>,
        stale_after: Duration,
    ) -> Self {
        if is_simulated {
            Freshness::Simulated
        } else if now - fetched_at > stale_after {
            Freshness::Stale
        } else {
            Freshness::Live
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Freshness::Live => "LIVE",
            Freshness::Simulated => "SIMULATED",
            Freshness::Stale => "STALE",
        }
    }
}
