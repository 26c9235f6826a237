use chrono::{DateTime, Local};
use derive_getters::Getters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quote::price_change;

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize)]
pub struct IndexSnapshot {
    name: String,
    last: Decimal,
    change: Decimal,
    change_pct: Decimal,
    fetched_at: DateTime<Local>,
    is_simulated: bool,
}

impl IndexSnapshot {
    pub fn new(
        name: String,
        last: Decimal,
        previous_close: Decimal,
        fetched_at: DateTime<Local>,
        is_simulated: bool,
    ) -> Self {
        let (change, change_pct) = price_change(last, previous_close).unwrap_or_default();
        Self {
            name,
            last,
            change,
            change_pct,
            fetched_at,
            is_simulated,
        }
    }
}
