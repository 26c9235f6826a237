use chrono::{DateTime, Local};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// One traded interval of the benchmark index.
#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct IntradayPoint {
    at: DateTime<Local>,
    open: Decimal,
    close: Decimal,
    volume: u64,
}

impl IntradayPoint {
    pub fn is_down(&self) -> bool {
        self.close < self.open
    }
}

/// Intraday price and volume of the benchmark index, oldest point first.
#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct IndexSeries {
    name: String,
    points: Vec<IntradayPoint>,
}

impl IndexSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn low(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.close).min()
    }

    pub fn high(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.close).max()
    }

    pub fn last(&self) -> Option<&IntradayPoint> {
        self.points.last()
    }

    /// Closes shifted to the session low, in hundredths, for bar-style charts.
    pub fn price_levels(&self) -> Vec<u64> {
        let Some(low) = self.low() else {
            return Vec::new();
        };
        self.points
            .iter()
            .map(|p| {
                (p.close - low)
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .and_then(|level| level.round().to_u64())
                    .unwrap_or(u64::MAX)
            })
            .collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.volume).collect()
    }
}
