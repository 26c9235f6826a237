use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One heatmap cell. Padding cells carry no symbol and a zero change.
#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct GridCell {
    symbol: Option<String>,
    change_pct: Decimal,
}

impl GridCell {
    pub fn empty() -> Self {
        Self::new(None, Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_none()
    }
}

pub type Grid = Vec<Vec<GridCell>>;
