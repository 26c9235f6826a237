use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::Quote;

/// Top gainers (best first) and top losers (worst first) of one cycle.
#[derive(Clone, Debug, Default, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct Movers {
    gainers: Vec<Quote>,
    losers: Vec<Quote>,
}
