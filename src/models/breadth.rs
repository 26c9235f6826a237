use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct BreadthSummary {
    advancing: usize,
    declining: usize,
    unchanged: usize,
}

impl BreadthSummary {
    pub fn total(&self) -> usize {
        self.advancing + self.declining + self.unchanged
    }
}
