pub mod chart_dto;
pub mod nse;
pub mod nse_dto;
pub mod provider;
pub mod utils;
pub mod yahoo;

pub use provider::{ApiProvider, ClientSettings, IndexPayload, MarketClient, MarketSource, ProviderPayload};
