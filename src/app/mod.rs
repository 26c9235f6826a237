pub mod app;
pub mod calc;
pub mod config;
pub mod cycle;
pub mod fallback;
pub mod fetcher;
pub mod normalize;
pub mod ui;
pub mod utils;

pub use app::App;
pub use config::Config;
pub use cycle::{CycleBundle, run_cycle};
pub use fallback::FallbackQuoteGenerator;
