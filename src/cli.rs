use std::{str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand};
use strum::IntoEnumIterator;

use crate::{api::ApiProvider, app::Config, error::ConfigError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: PulseArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
pub enum Commands {
    /// Interactive terminal dashboard (default).
    Dashboard,

    /// Run a single cycle and print the bundle as JSON.
    Once,

    /// Print one summary line per refresh cycle.
    Watch {
        /// Stop after this many cycles.
        #[arg(long)]
        cycles: Option<usize>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PulseArgs {
    /// Quote provider: nse or yahoo.
    #[arg(long, env = "MARKET_PULSE_PROVIDER", default_value = "nse", value_parser = parse_provider, global = true)]
    pub provider: ApiProvider,

    /// Override the provider's base URL.
    #[arg(long, env = "MARKET_PULSE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// CSV watch-list with `symbol,sector` rows; replaces the built-in universe.
    #[arg(long, env = "MARKET_PULSE_WATCHLIST", global = true)]
    pub watchlist: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "MARKET_PULSE_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Maximum requests in flight.
    #[arg(long, env = "MARKET_PULSE_CONCURRENCY", default_value_t = 10, global = true)]
    pub concurrency: usize,

    /// Seconds between refresh cycles.
    #[arg(long, env = "MARKET_PULSE_REFRESH_SECS", default_value_t = 30, global = true)]
    pub refresh_secs: u64,

    /// Leave failed symbols out instead of simulating them.
    #[arg(long, env = "MARKET_PULSE_NO_FALLBACK", global = true)]
    pub no_fallback: bool,

    /// Seed for reproducible simulated quotes.
    #[arg(long, env = "MARKET_PULSE_SEED", global = true)]
    pub seed: Option<u64>,

    /// Accept invalid TLS certificates from the provider.
    #[arg(long, env = "MARKET_PULSE_INSECURE", global = true)]
    pub insecure: bool,

    /// Extra attempts for timeouts and transport errors.
    #[arg(long, env = "MARKET_PULSE_RETRIES", default_value_t = 0, global = true)]
    pub retries: u32,

    /// Base retry backoff in milliseconds, doubled on every attempt.
    #[arg(long, env = "MARKET_PULSE_BACKOFF_MS", default_value_t = 250, global = true)]
    pub backoff_ms: u64,

    /// Number of gainers and losers shown.
    #[arg(long, env = "MARKET_PULSE_MOVERS", default_value_t = 5, global = true)]
    pub movers: usize,

    /// Skip the intraday index chart.
    #[arg(long, env = "MARKET_PULSE_NO_INTRADAY", global = true)]
    pub no_intraday: bool,

    #[arg(long, env = "MARKET_PULSE_GRID_ROWS", default_value_t = 8, global = true)]
    pub grid_rows: usize,

    #[arg(long, env = "MARKET_PULSE_GRID_COLS", default_value_t = 5, global = true)]
    pub grid_cols: usize,

    /// Benchmark index name as listed by the provider.
    #[arg(long, env = "MARKET_PULSE_INDEX_NAME", default_value = "NIFTY 50", global = true)]
    pub index_name: String,

    /// Benchmark index ticker for chart-based providers.
    #[arg(long, env = "MARKET_PULSE_INDEX_SYMBOL", default_value = "^NSEI", global = true)]
    pub index_symbol: String,

    /// Exchange suffix appended to tickers for chart-based providers.
    #[arg(long, env = "MARKET_PULSE_SUFFIX", default_value = ".NS", global = true)]
    pub listing_suffix: String,
}

/// Case-insensitive provider name; the error lists every supported one.
pub fn parse_provider(raw: &str) -> Result<ApiProvider, String> {
    ApiProvider::from_str(raw).map_err(|_| {
        let known: Vec<String> = ApiProvider::iter().map(|p| p.to_string()).collect();
        format!("unknown provider '{}', expected one of: {}", raw, known.join(", "))
    })
}

impl PulseArgs {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = Config {
            provider: self.provider,
            base_url: self.base_url,
            fetch_timeout: Duration::from_secs(self.timeout_secs),
            max_concurrency: self.concurrency,
            refresh_interval: Duration::from_secs(self.refresh_secs),
            fallback_enabled: !self.no_fallback,
            fallback_seed: self.seed,
            accept_invalid_certs: self.insecure,
            max_retries: self.retries,
            retry_backoff: Duration::from_millis(self.backoff_ms),
            movers_count: self.movers,
            show_intraday: !self.no_intraday,
            grid_rows: self.grid_rows,
            grid_cols: self.grid_cols,
            index_name: self.index_name,
            index_symbol: self.index_symbol,
            listing_suffix: self.listing_suffix,
            ..Config::default()
        };

        if let Some(path) = self.watchlist {
            config = config.with_watch_list(&path)?;
        }
        config.validate()?;
        Ok(config)
    }
}
