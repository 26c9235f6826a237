use std::{collections::HashSet, fs::File, io::Read, time::Duration};

use csv::ReaderBuilder;

use crate::{
    api::{ApiProvider, ClientSettings},
    app::{
        fetcher::{DEFAULT_CONCURRENCY, FetchSettings, MAX_RETRIES},
        utils::{expand_path, parse_symbol},
    },
    error::ConfigError,
    models::{
        SectorCatalog,
        sector::{DEFAULT_SECTOR, NSE_FO_SECTORS},
    },
};

/// Everything one fetch cycle needs, built once at start-up and passed by
/// reference from then on.
#[derive(Clone, Debug)]
pub struct Config {
    pub universe: Vec<String>,
    pub catalog: SectorCatalog,
    pub provider: ApiProvider,
    pub base_url: Option<String>,
    pub fetch_timeout: Duration,
    pub max_concurrency: usize,
    pub refresh_interval: Duration,
    pub fallback_enabled: bool,
    pub fallback_seed: Option<u64>,
    pub accept_invalid_certs: bool,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub movers_count: usize,
    pub show_intraday: bool,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub index_name: String,
    pub index_symbol: String,
    pub listing_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            universe: NSE_FO_SECTORS
                .iter()
                .map(|(symbol, _)| symbol.to_string())
                .collect(),
            catalog: SectorCatalog::nse_fo(),
            provider: ApiProvider::Nse,
            base_url: None,
            fetch_timeout: Duration::from_secs(10),
            max_concurrency: DEFAULT_CONCURRENCY,
            refresh_interval: Duration::from_secs(30),
            fallback_enabled: true,
            fallback_seed: None,
            accept_invalid_certs: false,
            max_retries: 0,
            retry_backoff: Duration::from_millis(250),
            movers_count: 5,
            show_intraday: true,
            grid_rows: 8,
            grid_cols: 5,
            index_name: String::from("NIFTY 50"),
            index_symbol: String::from("^NSEI"),
            listing_suffix: String::from(".NS"),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.max_concurrency));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidRetries(self.max_retries));
        }

        let mut seen = HashSet::new();
        for symbol in &self.universe {
            let parsed = parse_symbol(symbol)?;
            if parsed != *symbol {
                return Err(ConfigError::InvalidSymbol(symbol.clone()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }
        Ok(())
    }

    /// Replaces universe and catalog with the contents of a watch-list file.
    pub fn with_watch_list(mut self, path: &str) -> Result<Self, ConfigError> {
        let (universe, catalog) = load_watch_list(path)?;
        self.universe = universe;
        self.catalog = catalog;
        Ok(self)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            max_concurrency: self.max_concurrency,
            timeout: self.fetch_timeout,
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
            fallback_enabled: self.fallback_enabled,
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            provider: self.provider,
            base_url: self.base_url.clone(),
            timeout: self.fetch_timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            index_name: self.index_name.clone(),
            index_symbol: self.index_symbol.clone(),
            listing_suffix: self.listing_suffix.clone(),
        }
    }

    /// Quotes older than one refresh interval (plus a grace period) are stale.
    pub fn stale_after(&self) -> chrono::Duration {
        self.refresh_interval
            .checked_add(self.fetch_timeout)
            .and_then(|grace| chrono::Duration::from_std(grace).ok())
            .unwrap_or(chrono::Duration::MAX)
    }
}

pub fn load_watch_list(path: &str) -> Result<(Vec<String>, SectorCatalog), ConfigError> {
    let path = expand_path(path);
    let file = File::open(&path).map_err(|e| ConfigError::WatchList(path.clone(), e.to_string()))?;
    read_watch_list(file).map_err(|e| match e {
        ConfigError::WatchList(_, cause) => ConfigError::WatchList(path, cause),
        other => other,
    })
}

/// Reads `symbol,sector` rows (header required). A blank sector maps the
/// symbol to the default category.
pub fn read_watch_list<R: Read>(reader: R) -> Result<(Vec<String>, SectorCatalog), ConfigError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut universe = Vec::new();
    let mut sectors = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let rec = record.map_err(|e| {
            ConfigError::WatchList(
                String::from("<reader>"),
                format!("row {}: {}", row_idx + 1, e),
            )
        })?;

        let Some(raw_symbol) = rec.get(0).filter(|s| !s.is_empty()) else {
            continue;
        };
        let symbol = parse_symbol(raw_symbol)?;
        let sector = rec
            .get(1)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SECTOR)
            .to_string();

        if universe.contains(&symbol) {
            return Err(ConfigError::DuplicateSymbol(symbol));
        }
        universe.push(symbol.clone());
        sectors.push((symbol, sector));
    }

    if universe.is_empty() {
        return Err(ConfigError::EmptyUniverse);
    }

    Ok((universe, sectors.into_iter().collect()))
}
