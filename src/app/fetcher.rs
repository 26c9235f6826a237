use std::time::Duration;

use chrono::Local;
use futures::{StreamExt, stream};
use tokio::time::{sleep, timeout};

use crate::{
    api::MarketSource,
    app::{
        fallback::FallbackQuoteGenerator,
        normalize::{normalize, normalize_index, normalize_series},
    },
    error::{FailureReason, FetchFailure},
    models::{IndexSeries, IndexSnapshot, Quote, QuoteBasket, SectorCatalog},
};

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const MAX_RETRIES: u32 = 5;
pub const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct FetchSettings {
    pub max_concurrency: usize,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub fallback_enabled: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_backoff: Duration::from_millis(250),
            fallback_enabled: true,
        }
    }
}

/// Fetches every symbol with at most `max_concurrency` requests in flight.
///
/// Failed symbols are replaced by simulated quotes when fallback is enabled,
/// so the basket then holds exactly one quote per distinct input symbol.
/// Substitution runs after the fan-out in symbol order, which keeps a seeded
/// generator's output independent of completion order.
pub async fn fetch_all<S: MarketSource>(
    source: &S,
    symbols: &[String],
    catalog: &SectorCatalog,
    settings: &FetchSettings,
    generator: &mut FallbackQuoteGenerator,
) -> QuoteBasket {
    let results: Vec<Result<Quote, FetchFailure>> = stream::iter(symbols)
        .map(|symbol| fetch_one(source, symbol, catalog, settings))
        .buffer_unordered(settings.max_concurrency.max(1))
        .collect()
        .await;

    let mut basket = QuoteBasket::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(quote) => {
                basket.insert(quote);
            }
            Err(failure) => {
                log::warn!("Live quote unavailable for {}", failure);
                failures.push(failure);
            }
        }
    }

    if failures.is_empty() {
        return basket;
    }

    if !settings.fallback_enabled {
        log::warn!(
            "{} of {} symbols missing from basket (fallback disabled)",
            failures.len(),
            symbols.len()
        );
        return basket;
    }

    failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    failures.dedup_by(|a, b| a.symbol == b.symbol);
    let now = Local::now();
    for failure in failures {
        let sector = catalog.sector_of(&failure.symbol);
        basket.insert(generator.quote(&failure.symbol, sector, now));
    }
    basket
}

/// Live index snapshot; the caller decides on a fallback.
pub async fn fetch_index<S: MarketSource>(
    source: &S,
    settings: &FetchSettings,
) -> Result<IndexSnapshot, FetchFailure> {
    let name = source.index_name();
    with_retries(name, settings, || async move {
        match timeout(settings.timeout, source.fetch_index()).await {
            Ok(payload) => payload.and_then(|payload| normalize_index(&payload, name, Local::now())),
            Err(_) => Err(FetchFailure::new(
                name,
                FailureReason::Timeout(settings.timeout),
            )),
        }
    })
    .await
}

/// Intraday bars of the index; the caller renders without a chart on failure.
pub async fn fetch_index_series<S: MarketSource>(
    source: &S,
    settings: &FetchSettings,
) -> Result<IndexSeries, FetchFailure> {
    let name = source.index_name();
    with_retries(name, settings, || async move {
        match timeout(settings.timeout, source.fetch_index_series()).await {
            Ok(chart) => chart.and_then(|chart| normalize_series(&chart, name)),
            Err(_) => Err(FetchFailure::new(
                name,
                FailureReason::Timeout(settings.timeout),
            )),
        }
    })
    .await
}

async fn fetch_one<S: MarketSource>(
    source: &S,
    symbol: &str,
    catalog: &SectorCatalog,
    settings: &FetchSettings,
) -> Result<Quote, FetchFailure> {
    with_retries(symbol, settings, || async move {
        match timeout(settings.timeout, source.fetch_quote(symbol)).await {
            Ok(payload) => {
                payload.and_then(|payload| normalize(&payload, symbol, catalog, Local::now()))
            }
            Err(_) => Err(FetchFailure::new(
                symbol,
                FailureReason::Timeout(settings.timeout),
            )),
        }
    })
    .await
}

/// Re-runs `attempt` on transient failures with exponential backoff, up to
/// `max_retries` extra times (never more than [`MAX_RETRIES`]).
async fn with_retries<T, F, Fut>(
    label: &str,
    settings: &FetchSettings,
    mut attempt: F,
) -> Result<T, FetchFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchFailure>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(failure)
                if failure.reason.is_transient()
                    && retries < settings.max_retries.min(MAX_RETRIES) =>
            {
                let delay = backoff_delay(settings.retry_backoff, retries);
                log::debug!(
                    "Retrying {} in {:?} after: {}",
                    label,
                    delay,
                    failure.reason
                );
                sleep(delay).await;
                retries += 1;
            }
            result => return result,
        }
    }
}

/// `base * 2^retries`, never longer than [`MAX_BACKOFF`].
pub fn backoff_delay(base: Duration, retries: u32) -> Duration {
    base.checked_mul(2u32.saturating_pow(retries))
        .unwrap_or(MAX_BACKOFF)
        .min(MAX_BACKOFF)
}
