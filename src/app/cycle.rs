use chrono::{DateTime, Local};
use derive_getters::Getters;
use serde::Serialize;

use crate::{
    api::MarketSource,
    app::{
        calc::{breadth, sector_aggregate, top_movers},
        config::Config,
        fallback::FallbackQuoteGenerator,
        fetcher::{fetch_all, fetch_index, fetch_index_series},
        utils::format_pct,
    },
    error::ConfigError,
    models::{BreadthSummary, IndexSeries, IndexSnapshot, Movers, QuoteBasket, SectorAggregate},
};

/// Everything the render sinks need from one fetch cycle.
#[derive(Clone, Debug, Getters, Serialize)]
pub struct CycleBundle {
    basket: QuoteBasket,
    index: Option<IndexSnapshot>,
    index_series: Option<IndexSeries>,
    breadth: BreadthSummary,
    sectors: SectorAggregate,
    movers: Movers,
    fetched_at: DateTime<Local>,
}

impl CycleBundle {
    pub fn simulated_count(&self) -> usize {
        self.basket.simulated_count()
    }

    /// True when any number on screen did not come from a live response.
    pub fn is_degraded(&self) -> bool {
        self.simulated_count() > 0
            || self
                .index
                .as_ref()
                .is_none_or(|index| *index.is_simulated())
    }

    pub fn age(&self, now: DateTime<Local>) -> chrono::Duration {
        now - self.fetched_at
    }

    pub fn summary_line(&self) -> String {
        let index = match &self.index {
            Some(index) => format!(
                "{} {:.2} ({}){}",
                index.name(),
                index.last(),
                format_pct(index.change_pct()),
                if *index.is_simulated() { " [sim]" } else { "" }
            ),
            None => String::from("index n/a"),
        };
        format!(
            "[{}] {} | adv {} dec {} unch {} | {} quotes, {} simulated",
            self.fetched_at.format("%H:%M:%S"),
            index,
            self.breadth.advancing(),
            self.breadth.declining(),
            self.breadth.unchanged(),
            self.basket.len(),
            self.simulated_count()
        )
    }
}

/// One full cycle: validate, fetch basket, index and intraday bars
/// concurrently, substitute fallbacks, aggregate. Only configuration problems
/// are returned as errors.
pub async fn run_cycle<S: MarketSource>(
    config: &Config,
    source: &S,
    generator: &mut FallbackQuoteGenerator,
) -> Result<CycleBundle, ConfigError> {
    config.validate()?;
    let settings = config.fetch_settings();

    let (basket, index, index_series) = tokio::join!(
        fetch_all(
            source,
            &config.universe,
            &config.catalog,
            &settings,
            generator
        ),
        fetch_index(source, &settings),
        async {
            if !config.show_intraday {
                return None;
            }
            fetch_index_series(source, &settings)
                .await
                .inspect_err(|failure| log::warn!("Intraday chart unavailable for {}", failure))
                .ok()
        },
    );

    let index = match index {
        Ok(index) => Some(index),
        Err(failure) => {
            log::warn!("Live index unavailable for {}", failure);
            config
                .fallback_enabled
                .then(|| generator.index(source.index_name(), Local::now()))
        }
    };

    let bundle = CycleBundle {
        breadth: breadth(&basket),
        sectors: sector_aggregate(&basket),
        movers: top_movers(&basket, config.movers_count),
        basket,
        index,
        index_series,
        fetched_at: Local::now(),
    };

    log::info!("{}", bundle.summary_line());
    Ok(bundle)
}
