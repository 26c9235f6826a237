#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        app::{
            config::Config,
            cycle::run_cycle,
            fallback::FallbackQuoteGenerator,
            fetcher::{
                FetchSettings, MAX_BACKOFF, MAX_RETRIES, backoff_delay, fetch_all, fetch_index,
                fetch_index_series,
            },
        },
        error::{ConfigError, FailureReason},
        models::{QuoteBasket, SectorCatalog},
        test::stub::{INDEX_NAME, StubSource, symbols},
    };

    fn settings() -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_millis(500),
            retry_backoff: Duration::from_millis(1),
            ..FetchSettings::default()
        }
    }

    fn prices(basket: &QuoteBasket) -> Vec<(String, Decimal, Decimal)> {
        basket
            .quotes()
            .map(|q| (q.symbol().clone(), *q.last_price(), *q.previous_close()))
            .collect()
    }

    fn stub_config(universe: &[&str]) -> Config {
        Config {
            universe: symbols(universe),
            fetch_timeout: Duration::from_millis(500),
            retry_backoff: Duration::from_millis(1),
            fallback_seed: Some(11),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn live_quotes_fill_the_basket() {
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_quote("INFY", dec!(98), dec!(100));
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let basket = fetch_all(
            &source,
            &symbols(&["TCS", "INFY"]),
            &SectorCatalog::nse_fo(),
            &settings(),
            &mut generator,
        )
        .await;

        assert_eq!(basket.len(), 2);
        assert_eq!(basket.simulated_count(), 0);
        assert_eq!(*basket.get("TCS").unwrap().change_pct(), dec!(5));
        assert_eq!(basket.get("INFY").unwrap().sector(), "Technology");
    }

    #[tokio::test]
    async fn total_failure_yields_full_simulated_basket() {
        let universe = symbols(&["RELIANCE", "TCS", "HDFCBANK", "SBIN", "ITC"]);
        let source = StubSource::new();
        let mut generator = FallbackQuoteGenerator::seeded(5);

        let basket = fetch_all(
            &source,
            &universe,
            &SectorCatalog::nse_fo(),
            &settings(),
            &mut generator,
        )
        .await;

        assert_eq!(basket.len(), universe.len());
        assert_eq!(basket.simulated_count(), universe.len());
        for symbol in &universe {
            assert!(basket.contains(symbol));
        }
        assert_eq!(basket.get("SBIN").unwrap().sector(), "Banking");
    }

    #[tokio::test]
    async fn failures_are_dropped_without_fallback() {
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_failure("INFY", FailureReason::Status(500));
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            fallback_enabled: false,
            ..settings()
        };

        let basket = fetch_all(
            &source,
            &symbols(&["TCS", "INFY"]),
            &SectorCatalog::nse_fo(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(basket.len(), 1);
        assert!(!basket.contains("INFY"));
    }

    #[tokio::test]
    async fn slow_symbol_times_out_into_fallback() {
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_slow_quote("INFY", Duration::from_secs(5), dec!(1500));
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            timeout: Duration::from_millis(50),
            ..settings()
        };

        let basket = fetch_all(
            &source,
            &symbols(&["TCS", "INFY"]),
            &SectorCatalog::nse_fo(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(basket.len(), 2);
        assert!(!basket.get("TCS").unwrap().is_simulated());
        assert!(*basket.get("INFY").unwrap().is_simulated());
    }

    #[tokio::test]
    async fn requests_in_flight_are_bounded() {
        let universe: Vec<String> = (0..24).map(|i| format!("SYM{}", i)).collect();
        let source = universe
            .iter()
            .fold(StubSource::new(), |source, symbol| {
                source.with_quote(symbol, dec!(10), dec!(10))
            })
            .with_delay(Duration::from_millis(20));
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            max_concurrency: 4,
            ..settings()
        };

        let basket = fetch_all(
            &source,
            &universe,
            &SectorCatalog::default(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(basket.len(), 24);
        assert_eq!(source.calls(), 24);
        assert!(source.peak() <= 4);
        assert!(source.peak() >= 1);
    }

    #[tokio::test]
    async fn seeded_fallback_is_reproducible() {
        let universe = symbols(&["TCS", "INFY", "WIPRO", "TECHM"]);
        let source = StubSource::new().with_quote("TCS", dec!(105), dec!(100));

        let mut first = FallbackQuoteGenerator::seeded(99);
        let mut second = FallbackQuoteGenerator::seeded(99);
        let catalog = SectorCatalog::nse_fo();

        let a = fetch_all(&source, &universe, &catalog, &settings(), &mut first).await;
        let b = fetch_all(&source, &universe, &catalog, &settings(), &mut second).await;

        assert_eq!(prices(&a), prices(&b));
        assert_eq!(a.simulated_count(), 3);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let source = StubSource::new().with_failure("TCS", FailureReason::Status(503));
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            max_retries: 2,
            ..settings()
        };

        let basket = fetch_all(
            &source,
            &symbols(&["TCS"]),
            &SectorCatalog::nse_fo(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(source.calls(), 3);
        assert!(*basket.get("TCS").unwrap().is_simulated());
    }

    #[tokio::test]
    async fn malformed_payloads_are_not_retried() {
        let source = StubSource::new().with_failure(
            "TCS",
            FailureReason::Malformed(String::from("missing 'priceInfo'")),
        );
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            max_retries: 3,
            ..settings()
        };

        fetch_all(
            &source,
            &symbols(&["TCS"]),
            &SectorCatalog::nse_fo(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn index_is_fetched_by_name() {
        let source = StubSource::new().with_index(dec!(25000), dec!(24750));

        let index = fetch_index(&source, &settings()).await.unwrap();

        assert_eq!(index.name(), INDEX_NAME);
        assert_eq!(*index.change(), dec!(250));
        assert!(!index.is_simulated());
    }

    #[tokio::test]
    async fn cycle_rejects_empty_universe() {
        let config = stub_config(&[]);
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let result = run_cycle(&config, &StubSource::new(), &mut generator).await;

        assert_eq!(result.unwrap_err(), ConfigError::EmptyUniverse);
    }

    #[tokio::test]
    async fn cycle_bundles_live_data() {
        let config = stub_config(&["TCS", "INFY", "SBIN"]);
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_quote("INFY", dec!(98), dec!(100))
            .with_quote("SBIN", dec!(100), dec!(100))
            .with_index(dec!(25000), dec!(24750));
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let bundle = run_cycle(&config, &source, &mut generator).await.unwrap();

        assert!(!bundle.is_degraded());
        assert_eq!(bundle.breadth().total(), 3);
        assert_eq!(bundle.movers().gainers()[0].symbol(), "TCS");
        assert_eq!(bundle.movers().losers()[0].symbol(), "INFY");
        assert_eq!(bundle.sectors()["Technology"], dec!(1.5));
        assert_eq!(bundle.sectors()["Banking"], Decimal::ZERO);
        assert!(bundle.summary_line().contains("adv 1 dec 1 unch 1"));

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["index"]["name"], INDEX_NAME);
        assert!(json["basket"]["TCS"].is_object());
    }

    #[tokio::test]
    async fn cycle_simulates_missing_index() {
        let config = stub_config(&["TCS"]);
        let source = StubSource::new().with_quote("TCS", dec!(105), dec!(100));
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let bundle = run_cycle(&config, &source, &mut generator).await.unwrap();

        let index = bundle.index().as_ref().unwrap();
        assert!(*index.is_simulated());
        assert_eq!(index.name(), INDEX_NAME);
        assert!(bundle.is_degraded());
    }

    #[tokio::test]
    async fn cycle_without_fallback_omits_index() {
        let config = Config {
            fallback_enabled: false,
            ..stub_config(&["TCS"])
        };
        let source = StubSource::new().with_quote("TCS", dec!(105), dec!(100));
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let bundle = run_cycle(&config, &source, &mut generator).await.unwrap();

        assert!(bundle.index().is_none());
        assert_eq!(bundle.simulated_count(), 0);
        assert!(bundle.is_degraded());
        assert!(bundle.summary_line().contains("index n/a"));
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let base = Duration::from_millis(250);

        assert_eq!(backoff_delay(base, 0), base);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 20), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, u32::MAX), MAX_BACKOFF);
        assert_eq!(backoff_delay(Duration::from_secs(u64::MAX / 2), 3), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn retries_are_capped() {
        let source = StubSource::new().with_failure("TCS", FailureReason::Status(503));
        let mut generator = FallbackQuoteGenerator::seeded(1);
        let settings = FetchSettings {
            max_retries: 20,
            ..settings()
        };

        fetch_all(
            &source,
            &symbols(&["TCS"]),
            &SectorCatalog::nse_fo(),
            &settings,
            &mut generator,
        )
        .await;

        assert_eq!(source.calls(), MAX_RETRIES as usize + 1);
    }

    #[tokio::test]
    async fn intraday_series_is_fetched() {
        let source = StubSource::new().with_series(&[
            (dec!(24700), Some(dec!(24720)), 900),
            (dec!(24720), Some(dec!(24735)), 1_100),
        ]);

        let series = fetch_index_series(&source, &settings()).await.unwrap();

        assert_eq!(series.name(), INDEX_NAME);
        assert_eq!(*series.last().unwrap().close(), dec!(24735));

        let failure = fetch_index_series(&StubSource::new(), &settings())
            .await
            .unwrap_err();
        assert_eq!(failure.reason, FailureReason::Status(404));
    }

    #[tokio::test]
    async fn cycle_carries_intraday_series() {
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_index(dec!(25000), dec!(24750))
            .with_series(&[(dec!(24750), Some(dec!(25000)), 5_000)]);
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let bundle = run_cycle(&stub_config(&["TCS"]), &source, &mut generator)
            .await
            .unwrap();
        assert_eq!(bundle.index_series().as_ref().unwrap().points().len(), 1);
        assert!(!bundle.is_degraded());

        let hidden = Config {
            show_intraday: false,
            ..stub_config(&["TCS"])
        };
        let bundle = run_cycle(&hidden, &source, &mut generator).await.unwrap();
        assert!(bundle.index_series().is_none());
    }

    #[tokio::test]
    async fn missing_intraday_series_does_not_degrade() {
        let source = StubSource::new()
            .with_quote("TCS", dec!(105), dec!(100))
            .with_index(dec!(25000), dec!(24750));
        let mut generator = FallbackQuoteGenerator::seeded(1);

        let bundle = run_cycle(&stub_config(&["TCS"]), &source, &mut generator)
            .await
            .unwrap();

        assert!(bundle.index_series().is_none());
        assert!(!bundle.is_degraded());
    }
}
