use std::{fs::OpenOptions, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_stream::{StreamExt, wrappers::IntervalStream};

use market_pulse::{
    api::MarketClient,
    app::{App, Config, FallbackQuoteGenerator, run_cycle},
    cli::{Cli, Commands},
};

const LOG_FILE: &str = "market-pulse.log";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);
    init_logger(command)?;

    let config = cli.options.into_config()?;
    let client = MarketClient::new(&config.client_settings())?;
    client.prime().await;

    match command {
        Commands::Dashboard => {
            let mut app = App::new(config, client);
            app.run().await?;
        }
        Commands::Once => {
            let mut generator = FallbackQuoteGenerator::new(config.fallback_seed);
            let bundle = run_cycle(&config, &client, &mut generator).await?;
            let json = serde_json::to_string_pretty(&bundle)
                .with_context(|| "Failed to serialize cycle bundle")?;
            println!("{}", json);
        }
        Commands::Watch { cycles } => watch(&config, &client, cycles).await?,
    }

    Ok(())
}

async fn watch(config: &Config, client: &MarketClient, cycles: Option<usize>) -> Result<()> {
    let mut generator = FallbackQuoteGenerator::new(config.fallback_seed);
    let interval = tokio::time::interval(config.refresh_interval.max(Duration::from_secs(1)));
    let mut ticks = IntervalStream::new(interval).take(cycles.unwrap_or(usize::MAX));

    while ticks.next().await.is_some() {
        let bundle = run_cycle(config, client, &mut generator).await?;
        println!("{}", bundle.summary_line());
    }
    Ok(())
}

/// The dashboard owns the terminal, so its logs go to a file instead.
fn init_logger(command: Commands) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    if command == Commands::Dashboard {
        let path = std::env::temp_dir().join(LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
