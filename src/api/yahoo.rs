use reqwest::Client;

use super::{
    chart_dto::ChartDto,
    utils::{make_request, parse_response_object},
};
use crate::error::FailureReason;

pub const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily bars over the last five sessions; enough for a previous close.
pub async fn get_chart(
    symbol: &str,
    client: &Client,
    base_url: &str,
) -> Result<ChartDto, FailureReason> {
    chart_request(symbol, client, base_url, "5d", "1d").await
}

/// Five-minute bars over the last five sessions.
pub async fn get_intraday(
    symbol: &str,
    client: &Client,
    base_url: &str,
) -> Result<ChartDto, FailureReason> {
    chart_request(symbol, client, base_url, "5d", "5m").await
}

async fn chart_request(
    symbol: &str,
    client: &Client,
    base_url: &str,
    range: &str,
    interval: &str,
) -> Result<ChartDto, FailureReason> {
    let endpoint = format!("v8/finance/chart/{}", symbol);
    let res = make_request(
        client,
        base_url,
        &endpoint,
        &[("range", range), ("interval", interval)],
    )
    .await?;
    parse_response_object::<ChartDto>(res, &format!("No chart for symbol {}", symbol))
}

/// Appends the exchange suffix unless the symbol already names an exchange or
/// is an index (`^NSEI`).
pub fn listing_symbol(symbol: &str, suffix: &str) -> String {
    if suffix.is_empty() || symbol.contains('.') || symbol.starts_with('^') {
        symbol.to_string()
    } else {
        format!("{}{}", symbol, suffix)
    }
}
