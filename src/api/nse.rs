use reqwest::Client;

use super::{
    nse_dto::{NseIndicesDto, NseQuoteDto},
    utils::{make_request, parse_response_object},
};
use crate::error::FailureReason;

pub const BASE_URL: &str = "https://www.nseindia.com";

/// Hits the home page so the shared cookie jar holds the session cookies the
/// data endpoints check for.
pub async fn prime_session(client: &Client, base_url: &str) -> Result<(), FailureReason> {
    let res = client
        .get(base_url)
        .send()
        .await
        .map_err(|e| FailureReason::Transport(e.to_string()))?;

    if !res.status().is_success() {
        return Err(FailureReason::Status(res.status().as_u16()));
    }
    Ok(())
}

pub async fn get_quote(
    symbol: &str,
    client: &Client,
    base_url: &str,
) -> Result<NseQuoteDto, FailureReason> {
    let res = make_request(client, base_url, "api/quote-equity", &[("symbol", symbol)]).await?;
    parse_response_object::<NseQuoteDto>(res, &format!("No quote for symbol {}", symbol))
}

pub async fn get_indices(client: &Client, base_url: &str) -> Result<NseIndicesDto, FailureReason> {
    let res = make_request(client, base_url, "api/allIndices", &[]).await?;
    parse_response_object::<NseIndicesDto>(res, "No index data")
}
