use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT},
};
use strum_macros::{Display, EnumIter, EnumString};

use super::{
    chart_dto::ChartDto,
    nse,
    nse_dto::{NseIndicesDto, NseQuoteDto},
    yahoo,
};
use crate::error::FetchFailure;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApiProvider {
    Nse,
    Yahoo,
}

impl ApiProvider {
    pub fn to_str(&self) -> &str {
        match self {
            ApiProvider::Nse => "NSE",
            ApiProvider::Yahoo => "Yahoo Finance",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiProvider::Nse => nse::BASE_URL,
            ApiProvider::Yahoo => yahoo::BASE_URL,
        }
    }
}

/// Raw per-symbol response, one variant per provider shape.
#[derive(Clone, Debug)]
pub enum ProviderPayload {
    NsePriceInfo(NseQuoteDto),
    ChartSeries(ChartDto),
}

/// Raw benchmark-index response.
#[derive(Clone, Debug)]
pub enum IndexPayload {
    NseIndices(NseIndicesDto),
    ChartSeries(ChartDto),
}

/// Anything that can produce raw quote and index payloads. The live
/// implementation is [`MarketClient`]; tests plug in canned sources.
pub trait MarketSource {
    fn fetch_quote(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<ProviderPayload, FetchFailure>> + Send;

    fn fetch_index(&self) -> impl Future<Output = Result<IndexPayload, FetchFailure>> + Send;

    /// Intraday bars of the benchmark index.
    fn fetch_index_series(&self) -> impl Future<Output = Result<ChartDto, FetchFailure>> + Send;

    /// Name the index snapshot is reported under.
    fn index_name(&self) -> &str;
}

#[derive(Clone, Debug)]
pub struct ClientSettings {
    pub provider: ApiProvider,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub index_name: String,
    pub index_symbol: String,
    pub listing_suffix: String,
}

/// HTTP-backed [`MarketSource`]. The inner client and its cookie jar are
/// shared read-only by every concurrent request.
#[derive(Clone, Debug)]
pub struct MarketClient {
    client: Client,
    provider: ApiProvider,
    base_url: String,
    chart_base_url: String,
    index_name: String,
    index_symbol: String,
    listing_suffix: String,
}

impl MarketClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        if settings.accept_invalid_certs {
            log::warn!(
                "TLS certificate verification is DISABLED for {}",
                settings.provider.to_str()
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .with_context(|| format!("Failed to build {} client", settings.provider.to_str()))?;

        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| settings.provider.default_base_url().to_string());
        // NSE has no chart API; intraday bars always come from the chart host.
        let chart_base_url = match settings.provider {
            ApiProvider::Yahoo => base_url.clone(),
            ApiProvider::Nse => yahoo::BASE_URL.to_string(),
        };

        Ok(Self {
            client,
            provider: settings.provider,
            base_url,
            chart_base_url,
            index_name: settings.index_name.clone(),
            index_symbol: settings.index_symbol.clone(),
            listing_suffix: settings.listing_suffix.clone(),
        })
    }

    pub fn provider(&self) -> ApiProvider {
        self.provider
    }

    /// Collects session cookies before the first data call. A failed priming
    /// request is logged and otherwise ignored; data calls may still succeed.
    pub async fn prime(&self) {
        if self.provider != ApiProvider::Nse {
            return;
        }
        match nse::prime_session(&self.client, &self.base_url).await {
            Ok(()) => log::debug!("Primed {} session", self.provider.to_str()),
            Err(reason) => log::warn!(
                "Failed to prime {} session: {}",
                self.provider.to_str(),
                reason
            ),
        }
    }
}

impl MarketSource for MarketClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<ProviderPayload, FetchFailure> {
        let payload = match self.provider {
            ApiProvider::Nse => nse::get_quote(symbol, &self.client, &self.base_url)
                .await
                .map(ProviderPayload::NsePriceInfo),
            ApiProvider::Yahoo => {
                let listing = yahoo::listing_symbol(symbol, &self.listing_suffix);
                yahoo::get_chart(&listing, &self.client, &self.base_url)
                    .await
                    .map(ProviderPayload::ChartSeries)
            }
        };
        payload.map_err(|reason| FetchFailure::new(symbol, reason))
    }

    async fn fetch_index(&self) -> Result<IndexPayload, FetchFailure> {
        let payload = match self.provider {
            ApiProvider::Nse => nse::get_indices(&self.client, &self.base_url)
                .await
                .map(IndexPayload::NseIndices),
            ApiProvider::Yahoo => yahoo::get_chart(&self.index_symbol, &self.client, &self.base_url)
                .await
                .map(IndexPayload::ChartSeries),
        };
        payload.map_err(|reason| FetchFailure::new(&self.index_name, reason))
    }

    async fn fetch_index_series(&self) -> Result<ChartDto, FetchFailure> {
        yahoo::get_intraday(&self.index_symbol, &self.client, &self.chart_base_url)
            .await
            .map_err(|reason| FetchFailure::new(&self.index_name, reason))
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }
}
