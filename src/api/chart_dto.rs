use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

// Yahoo-style `chart` schema. Series entries are null for intervals without trades.
#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct ChartDto {
    chart: ChartResponseDto,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct ChartResponseDto {
    #[serde(default)]
    result: Option<Vec<ChartResultDto>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct ChartResultDto {
    #[serde(default)]
    meta: Option<ChartMetaDto>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: IndicatorsDto,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetaDto {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct IndicatorsDto {
    #[serde(default)]
    quote: Vec<SeriesDto>,
}

#[derive(Clone, Debug, Default, Deserialize, Getters, new)]
pub struct SeriesDto {
    #[serde(default)]
    open: Vec<Option<Decimal>>,
    #[serde(default)]
    high: Vec<Option<Decimal>>,
    #[serde(default)]
    low: Vec<Option<Decimal>>,
    #[serde(default)]
    close: Vec<Option<Decimal>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartDto {
    /// The first series of the first result, if the provider returned one.
    pub fn series(&self) -> Option<&SeriesDto> {
        self.chart
            .result
            .as_ref()?
            .first()?
            .indicators
            .quote
            .first()
    }

    /// Epoch seconds aligned with the series entries.
    pub fn timestamps(&self) -> &[i64] {
        self.chart
            .result
            .as_ref()
            .and_then(|results| results.first())
            .map(|result| result.timestamp.as_slice())
            .unwrap_or(&[])
    }
}
