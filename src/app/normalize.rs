//! Provider payload to canonical [`Quote`] / [`IndexSnapshot`] adapters.
//!
//! Every adapter reduces its payload to a [`Bar`] first, so the change and
//! percentage arithmetic lives in exactly one place (`Quote::new`).
use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;

use crate::{
    api::{
        IndexPayload, ProviderPayload,
        chart_dto::ChartDto,
        nse_dto::{NseIndicesDto, NseQuoteDto},
    },
    error::FetchFailure,
    models::{IndexSeries, IndexSnapshot, IntradayPoint, Quote, SectorCatalog, quote::price_change},
};

/// Latest session reduced to plain prices.
#[derive(Clone, Debug, PartialEq)]
struct Bar {
    open: Decimal,
    high: Decimal,
    low: Decimal,
    last: Decimal,
    previous_close: Decimal,
    volume: u64,
}

pub fn normalize(
    payload: &ProviderPayload,
    symbol: &str,
    catalog: &SectorCatalog,
    now: DateTime<Local>,
) -> Result<Quote, FetchFailure> {
    let bar = match payload {
        ProviderPayload::NsePriceInfo(dto) => nse_bar(dto),
        ProviderPayload::ChartSeries(dto) => chart_bar(dto),
    };
    let bar = bar
        .and_then(Bar::validated)
        .map_err(|detail| FetchFailure::malformed(symbol, detail))?;

    Ok(Quote::new(
        symbol.to_string(),
        catalog.sector_of(symbol).to_string(),
        bar.open,
        bar.high,
        bar.low,
        bar.last,
        bar.previous_close,
        bar.volume,
        now,
        false,
    ))
}

pub fn normalize_index(
    payload: &IndexPayload,
    name: &str,
    now: DateTime<Local>,
) -> Result<IndexSnapshot, FetchFailure> {
    let prices = match payload {
        IndexPayload::NseIndices(dto) => nse_index_prices(dto, name),
        IndexPayload::ChartSeries(dto) => chart_bar(dto).map(|bar| (bar.last, bar.previous_close)),
    };
    let (last, previous_close) = prices
        .and_then(|(last, previous_close)| {
            ensure_non_negative(last, "last")?;
            ensure_non_negative(previous_close, "previousClose")?;
            ensure_representable(last, previous_close)?;
            Ok((last, previous_close))
        })
        .map_err(|detail| FetchFailure::malformed(name, detail))?;

    Ok(IndexSnapshot::new(
        name.to_string(),
        last,
        previous_close,
        now,
        false,
    ))
}

/// Intraday index bars in timestamp order. Untraded intervals and points
/// without a valid timestamp are skipped.
pub fn normalize_series(chart: &ChartDto, name: &str) -> Result<IndexSeries, FetchFailure> {
    let malformed = |detail: String| FetchFailure::malformed(name, detail);

    if let Some(error) = chart.chart().error() {
        if !error.is_null() {
            return Err(malformed(format!("provider error: {}", error)));
        }
    }
    let series = chart
        .series()
        .ok_or_else(|| malformed("chart has no quote series".to_string()))?;

    let mut points = Vec::new();
    for (i, timestamp) in chart.timestamps().iter().enumerate() {
        let Some(close) = series.close().get(i).copied().flatten() else {
            continue;
        };
        let Some(at) = DateTime::<Utc>::from_timestamp(*timestamp, 0) else {
            continue;
        };
        let open = series.open().get(i).copied().flatten().unwrap_or(close);
        ensure_non_negative(close, "close").map_err(malformed)?;
        ensure_non_negative(open, "open").map_err(malformed)?;

        points.push(IntradayPoint::new(
            at.with_timezone(&Local),
            open,
            close,
            series.volume().get(i).copied().flatten().unwrap_or(0),
        ));
    }

    if points.is_empty() {
        return Err(malformed("intraday series has no traded points".to_string()));
    }
    points.sort_by_key(|point| *point.at());
    Ok(IndexSeries::new(name.to_string(), points))
}

fn nse_bar(dto: &NseQuoteDto) -> Result<Bar, String> {
    let price_info = dto
        .price_info()
        .as_ref()
        .ok_or_else(|| "missing 'priceInfo'".to_string())?;
    let last = price_info
        .last_price()
        .ok_or_else(|| "missing 'lastPrice'".to_string())?;

    let intraday = price_info.intra_day_high_low().as_ref();
    let high = price_info
        .day_high()
        .or_else(|| intraday.map(|range| *range.high()))
        .unwrap_or(last);
    let low = price_info
        .day_low()
        .or_else(|| intraday.map(|range| *range.low()))
        .unwrap_or(last);

    let volume = dto
        .market_dept_order_book()
        .as_ref()
        .map(|book| book.total_quantity())
        .unwrap_or(0);

    Ok(Bar {
        open: price_info.open().unwrap_or(last),
        high,
        low,
        last,
        previous_close: price_info.previous_close().unwrap_or(Decimal::ZERO),
        volume,
    })
}

/// Current values come from the last traded point; the previous close is the
/// traded point before it, or the current close when the series has only one.
fn chart_bar(dto: &ChartDto) -> Result<Bar, String> {
    if let Some(error) = dto.chart().error() {
        if !error.is_null() {
            return Err(format!("provider error: {}", error));
        }
    }

    let series = dto
        .series()
        .ok_or_else(|| "chart has no quote series".to_string())?;

    let traded: Vec<(usize, Decimal)> = series
        .close()
        .iter()
        .enumerate()
        .filter_map(|(i, close)| close.map(|close| (i, close)))
        .collect();

    let (last_idx, last) = *traded
        .last()
        .ok_or_else(|| "empty close series".to_string())?;

    let previous_close = match traded.len() {
        0 | 1 => last,
        n => traded[n - 2].1,
    };

    let at = |values: &Vec<Option<Decimal>>| values.get(last_idx).copied().flatten();

    Ok(Bar {
        open: at(series.open()).unwrap_or(last),
        high: at(series.high()).unwrap_or(last),
        low: at(series.low()).unwrap_or(last),
        last,
        previous_close,
        volume: series.volume().get(last_idx).copied().flatten().unwrap_or(0),
    })
}

fn nse_index_prices(dto: &NseIndicesDto, name: &str) -> Result<(Decimal, Decimal), String> {
    let index = dto
        .data()
        .iter()
        .find(|index| index.index().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("index '{}' not in response", name))?;

    let last = index
        .last()
        .ok_or_else(|| format!("index '{}' has no 'last'", name))?;

    let previous_close = match (index.previous_close(), index.variation()) {
        (Some(previous_close), _) => *previous_close,
        (None, Some(change)) => last
            .checked_sub(*change)
            .ok_or_else(|| format!("index '{}' change {} overflows", name, change))?,
        (None, None) => last,
    };

    Ok((last, previous_close))
}

impl Bar {
    fn validated(self) -> Result<Self, String> {
        for (value, field) in [
            (self.open, "open"),
            (self.high, "high"),
            (self.low, "low"),
            (self.last, "last"),
            (self.previous_close, "previousClose"),
        ] {
            ensure_non_negative(value, field)?;
        }
        ensure_representable(self.last, self.previous_close)?;
        Ok(self)
    }
}

fn ensure_representable(last: Decimal, previous_close: Decimal) -> Result<(), String> {
    price_change(last, previous_close)
        .map(|_| ())
        .ok_or_else(|| format!("change from {} to {} overflows", previous_close, last))
}

fn ensure_non_negative(value: Decimal, field: &str) -> Result<(), String> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("negative '{}' {}", field, value));
    }
    Ok(())
}
