use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct NseQuoteDto {
    price_info: Option<NsePriceInfoDto>,
    #[serde(default)]
    market_dept_order_book: Option<NseOrderBookDto>,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct NsePriceInfoDto {
    last_price: Option<Decimal>,
    #[serde(default)]
    open: Option<Decimal>,
    #[serde(default)]
    day_high: Option<Decimal>,
    #[serde(default)]
    day_low: Option<Decimal>,
    #[serde(default)]
    intra_day_high_low: Option<NseHighLowDto>,
    #[serde(default)]
    previous_close: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct NseHighLowDto {
    #[serde(rename = "min")]
    low: Decimal,
    #[serde(rename = "max")]
    high: Decimal,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct NseOrderBookDto {
    #[serde(default)]
    total_buy_quantity: Option<u64>,
    #[serde(default)]
    total_sell_quantity: Option<u64>,
}

impl NseOrderBookDto {
    pub fn total_quantity(&self) -> u64 {
        self.total_buy_quantity
            .unwrap_or(0)
            .saturating_add(self.total_sell_quantity.unwrap_or(0))
    }
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
pub struct NseIndicesDto {
    #[serde(default)]
    data: Vec<NseIndexDto>,
}

#[derive(Clone, Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct NseIndexDto {
    index: String,
    last: Option<Decimal>,
    #[serde(default, alias = "change")]
    variation: Option<Decimal>,
    #[serde(default)]
    percent_change: Option<Decimal>,
    #[serde(default)]
    previous_close: Option<Decimal>,
}
