use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

pub const DEFAULT_SECTOR: &str = "Others";

/// Mean `change_pct` per sector. Sectors with no quotes are absent.
pub type SectorAggregate = BTreeMap<String, Decimal>;

/// NSE F&O watch-list and the sector each name trades under.
pub const NSE_FO_SECTORS: [(&str, &str); 39] = [
    ("RELIANCE", "Oil & Gas"),
    ("TCS", "Technology"),
    ("HDFCBANK", "Banking"),
    ("INFY", "Technology"),
    ("HINDUNILVR", "FMCG"),
    ("ICICIBANK", "Banking"),
    ("KOTAKBANK", "Banking"),
    ("SBIN", "Banking"),
    ("BHARTIARTL", "Telecom"),
    ("ASIANPAINT", "Paint"),
    ("ITC", "FMCG"),
    ("LT", "Infrastructure"),
    ("AXISBANK", "Banking"),
    ("MARUTI", "Automobile"),
    ("TITAN", "Jewelry"),
    ("SUNPHARMA", "Pharma"),
    ("ULTRACEMCO", "Cement"),
    ("NESTLEIND", "FMCG"),
    ("WIPRO", "Technology"),
    ("M&M", "Automobile"),
    ("BAJFINANCE", "Finance"),
    ("ONGC", "Oil & Gas"),
    ("NTPC", "Power"),
    ("POWERGRID", "Power"),
    ("COALINDIA", "Mining"),
    ("TATASTEEL", "Steel"),
    ("ADANIENT", "Conglomerate"),
    ("TECHM", "Technology"),
    ("HCLTECH", "Technology"),
    ("TATAMOTORS", "Automobile"),
    ("DRREDDY", "Pharma"),
    ("BAJAJFINSV", "Finance"),
    ("GRASIM", "Textile"),
    ("CIPLA", "Pharma"),
    ("BRITANNIA", "FMCG"),
    ("APOLLOHOSP", "Healthcare"),
    ("DIVISLAB", "Pharma"),
    ("EICHERMOT", "Automobile"),
    ("BPCL", "Oil & Gas"),
];

/// Static symbol to sector lookup, built once at start-up.
#[derive(Clone, Debug, Default)]
pub struct SectorCatalog {
    sectors: HashMap<String, String>,
}

impl SectorCatalog {
    pub fn new(sectors: HashMap<String, String>) -> Self {
        Self { sectors }
    }

    pub fn nse_fo() -> Self {
        NSE_FO_SECTORS
            .iter()
            .map(|(symbol, sector)| (symbol.to_string(), sector.to_string()))
            .collect()
    }

    /// Exact symbol first, then the symbol with its exchange suffix removed
    /// (`RELIANCE.NS` resolves like `RELIANCE`).
    pub fn sector_of(&self, symbol: &str) -> &str {
        if let Some(sector) = self.sectors.get(symbol) {
            return sector;
        }

        let mut symbol_split = symbol.split('.');
        let standalone_symbol = symbol_split.next().unwrap_or("");
        self.sectors
            .get(standalone_symbol)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SECTOR)
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl FromIterator<(String, String)> for SectorCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
