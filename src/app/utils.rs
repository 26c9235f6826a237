use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ConfigError;

static SYMBOL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9^][A-Z0-9&._-]*$").ok());

/// Trims and upper-cases a configured symbol, rejecting anything a quote
/// endpoint could not accept.
pub fn parse_symbol(raw: &str) -> Result<String, ConfigError> {
    let symbol = raw.trim().to_uppercase();
    if SYMBOL_RE.as_ref().is_some_and(|re| re.is_match(&symbol)) {
        Ok(symbol)
    } else {
        Err(ConfigError::InvalidSymbol(raw.to_string()))
    }
}

pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// `+1.25%` / `-0.40%` as shown on movers and heatmap cells.
pub fn format_pct(value: &Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        format!("{:.2}%", value)
    } else {
        format!("+{:.2}%", value)
    }
}
