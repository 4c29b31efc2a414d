//! Strategy ticker lists.
//!
//! Tickers are strategy names and are matched case-sensitively, so unlike
//! exchange codes they are never upper-cased.

use std::collections::HashSet;

pub const DEFAULT_TICKERS: &[&str] = &[
    "Dividend",
    "Value",
    "LowVol",
    "MarketCap",
    "Momentum",
    "Quality",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickerListError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

pub fn default_tickers() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Parses a comma-separated list, rejecting empty tokens and duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, TickerListError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let ticker = token.trim();
        if ticker.is_empty() {
            return Err(TickerListError::EmptyToken);
        }
        if !seen.insert(ticker.to_string()) {
            return Err(TickerListError::DuplicateTicker(ticker.to_string()));
        }
        tickers.push(ticker.to_string());
    }

    Ok(tickers)
}

/// Drops repeated tickers, keeping the first occurrence.
pub fn dedup_tickers<I, S>(tickers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    tickers
        .into_iter()
        .map(Into::into)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
