//! Domain error types.

use crate::domain::tickers::TickerListError;

/// Top-level error type for etfseries.
#[derive(Debug, thiserror::Error)]
pub enum EtfError {
    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("data unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("invalid ticker list: {0}")]
    TickerList(#[from] TickerListError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EtfError {
    pub fn unknown_ticker(ticker: impl Into<String>) -> Self {
        EtfError::UnknownTicker {
            ticker: ticker.into(),
        }
    }

    pub fn data_unavailable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EtfError::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<&EtfError> for std::process::ExitCode {
    fn from(err: &EtfError) -> Self {
        let code: u8 = match err {
            EtfError::Io(_) => 1,
            EtfError::ConfigParse { .. }
            | EtfError::ConfigInvalid { .. }
            | EtfError::InvalidDate { .. }
            | EtfError::TickerList(_) => 2,
            EtfError::UnknownTicker { .. } => 3,
            EtfError::DataUnavailable { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
