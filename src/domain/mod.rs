//! Core domain types and logic.

pub mod config_validation;
pub mod date_range;
pub mod error;
pub mod registry;
pub mod retriever;
pub mod series;
pub mod table;
pub mod tickers;
