//! In-memory registry of strategy datasets.
//!
//! The registry owns the dataset port and the list of known tickers. Price
//! and weight series are loaded independently on first use and kept for the
//! lifetime of the registry. Failed loads are not cached.

use crate::domain::error::EtfError;
use crate::domain::series::{Coverage, SeriesRecord, WeightRecord};
use crate::domain::tickers::{dedup_tickers, default_tickers};
use crate::ports::data_port::DatasetPort;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

type Cache<T> = RwLock<HashMap<String, Arc<[T]>>>;

/// Both series of one strategy.
#[derive(Debug, Clone)]
pub struct StrategyDataset {
    pub name: String,
    pub prices: Arc<[SeriesRecord]>,
    pub weights: Arc<[WeightRecord]>,
}

pub struct DatasetRegistry {
    port: Box<dyn DatasetPort + Send + Sync>,
    tickers: Vec<String>,
    prices: Cache<SeriesRecord>,
    weights: Cache<WeightRecord>,
}

impl DatasetRegistry {
    pub fn new<P, I, S>(port: P, tickers: I) -> Self
    where
        P: DatasetPort + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            port: Box::new(port),
            tickers: dedup_tickers(tickers),
            prices: RwLock::new(HashMap::new()),
            weights: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_default_tickers<P>(port: P) -> Self
    where
        P: DatasetPort + Send + Sync + 'static,
    {
        Self::new(port, default_tickers())
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn is_known(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }

    pub fn ensure_known(&self, ticker: &str) -> Result<(), EtfError> {
        if self.is_known(ticker) {
            Ok(())
        } else {
            Err(EtfError::unknown_ticker(ticker))
        }
    }

    pub fn prices(&self, ticker: &str) -> Result<Arc<[SeriesRecord]>, EtfError> {
        self.ensure_known(ticker)?;
        cached(&self.prices, ticker, "prices", || {
            let mut records = self.port.load_prices(ticker)?;
            records.sort_by_key(|r| r.date);
            Ok(records)
        })
    }

    pub fn weights(&self, ticker: &str) -> Result<Arc<[WeightRecord]>, EtfError> {
        self.ensure_known(ticker)?;
        cached(&self.weights, ticker, "weights", || {
            let mut records = self.port.load_weights(ticker)?;
            records.sort_by_key(|r| r.date);
            Ok(records)
        })
    }

    pub fn dataset(&self, ticker: &str) -> Result<StrategyDataset, EtfError> {
        Ok(StrategyDataset {
            name: ticker.to_string(),
            prices: self.prices(ticker)?,
            weights: self.weights(ticker)?,
        })
    }

    pub fn coverage(&self, ticker: &str) -> Result<Option<Coverage>, EtfError> {
        Ok(Coverage::of(&self.prices(ticker)?))
    }

    /// Known tickers that also have price data in the store.
    pub fn available(&self) -> Result<Vec<String>, EtfError> {
        let stored = self.port.list_strategies()?;
        Ok(self
            .tickers
            .iter()
            .filter(|t| stored.contains(t))
            .cloned()
            .collect())
    }

    pub fn is_loaded(&self, ticker: &str) -> bool {
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(ticker)
    }
}

fn cached<T, F>(cache: &Cache<T>, ticker: &str, kind: &str, load: F) -> Result<Arc<[T]>, EtfError>
where
    F: FnOnce() -> Result<Vec<T>, EtfError>,
{
    if let Some(hit) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(ticker)
    {
        debug!(ticker, kind, "series cache hit");
        return Ok(Arc::clone(hit));
    }

    let records: Arc<[T]> = load()?.into();
    debug!(ticker, kind, records = records.len(), "series loaded");

    let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    let entry = guard.entry(ticker.to_string()).or_insert(records);
    Ok(Arc::clone(entry))
}
