#![allow(dead_code)]

use chrono::NaiveDate;
use etfseries::domain::error::EtfError;
use etfseries::domain::series::{SeriesRecord, WeightRecord};
use etfseries::ports::data_port::DatasetPort;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDatasetPort {
    pub prices: HashMap<String, Vec<SeriesRecord>>,
    pub weights: HashMap<String, Vec<WeightRecord>>,
    pub errors: HashMap<String, String>,
    pub loads: Arc<AtomicUsize>,
}

impl MockDatasetPort {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            weights: HashMap::new(),
            errors: HashMap::new(),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_prices(mut self, strategy: &str, records: Vec<SeriesRecord>) -> Self {
        self.prices.insert(strategy.to_string(), records);
        self
    }

    pub fn with_weights(mut self, strategy: &str, records: Vec<WeightRecord>) -> Self {
        self.weights.insert(strategy.to_string(), records);
        self
    }

    pub fn with_error(mut self, strategy: &str, reason: &str) -> Self {
        self.errors.insert(strategy.to_string(), reason.to_string());
        self
    }

    pub fn load_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.loads)
    }

    fn check(&self, strategy: &str) -> Result<(), EtfError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.errors.get(strategy) {
            Some(reason) => Err(EtfError::data_unavailable(strategy, reason.clone())),
            None => Ok(()),
        }
    }
}

impl DatasetPort for MockDatasetPort {
    fn load_prices(&self, strategy: &str) -> Result<Vec<SeriesRecord>, EtfError> {
        self.check(strategy)?;
        self.prices
            .get(strategy)
            .cloned()
            .ok_or_else(|| EtfError::data_unavailable(strategy, "no price file"))
    }

    fn load_weights(&self, strategy: &str) -> Result<Vec<WeightRecord>, EtfError> {
        self.check(strategy)?;
        self.weights
            .get(strategy)
            .cloned()
            .ok_or_else(|| EtfError::data_unavailable(strategy, "no weight file"))
    }

    fn list_strategies(&self) -> Result<Vec<String>, EtfError> {
        let mut names: Vec<String> = self.prices.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(d: &str, value: f64) -> SeriesRecord {
    SeriesRecord::new(NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(), value)
}

pub fn weight(d: &str, pairs: &[(&str, f64)]) -> WeightRecord {
    WeightRecord {
        date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
        weights: pairs
            .iter()
            .map(|(name, w)| (name.to_string(), *w))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn dividend_prices() -> Vec<SeriesRecord> {
    vec![
        record("2020-01-02", 100.0),
        record("2020-06-15", 110.0),
        record("2021-01-04", 120.0),
    ]
}

/// Daily series starting at `start`, one record per calendar day.
pub fn generate_records(start: &str, count: usize, start_price: f64) -> Vec<SeriesRecord> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| SeriesRecord::new(start + chrono::Duration::days(i as i64), start_price + i as f64))
        .collect()
}

/// Writes `<base>/<strategy>/SP500<strategy>ETF{Prices,Weights}.json`.
pub fn write_strategy(base: &Path, strategy: &str, prices: &str, weights: Option<&str>) {
    let dir = base.join(strategy);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("SP500{strategy}ETFPrices.json")), prices).unwrap();
    if let Some(body) = weights {
        fs::write(dir.join(format!("SP500{strategy}ETFWeights.json")), body).unwrap();
    }
}

pub fn seed_data_dir(base: &Path) {
    write_strategy(
        base,
        "Dividend",
        r#"{"2020-01-02": 100.0, "2020-06-15": 110.0, "2021-01-04": 120.0}"#,
        Some(r#"{"2020-01-02": {"AAPL": 0.6, "MSFT": 0.4}, "2020-06-15": {"AAPL": 0.55, "MSFT": 0.45}}"#),
    );
    write_strategy(
        base,
        "Value",
        r#"{"2020-01-03": 50.0, "2020-06-15": 55.0}"#,
        Some(r#"{"2020-01-03": {"XOM": 1.0}}"#),
    );
    write_strategy(base, "LowVol", "{not json", None);
}
