//! JSON file dataset adapter.
//!
//! Layout: `<base>/<Strategy>/SP500<Strategy>ETFPrices.json` and
//! `<base>/<Strategy>/SP500<Strategy>ETFWeights.json`.
//!
//! Price files are either a date-keyed object (`{"2020-01-02": 100.0}`) or an
//! array of `{"date": ..., "value": ...}` objects. Weight files are a
//! date-keyed object of constituent weights or an array of
//! `{"date": ..., "weights": {...}}` objects.

use crate::domain::error::EtfError;
use crate::domain::series::{SeriesRecord, WeightRecord};
use crate::ports::data_port::DatasetPort;
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Prices,
    Weights,
}

impl SeriesKind {
    fn suffix(self) -> &'static str {
        match self {
            SeriesKind::Prices => "Prices",
            SeriesKind::Weights => "Weights",
        }
    }
}

/// JSON object entries in document order. Repeated keys are kept so they can
/// be rejected instead of the last one silently winning.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceFile {
    Keyed(Entries<f64>),
    Records(Vec<PriceEntry>),
}

#[derive(Deserialize)]
struct PriceEntry {
    date: String,
    value: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeightFile {
    Keyed(Entries<Entries<f64>>),
    Records(Vec<WeightEntry>),
}

#[derive(Deserialize)]
struct WeightEntry {
    date: String,
    weights: Entries<f64>,
}

pub struct JsonFileAdapter {
    base_path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn series_path(&self, strategy: &str, kind: SeriesKind) -> PathBuf {
        self.base_path
            .join(strategy)
            .join(format!("SP500{}ETF{}.json", strategy, kind.suffix()))
    }

    fn read(&self, strategy: &str, kind: SeriesKind) -> Result<(PathBuf, String), EtfError> {
        let path = self.series_path(strategy, kind);
        let content = fs::read_to_string(&path).map_err(|e| {
            EtfError::data_unavailable(path.display().to_string(), format!("failed to read: {e}"))
        })?;
        debug!(path = %path.display(), bytes = content.len(), "read series file");
        Ok((path, content))
    }
}

impl DatasetPort for JsonFileAdapter {
    fn load_prices(&self, strategy: &str) -> Result<Vec<SeriesRecord>, EtfError> {
        let (path, content) = self.read(strategy, SeriesKind::Prices)?;
        parse_prices(&content).map_err(|reason| {
            EtfError::data_unavailable(path.display().to_string(), reason)
        })
    }

    fn load_weights(&self, strategy: &str) -> Result<Vec<WeightRecord>, EtfError> {
        let (path, content) = self.read(strategy, SeriesKind::Weights)?;
        parse_weights(&content).map_err(|reason| {
            EtfError::data_unavailable(path.display().to_string(), reason)
        })
    }

    fn list_strategies(&self) -> Result<Vec<String>, EtfError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            EtfError::data_unavailable(
                self.base_path.display().to_string(),
                format!("failed to read directory: {e}"),
            )
        })?;

        let mut strategies = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                EtfError::data_unavailable(
                    self.base_path.display().to_string(),
                    format!("directory entry error: {e}"),
                )
            })?;

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if self.series_path(&name, SeriesKind::Prices).is_file() {
                strategies.push(name);
            }
        }

        strategies.sort();
        Ok(strategies)
    }
}

/// Parses a price file body into records sorted by date.
pub fn parse_prices(content: &str) -> Result<Vec<SeriesRecord>, String> {
    let file: PriceFile = serde_json::from_str(content)
        .map_err(|e| format!("expected a date-keyed object or array of {{date, value}}: {e}"))?;

    let raw: Vec<(String, f64)> = match file {
        PriceFile::Keyed(entries) => entries.0,
        PriceFile::Records(entries) => entries.into_iter().map(|e| (e.date, e.value)).collect(),
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    for (date_str, value) in raw {
        let date = parse_series_date(&date_str)?;
        if !seen.insert(date) {
            return Err(format!("duplicate date {date}"));
        }
        if !value.is_finite() {
            return Err(format!("non-finite value on {date}"));
        }
        records.push(SeriesRecord::new(date, value));
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Parses a weight file body into records sorted by date.
pub fn parse_weights(content: &str) -> Result<Vec<WeightRecord>, String> {
    let file: WeightFile = serde_json::from_str(content).map_err(|e| {
        format!("expected a date-keyed object of weights or array of {{date, weights}}: {e}")
    })?;

    let raw: Vec<(String, Entries<f64>)> = match file {
        WeightFile::Keyed(entries) => entries.0,
        WeightFile::Records(entries) => {
            entries.into_iter().map(|e| (e.date, e.weights)).collect()
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    for (date_str, weights) in raw {
        let date = parse_series_date(&date_str)?;
        if !seen.insert(date) {
            return Err(format!("duplicate date {date}"));
        }
        let mut by_name = BTreeMap::new();
        for (name, w) in weights.0 {
            if !w.is_finite() {
                return Err(format!("non-finite weight for {name} on {date}"));
            }
            if by_name.insert(name.clone(), w).is_some() {
                return Err(format!("duplicate constituent {name} on {date}"));
            }
        }
        let weights = by_name;
        records.push(WeightRecord { date, weights });
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time of day which is dropped.
pub fn parse_series_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| format!("invalid date '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::create_dir(path.join("Dividend")).unwrap();
        fs::write(
            path.join("Dividend/SP500DividendETFPrices.json"),
            r#"{"2021-01-04": 120.0, "2020-01-02": 100.0, "2020-06-15": 110.0}"#,
        )
        .unwrap();
        fs::write(
            path.join("Dividend/SP500DividendETFWeights.json"),
            r#"{"2020-01-02": {"AAPL": 0.6, "MSFT": 0.4}}"#,
        )
        .unwrap();

        fs::create_dir(path.join("Value")).unwrap();
        fs::write(
            path.join("Value/SP500ValueETFPrices.json"),
            r#"[{"date": "2020-01-03", "value": 50.0}]"#,
        )
        .unwrap();

        fs::create_dir(path.join("Empty")).unwrap();
        fs::write(path.join("stray.json"), "{}").unwrap();

        (dir, path)
    }

    #[test]
    fn series_path_layout() {
        let adapter = JsonFileAdapter::new("/data");
        assert_eq!(
            adapter.series_path("LowVol", SeriesKind::Prices),
            PathBuf::from("/data/LowVol/SP500LowVolETFPrices.json")
        );
        assert_eq!(
            adapter.series_path("LowVol", SeriesKind::Weights),
            PathBuf::from("/data/LowVol/SP500LowVolETFWeights.json")
        );
    }

    #[test]
    fn load_prices_from_keyed_object() {
        let (_dir, path) = setup_test_data();
        let adapter = JsonFileAdapter::new(path);

        let prices = adapter.load_prices("Dividend").unwrap();
        assert_eq!(
            prices,
            vec![
                SeriesRecord::new(date(2020, 1, 2), 100.0),
                SeriesRecord::new(date(2020, 6, 15), 110.0),
                SeriesRecord::new(date(2021, 1, 4), 120.0),
            ]
        );
    }

    #[test]
    fn load_prices_from_record_array() {
        let (_dir, path) = setup_test_data();
        let adapter = JsonFileAdapter::new(path);

        let prices = adapter.load_prices("Value").unwrap();
        assert_eq!(prices, vec![SeriesRecord::new(date(2020, 1, 3), 50.0)]);
    }

    #[test]
    fn load_weights_from_keyed_object() {
        let (_dir, path) = setup_test_data();
        let adapter = JsonFileAdapter::new(path);

        let weights = adapter.load_weights("Dividend").unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].weights.get("MSFT"), Some(&0.4));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = JsonFileAdapter::new(path);

        let err = adapter.load_weights("Value").unwrap_err();
        assert!(
            matches!(err, EtfError::DataUnavailable { path, .. } if path.ends_with("SP500ValueETFWeights.json"))
        );
        assert!(adapter.load_prices("Momentum").is_err());
    }

    #[test]
    fn list_strategies_requires_price_file() {
        let (_dir, path) = setup_test_data();
        let adapter = JsonFileAdapter::new(path);

        assert_eq!(adapter.list_strategies().unwrap(), vec!["Dividend", "Value"]);
    }

    #[test]
    fn list_strategies_missing_base_dir() {
        let adapter = JsonFileAdapter::new("/nonexistent/etf/data");
        assert!(matches!(
            adapter.list_strategies(),
            Err(EtfError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn parse_prices_rejects_wrong_shape() {
        assert!(parse_prices(r#"{"2020-01-02": "high"}"#).is_err());
        assert!(parse_prices(r#"[{"day": "2020-01-02", "value": 1.0}]"#).is_err());
        assert!(parse_prices("not json").is_err());
    }

    #[test]
    fn parse_prices_rejects_bad_date() {
        let err = parse_prices(r#"{"02/01/2020": 1.0}"#).unwrap_err();
        assert!(err.contains("02/01/2020"));
    }

    #[test]
    fn parse_prices_rejects_duplicate_dates() {
        let body = r#"[{"date": "2020-01-02", "value": 1.0}, {"date": "2020-01-02", "value": 2.0}]"#;
        assert!(parse_prices(body).unwrap_err().contains("duplicate"));
    }

    #[test]
    fn parse_prices_rejects_repeated_date_key() {
        let err = parse_prices(r#"{"2020-01-02": 100.0, "2020-01-02": 999.0}"#).unwrap_err();
        assert!(err.contains("duplicate date 2020-01-02"));
    }

    #[test]
    fn parse_prices_rejects_same_day_in_two_formats() {
        let body = r#"{"2020-01-02": 100.0, "2020-01-02 00:00:00": 101.0}"#;
        assert!(parse_prices(body).unwrap_err().contains("duplicate"));
    }

    #[test]
    fn parse_weights_rejects_repeated_date_key() {
        let body = r#"{"2020-01-02": {"A": 1.0}, "2020-01-02": {"B": 2.0}}"#;
        assert!(parse_weights(body).unwrap_err().contains("duplicate date 2020-01-02"));
    }

    #[test]
    fn parse_weights_rejects_repeated_constituent() {
        let body = r#"{"2020-01-02": {"AAPL": 0.5, "AAPL": 0.7}}"#;
        assert!(parse_weights(body).unwrap_err().contains("duplicate constituent AAPL"));

        let body = r#"[{"date": "2020-01-02", "weights": {"AAPL": 0.5, "AAPL": 0.7}}]"#;
        assert!(parse_weights(body).is_err());
    }

    #[test]
    fn load_prices_rejects_repeated_date_key_on_disk() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Quality")).unwrap();
        fs::write(
            dir.path().join("Quality/SP500QualityETFPrices.json"),
            r#"{"2020-01-02": 1.0, "2020-01-02": 2.0}"#,
        )
        .unwrap();
        let adapter = JsonFileAdapter::new(dir.path());

        let err = adapter.load_prices("Quality").unwrap_err();
        assert!(matches!(err, EtfError::DataUnavailable { reason, .. } if reason.contains("duplicate")));
    }

    #[cfg(unix)]
    #[test]
    fn list_strategies_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_dir, path) = setup_test_data();
        let bad = path.join(OsStr::from_bytes(b"Bad\xff"));
        fs::create_dir(&bad).unwrap();
        fs::write(bad.join(OsStr::from_bytes(b"SP500Bad\xffETFPrices.json")), "{}").unwrap();
        let adapter = JsonFileAdapter::new(path);

        assert_eq!(adapter.list_strategies().unwrap(), vec!["Dividend", "Value"]);
    }

    #[test]
    fn parse_prices_collapses_time_of_day() {
        let records = parse_prices(r#"{"2020-01-02 00:00:00": 1.0, "2020-01-03T00:00:00": 2.0}"#)
            .unwrap();
        assert_eq!(records[0].date, date(2020, 1, 2));
        assert_eq!(records[1].date, date(2020, 1, 3));
    }

    #[test]
    fn parse_prices_empty_object() {
        assert!(parse_prices("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_weights_from_record_array() {
        let body = r#"[{"date": "2020-01-03", "weights": {"XOM": 1.0}}, {"date": "2020-01-02", "weights": {}}]"#;
        let records = parse_weights(body).unwrap();
        assert_eq!(records[0].date, date(2020, 1, 2));
        assert!(records[0].weights.is_empty());
        assert_eq!(records[1].weights.get("XOM"), Some(&1.0));
    }

    #[test]
    fn parse_weights_rejects_scalar_entries() {
        assert!(parse_weights(r#"{"2020-01-02": 0.5}"#).is_err());
    }
}
