//! Dated price and weight observations.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One observation of a strategy's price on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRecord {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesRecord {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Per-constituent weights of a strategy on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub weights: BTreeMap<String, f64>,
}

/// Date span and size of a loaded series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub count: usize,
}

impl Coverage {
    /// `None` for an empty series. Assumes `records` is sorted by date.
    pub fn of(records: &[SeriesRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;
        Some(Self {
            first: first.date,
            last: last.date,
            count: records.len(),
        })
    }
}

/// Sorted, de-duplicated constituent names across a weight series.
pub fn constituents(records: &[WeightRecord]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .flat_map(|r| r.weights.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}
