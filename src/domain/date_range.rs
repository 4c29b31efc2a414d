//! Inclusive date bounds used to filter series.

use crate::domain::error::EtfError;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` filter. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// True when both bounds are set and `end < start`, so nothing can match.
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }

    /// Records whose date lies inside the range, preserving input order.
    pub fn filter<'a, T, F>(&'a self, items: &'a [T], date_of: F) -> impl Iterator<Item = &'a T> + 'a
    where
        F: Fn(&T) -> NaiveDate + 'a,
    {
        items.iter().filter(move |item| self.contains(date_of(item)))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, EtfError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| EtfError::InvalidDate {
        value: value.to_string(),
    })
}

pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, EtfError> {
    value.map(parse_date).transpose()
}
