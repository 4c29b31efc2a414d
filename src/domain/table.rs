//! Date-indexed result table and the outer join used to assemble it.

use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const CLOSE_PRICE: &str = "Close Price";

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Rows ordered by ascending date, one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Single-column table from `(date, value)` pairs. Pairs are sorted by date.
    pub fn from_series<I>(column: &str, points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut builder = TableBuilder::new();
        builder.add_column(column, points);
        builder.build()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// `(date, value)` pairs of one column, skipping empty cells.
    pub fn column(&self, name: &str) -> Vec<(NaiveDate, f64)> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.values[idx].map(|v| (row.date, v)))
            .collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        let pos = self.rows.binary_search_by_key(&date, |r| r.date).ok()?;
        self.rows[pos].values[idx]
    }
}

/// Accumulates columns and outer-joins them on date.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<String>,
    cells: BTreeMap<NaiveDate, BTreeMap<usize, f64>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Re-adding an existing name merges into that column,
    /// with later values winning on the same date.
    pub fn add_column<I>(&mut self, name: &str, points: I) -> &mut Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let idx = match self.columns.iter().position(|c| c == name) {
            Some(i) => i,
            None => {
                self.columns.push(name.to_string());
                self.columns.len() - 1
            }
        };
        for (date, value) in points {
            self.cells.entry(date).or_default().insert(idx, value);
        }
        self
    }

    pub fn build(self) -> ResultTable {
        let width = self.columns.len();
        let rows = self
            .cells
            .into_iter()
            .map(|(date, cells)| {
                let mut values = vec![None; width];
                for (idx, value) in cells {
                    values[idx] = Some(value);
                }
                TableRow { date, values }
            })
            .collect();
        ResultTable {
            columns: self.columns,
            rows,
        }
    }
}
