//! Ticker-scoped, date-bounded retrieval into result tables.

use crate::domain::date_range::DateRange;
use crate::domain::error::EtfError;
use crate::domain::registry::DatasetRegistry;
use crate::domain::series::{constituents, Coverage};
use crate::domain::table::{ResultTable, TableBuilder, CLOSE_PRICE};
use crate::domain::tickers::dedup_tickers;
use chrono::NaiveDate;
use tracing::debug;

/// Borrowing front-end over a [`DatasetRegistry`].
#[derive(Clone, Copy)]
pub struct Retriever<'a> {
    registry: &'a DatasetRegistry,
}

impl<'a> Retriever<'a> {
    pub fn new(registry: &'a DatasetRegistry) -> Self {
        Self { registry }
    }

    pub fn tickers(&self) -> &'a [String] {
        self.registry.tickers()
    }

    /// Close prices of `ticker` with `start <= date <= end`.
    ///
    /// An inverted range yields an empty table rather than an error.
    pub fn retrieve(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ResultTable, EtfError> {
        self.prices(ticker, DateRange::between(start, end))
    }

    /// Close prices plus one column per constituent weight.
    pub fn download(&self, ticker: &str, range: DateRange) -> Result<ResultTable, EtfError> {
        let dataset = self.registry.dataset(ticker)?;

        let mut builder = TableBuilder::new();
        builder.add_column(
            CLOSE_PRICE,
            range
                .filter(&dataset.prices[..], |r| r.date)
                .map(|r| (r.date, r.value)),
        );

        let weights: Vec<_> = range.filter(&dataset.weights[..], |r| r.date).collect();
        for name in constituents(&dataset.weights) {
            builder.add_column(
                &name,
                weights
                    .iter()
                    .filter_map(|r| r.weights.get(&name).map(|w| (r.date, *w))),
            );
        }

        let table = builder.build();
        debug!(ticker, rows = table.len(), columns = table.columns().len(), "download");
        Ok(table)
    }

    /// Close prices of several tickers, one column each, joined on date.
    ///
    /// Every ticker is validated before any data is loaded.
    pub fn history(&self, tickers: &[&str], range: DateRange) -> Result<ResultTable, EtfError> {
        let invalid: Vec<&str> = tickers
            .iter()
            .copied()
            .filter(|t| !self.registry.is_known(t))
            .collect();
        if !invalid.is_empty() {
            return Err(EtfError::unknown_ticker(invalid.join(", ")));
        }

        let mut builder = TableBuilder::new();
        for ticker in dedup_tickers(tickers.iter().copied()) {
            let prices = self.registry.prices(&ticker)?;
            builder.add_column(
                &ticker,
                range.filter(&prices[..], |r| r.date).map(|r| (r.date, r.value)),
            );
        }
        Ok(builder.build())
    }

    /// Close prices of `ticker` inside `range`, open bounds allowed.
    pub fn prices(&self, ticker: &str, range: DateRange) -> Result<ResultTable, EtfError> {
        let prices = self.registry.prices(ticker)?;
        let table = ResultTable::from_series(
            CLOSE_PRICE,
            range.filter(&prices[..], |r| r.date).map(|r| (r.date, r.value)),
        );
        debug!(ticker, rows = table.len(), "prices");
        Ok(table)
    }

    pub fn coverage(&self, ticker: &str) -> Result<Option<Coverage>, EtfError> {
        self.registry.coverage(ticker)
    }
}
