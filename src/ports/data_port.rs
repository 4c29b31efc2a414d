//! Dataset access port trait.

use crate::domain::error::EtfError;
use crate::domain::series::{SeriesRecord, WeightRecord};

/// Read-only source of strategy series. Implementations return records
/// sorted ascending by date with unique dates.
pub trait DatasetPort {
    fn load_prices(&self, strategy: &str) -> Result<Vec<SeriesRecord>, EtfError>;

    fn load_weights(&self, strategy: &str) -> Result<Vec<WeightRecord>, EtfError>;

    /// Strategies whose price data is present in the store.
    fn list_strategies(&self) -> Result<Vec<String>, EtfError>;
}
