//! Configuration validation.
//!
//! Checks the `[data]` and `[plot]` sections before any series is read.

use crate::domain::error::EtfError;
use crate::domain::tickers::parse_tickers;
use crate::ports::config_port::ConfigPort;

/// Smallest chart width or height that leaves a plot area inside the margins.
pub const MIN_PLOT_DIMENSION: i64 = 121;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), EtfError> {
    validate_data_dir(config)?;
    validate_tickers(config)?;
    validate_color(config)?;
    validate_dimension(config, "width")?;
    validate_dimension(config, "height")?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), EtfError> {
    match config.get_string("data", "dir") {
        Some(dir) if dir.trim().is_empty() => Err(EtfError::ConfigInvalid {
            section: "data".to_string(),
            key: "dir".to_string(),
            reason: "dir must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), EtfError> {
    let Some(tickers) = config.get_string("data", "tickers") else {
        return Ok(());
    };
    parse_tickers(&tickers).map_err(|e| EtfError::ConfigInvalid {
        section: "data".to_string(),
        key: "tickers".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_color(config: &dyn ConfigPort) -> Result<(), EtfError> {
    match config.get_string("plot", "color") {
        Some(color) if color.trim().is_empty() => Err(EtfError::ConfigInvalid {
            section: "plot".to_string(),
            key: "color".to_string(),
            reason: "color must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_dimension(config: &dyn ConfigPort, key: &str) -> Result<(), EtfError> {
    if config.get_string("plot", key).is_none() {
        return Ok(());
    }
    let value = config.get_int("plot", key, 0);
    if value < MIN_PLOT_DIMENSION {
        return Err(EtfError::ConfigInvalid {
            section: "plot".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be an integer of at least {MIN_PLOT_DIMENSION}"),
        });
    }
    Ok(())
}
