//! Concrete adapter implementations for ports, plus output renderers.

pub mod chart_svg;
pub mod csv_export;
pub mod file_config_adapter;
pub mod json_adapter;
