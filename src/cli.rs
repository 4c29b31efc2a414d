//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::chart_svg::{render_price_chart, ChartStyle};
use crate::adapters::csv_export::write_csv;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonFileAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::date_range::{parse_date, parse_optional_date, DateRange};
use crate::domain::error::EtfError;
use crate::domain::registry::DatasetRegistry;
use crate::domain::retriever::Retriever;
use crate::domain::series::Coverage;
use crate::domain::table::{ResultTable, CLOSE_PRICE};
use crate::domain::tickers::{default_tickers, parse_tickers};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Parser, Debug)]
#[command(name = "etfseries", about = "Strategy ETF price and weight retrieval")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding one sub-directory per strategy
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Close prices between two dates (inclusive) as CSV
    Retrieve {
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Close prices and constituent weights as CSV
    Download {
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Close prices of several tickers side by side as CSV
    History {
        /// Comma-separated ticker list
        #[arg(long)]
        tickers: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the price series as an SVG chart
    Plot {
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show the date range of price data
    Info {
        #[arg(short, long)]
        ticker: Option<String>,
    },
    /// List known tickers and whether their data is present
    List,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub tickers: Vec<String>,
    pub chart: ChartStyle,
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli) -> Result<(), EtfError> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_config(&config)?;

    let settings = build_settings(&config, cli.data_dir.as_deref())?;
    let registry = DatasetRegistry::new(
        JsonFileAdapter::new(settings.data_dir.clone()),
        settings.tickers.clone(),
    );
    let retriever = Retriever::new(&registry);

    match cli.command {
        Command::Retrieve {
            ticker,
            start,
            end,
            output,
        } => {
            let table = retriever.retrieve(&ticker, parse_date(&start)?, parse_date(&end)?)?;
            emit_table(&table, output.as_deref())
        }
        Command::Download {
            ticker,
            start,
            end,
            output,
        } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let table = retriever.download(&ticker, range)?;
            emit_table(&table, output.as_deref())
        }
        Command::History {
            tickers,
            start,
            end,
            output,
        } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let requested = parse_tickers(&tickers)?;
            let requested: Vec<&str> = requested.iter().map(String::as_str).collect();
            let table = retriever.history(&requested, range)?;
            emit_table(&table, output.as_deref())
        }
        Command::Plot {
            ticker,
            color,
            start,
            end,
            output,
        } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let style = ChartStyle {
                color: color.unwrap_or(settings.chart.color),
                ..settings.chart
            };
            run_plot(&retriever, &ticker, range, &style, &output)
        }
        Command::Info { ticker } => run_info(&retriever, ticker.as_deref()),
        Command::List => run_list(&registry),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, EtfError> {
    FileConfigAdapter::from_file(path).map_err(|e| EtfError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Merges config values with defaults. A `--data-dir` flag wins over `[data] dir`.
pub fn build_settings(
    config: &dyn ConfigPort,
    data_dir_override: Option<&Path>,
) -> Result<Settings, EtfError> {
    let data_dir = match data_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => config
            .get_string("data", "dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
    };

    let tickers = match config.get_string("data", "tickers") {
        Some(list) => parse_tickers(&list).map_err(|e| EtfError::ConfigInvalid {
            section: "data".into(),
            key: "tickers".into(),
            reason: e.to_string(),
        })?,
        None => default_tickers(),
    };

    let defaults = ChartStyle::default();
    let chart = ChartStyle {
        color: config
            .get_string("plot", "color")
            .map(|c| c.trim().to_string())
            .unwrap_or(defaults.color),
        width: config.get_int("plot", "width", defaults.width as i64) as f64,
        height: config.get_int("plot", "height", defaults.height as i64) as f64,
    };

    Ok(Settings {
        data_dir,
        tickers,
        chart,
    })
}

pub fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, EtfError> {
    Ok(DateRange::new(
        parse_optional_date(start)?,
        parse_optional_date(end)?,
    ))
}

fn emit_table(table: &ResultTable, output: Option<&Path>) -> Result<(), EtfError> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            write_csv(table, BufWriter::new(file))?;
            info!("Wrote {} rows to {}", table.len(), path.display());
        }
        None => write_csv(table, io::stdout().lock())?,
    }
    if table.is_empty() {
        warn!("no records in the requested date range");
    }
    Ok(())
}

fn run_plot(
    retriever: &Retriever<'_>,
    ticker: &str,
    range: DateRange,
    style: &ChartStyle,
    output: &Path,
) -> Result<(), EtfError> {
    let table = retriever.prices(ticker, range)?;
    let svg = render_price_chart(&format!("SP500{ticker}"), &table.column(CLOSE_PRICE), style);
    fs::write(output, svg)?;
    info!("Chart written to {}", output.display());
    Ok(())
}

fn run_info(retriever: &Retriever<'_>, ticker: Option<&str>) -> Result<(), EtfError> {
    if let Some(t) = ticker {
        print_coverage(t, retriever.coverage(t)?);
        return Ok(());
    }

    for t in retriever.tickers() {
        match retriever.coverage(t) {
            Ok(coverage) => print_coverage(t, coverage),
            Err(e) => warn!("skipping {t}: {e}"),
        }
    }
    Ok(())
}

fn print_coverage(ticker: &str, coverage: Option<Coverage>) {
    match coverage {
        Some(c) => println!("{}: {} records, {} to {}", ticker, c.count, c.first, c.last),
        None => println!("{}: no records", ticker),
    }
}

fn run_list(registry: &DatasetRegistry) -> Result<(), EtfError> {
    let available = registry.available()?;
    for t in registry.tickers() {
        let status = if available.contains(t) {
            "available"
        } else {
            "missing"
        };
        println!("{t}\t{status}");
    }
    info!(
        "{} of {} tickers have price data",
        available.len(),
        registry.tickers().len()
    );
    Ok(())
}
