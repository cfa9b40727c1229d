//! Continuity Runner: backtest orchestration on top of `continuity-core`.
//!
//! This crate provides:
//! - TOML backtest configuration with reference defaults
//! - CSV bar loading with row-order resolution and dataset hashing
//! - Single-backtest runner producing a serializable `BacktestResult`
//! - Text, Markdown and JSON reports, plus a per-signal CSV tape

pub mod config;
pub mod data_loader;
pub mod reporting;
pub mod runner;

pub use config::{run_id, BacktestConfig, BarOrder, ConfigError, RunId};
pub use data_loader::{load_csv, load_csv_from_reader, LoadError, LoadOptions, LoadedData};
pub use reporting::{
    render, write_signal_tape, MarkdownReportGenerator, ReportError, ReportFormat,
    TextReportGenerator,
};
pub use runner::{
    prepare_run, run_backtest_from_data, run_single_backtest, BacktestResult, PreparedRun,
    RunError, SCHEMA_VERSION,
};
