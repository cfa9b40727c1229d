//! Backtest runner: wires together config, bar loading, simulation, and aggregation.
//!
//! Two entry points:
//! - `run_single_backtest()`: validates the config, loads bars from disk, then runs. Used by CLI.
//! - `run_backtest_from_data()`: takes pre-loaded bars. Used by tests and the signal tape.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use continuity_core::{AggregateStats, PerformanceSummary, SimulationConfig, Simulator};

use crate::config::{run_id, BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_csv, LoadError, LoadOptions, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("no data file configured (set [data].path or pass --data)")]
    MissingDataPath,
}

impl From<continuity_core::ConfigError> for RunError {
    fn from(err: continuity_core::ConfigError) -> Self {
        Self::Config(ConfigError::Invalid(err))
    }
}

/// Current schema version for serialized results.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    /// Where the bars came from (file path, or a caller-supplied tag).
    pub source: String,
    pub bar_count: usize,
    pub first_bar: Option<String>,
    pub last_bar: Option<String>,
    pub dataset_hash: String,
    pub insane_bars: usize,
    pub config: SimulationConfig,
    pub stats: AggregateStats,
    pub summary: PerformanceSummary,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Validated config plus the bars it points at.
pub struct PreparedRun {
    pub simulation: SimulationConfig,
    pub source: String,
    pub data: LoadedData,
}

/// Validate the config, then load its data file.
///
/// Validation happens first so a bad threshold never costs a file read.
pub fn prepare_run(config: &BacktestConfig) -> Result<PreparedRun, RunError> {
    let simulation = config.to_simulation_config()?;
    let path = config.data.path.as_deref().ok_or(RunError::MissingDataPath)?;
    let data = load_csv(
        path,
        &LoadOptions {
            order: config.data.order,
        },
    )?;
    Ok(PreparedRun {
        simulation,
        source: path.display().to_string(),
        data,
    })
}

/// Run a single backtest from a BacktestConfig (loads data from disk).
pub fn run_single_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    let prepared = prepare_run(config)?;
    run_backtest_from_data(&prepared.data, &prepared.simulation, &prepared.source)
}

/// Run a backtest with pre-loaded data. No I/O.
pub fn run_backtest_from_data(
    data: &LoadedData,
    config: &SimulationConfig,
    source: &str,
) -> Result<BacktestResult, RunError> {
    let simulator = Simulator::new(*config)?;

    if config.has_asymmetric_thresholds() {
        warn!(
            "short thresholds differ from long ones; net pips still values every trade \
             with the long take-profit and stop-loss"
        );
    }

    let stats = simulator.run(&data.bars);
    let summary = stats.summary(config);

    info!(
        source,
        bars = data.bars.len(),
        signals = stats.total_signals(),
        wins = stats.wins,
        losses = stats.losses,
        undetermined = stats.undetermined,
        "backtest complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(config),
        source: source.to_string(),
        bar_count: data.bars.len(),
        first_bar: data.first_label().map(str::to_string),
        last_bar: data.last_label().map(str::to_string),
        dataset_hash: data.dataset_hash.clone(),
        insane_bars: data.insane_bars,
        config: *config,
        stats,
        summary,
    })
}
