//! Continuity CLI: run the candle-continuity backtest from the command line.
//!
//! Commands:
//! - `run`: simulate a CSV of bars and print the statistics report
//! - `signals`: print every resolved signal as CSV
//! - `check-config`: validate a config file and print its run id

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use continuity_core::Simulator;
use continuity_runner::{
    prepare_run, render, run_backtest_from_data, write_signal_tape, BacktestConfig, BarOrder,
    ReportFormat,
};

#[derive(Parser)]
#[command(
    name = "continuity",
    about = "Candle continuity backtester: streak signals resolved on the next bar"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a bar series and print aggregate statistics.
    Run {
        #[command(flatten)]
        params: ParamArgs,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print every resolved signal as CSV on stdout.
    Signals {
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Validate a config file and print its run id.
    CheckConfig {
        /// Path to a TOML config file.
        config: PathBuf,
    },
}

/// Config file plus per-field overrides.
#[derive(Args)]
struct ParamArgs {
    /// Path to a TOML config file. Defaults apply to every field it omits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file of bars (overrides [data].path).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Row order of the CSV file (overrides [data].order).
    #[arg(long, value_enum)]
    order: Option<Order>,

    /// Minimum streak length of the setup bar.
    #[arg(long)]
    min_streak: Option<usize>,

    /// Minimum setup-bar body, in price units.
    #[arg(long)]
    min_body: Option<f64>,

    /// Price units per pip.
    #[arg(long)]
    pip_size: Option<f64>,

    /// Long take-profit, in pips.
    #[arg(long)]
    tp_long: Option<f64>,

    /// Long stop-loss, in pips.
    #[arg(long)]
    sl_long: Option<f64>,

    /// Short take-profit, in pips.
    #[arg(long)]
    tp_short: Option<f64>,

    /// Short stop-loss, in pips.
    #[arg(long)]
    sl_short: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Json,
}

impl From<Format> for ReportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => ReportFormat::Text,
            Format::Markdown => ReportFormat::Markdown,
            Format::Json => ReportFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    NewestFirst,
    OldestFirst,
    Auto,
}

impl From<Order> for BarOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::NewestFirst => BarOrder::NewestFirst,
            Order::OldestFirst => BarOrder::OldestFirst,
            Order::Auto => BarOrder::Auto,
        }
    }
}

impl ParamArgs {
    /// Load the config file (if any) and apply command-line overrides on top.
    fn resolve(&self) -> Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => BacktestConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BacktestConfig::default(),
        };

        if let Some(path) = &self.data {
            config.data.path = Some(path.clone());
        }
        if let Some(order) = self.order {
            config.data.order = order.into();
        }
        if let Some(v) = self.min_streak {
            config.strategy.min_streak_len = v;
        }
        if let Some(v) = self.min_body {
            config.strategy.min_body_size = v;
        }
        if let Some(v) = self.pip_size {
            config.trade.pip_size = v;
        }
        if let Some(v) = self.tp_long {
            config.trade.take_profit_long_pips = v;
        }
        if let Some(v) = self.sl_long {
            config.trade.stop_loss_long_pips = v;
        }
        if let Some(v) = self.tp_short {
            config.trade.take_profit_short_pips = v;
        }
        if let Some(v) = self.sl_short {
            config.trade.stop_loss_short_pips = v;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { params, format } => run_cmd(&params, format.into()),
        Commands::Signals { params } => signals_cmd(&params),
        Commands::CheckConfig { config } => check_config_cmd(&config),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run_cmd(params: &ParamArgs, format: ReportFormat) -> Result<()> {
    let config = params.resolve()?;
    let prepared = prepare_run(&config)?;
    debug!(run_id = %config.run_id(), "starting backtest");

    let result = run_backtest_from_data(&prepared.data, &prepared.simulation, &prepared.source)?;
    let report = render(&result, format).context("rendering report")?;
    println!("{report}");
    Ok(())
}

fn signals_cmd(params: &ParamArgs) -> Result<()> {
    let config = params.resolve()?;
    let prepared = prepare_run(&config)?;

    let simulator = Simulator::new(prepared.simulation)?;
    let resolutions = simulator.resolutions(&prepared.data.bars);
    write_signal_tape(io::stdout().lock(), &resolutions, &prepared.data.labels)
        .context("writing signal tape")?;
    Ok(())
}

fn check_config_cmd(path: &Path) -> Result<()> {
    let config = BacktestConfig::from_file(path)
        .with_context(|| format!("loading config {}", path.display()))?;
    let simulation = config.to_simulation_config()?;

    println!("Config OK: {}", path.display());
    match &config.data.path {
        Some(data) => println!("Data:           {}", data.display()),
        None => println!("Data:           (none; pass --data)"),
    }
    println!("Run ID:         {}", config.run_id());
    println!("Min streak:     {}", simulation.min_streak_len);
    println!("Min body:       {}", simulation.min_body_size);
    println!("Pip size:       {}", simulation.pip_size);
    println!(
        "Long TP / SL:   {} / {} pips",
        simulation.long.take_profit_pips, simulation.long.stop_loss_pips
    );
    println!(
        "Short TP / SL:  {} / {} pips",
        simulation.short.take_profit_pips, simulation.short.stop_loss_pips
    );
    if simulation.has_asymmetric_thresholds() {
        println!("Note: net pips are valued with the long thresholds for every trade.");
    }
    Ok(())
}
