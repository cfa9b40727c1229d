//! Continuity Core: candle-continuity streaks, signal simulation, aggregation.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (OHLC bars, candle direction)
//! - Streak annotation (consecutive same-colour candles)
//! - Signal simulation on the bar following each qualifying setup bar
//! - Aggregation of resolved signals into run statistics
//!
//! Loading bars and rendering reports live in `continuity-runner`.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod signal;
pub mod simulator;
pub mod streak;

pub use aggregate::{AggregateStats, Aggregator, PerformanceSummary};
pub use config::{ConfigError, SideThresholds, SimulationConfig};
pub use domain::{Bar, CandleDirection};
pub use signal::{Outcome, Resolution, Signal, SignalKind};
pub use simulator::{simulate, Simulator};
pub use streak::{annotate_streaks, StreakAnnotation, StreakTracker};
