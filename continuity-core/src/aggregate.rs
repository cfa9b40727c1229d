//! Aggregation: a fold over resolved signals into run-level statistics.
//!
//! Potential profit and loss are summed for every signal regardless of outcome:
//! they describe how far price could have moved, not realised P&L.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::signal::{Outcome, Resolution, SignalKind};

/// Raw counters and pip sums for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub wins: usize,
    pub losses: usize,
    pub undetermined: usize,
    pub long_signals: usize,
    pub short_signals: usize,
    pub long_profit_pips: f64,
    pub long_loss_pips: f64,
    pub short_profit_pips: f64,
    pub short_loss_pips: f64,
    pub high_reward_count: usize,
}

/// Owns the running totals while a simulation is in progress.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    stats: AggregateStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, resolution: &Resolution) {
        let s = &mut self.stats;
        match resolution.signal.kind {
            SignalKind::Long => {
                s.long_signals += 1;
                s.long_profit_pips += resolution.potential_profit_pips;
                s.long_loss_pips += resolution.potential_loss_pips;
            }
            SignalKind::Short => {
                s.short_signals += 1;
                s.short_profit_pips += resolution.potential_profit_pips;
                s.short_loss_pips += resolution.potential_loss_pips;
            }
        }
        match resolution.outcome {
            Outcome::Win => s.wins += 1,
            Outcome::Loss => s.losses += 1,
            Outcome::Undetermined => s.undetermined += 1,
        }
        if resolution.high_reward {
            s.high_reward_count += 1;
        }
    }

    /// Close the run. The returned record is a plain value; nothing mutates it further.
    pub fn finish(self) -> AggregateStats {
        self.stats
    }
}

impl Extend<Resolution> for Aggregator {
    fn extend<I: IntoIterator<Item = Resolution>>(&mut self, iter: I) {
        for resolution in iter {
            self.record(&resolution);
        }
    }
}

impl<'a> Extend<&'a Resolution> for Aggregator {
    fn extend<I: IntoIterator<Item = &'a Resolution>>(&mut self, iter: I) {
        for resolution in iter {
            self.record(resolution);
        }
    }
}

impl FromIterator<Resolution> for AggregateStats {
    fn from_iter<I: IntoIterator<Item = Resolution>>(iter: I) -> Self {
        let mut aggregator = Aggregator::new();
        aggregator.extend(iter);
        aggregator.finish()
    }
}

/// Derived ratios, computed once from a finished [`AggregateStats`].
///
/// Every ratio with a zero denominator is reported as 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Wins plus losses; undetermined signals are not trades.
    pub decided_trades: usize,
    pub win_rate: f64,
    /// Blended: wins and losses are valued with the long-side thresholds only.
    pub net_pips: f64,
    pub avg_long_profit_pips: f64,
    pub avg_long_loss_pips: f64,
    pub avg_short_profit_pips: f64,
    pub avg_short_loss_pips: f64,
    /// High-reward signals per decided trade.
    pub quality_ratio: f64,
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

impl AggregateStats {
    pub fn total_signals(&self) -> usize {
        self.long_signals + self.short_signals
    }

    pub fn decided_trades(&self) -> usize {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.decided_trades())
    }

    /// `wins * tp_long - losses * sl_long`, whatever side the trades were on.
    pub fn net_pips(&self, config: &SimulationConfig) -> f64 {
        self.wins as f64 * config.long.take_profit_pips
            - self.losses as f64 * config.long.stop_loss_pips
    }

    pub fn quality_ratio(&self) -> f64 {
        ratio(self.high_reward_count as f64, self.decided_trades())
    }

    pub fn summary(&self, config: &SimulationConfig) -> PerformanceSummary {
        PerformanceSummary {
            decided_trades: self.decided_trades(),
            win_rate: self.win_rate(),
            net_pips: self.net_pips(config),
            avg_long_profit_pips: ratio(self.long_profit_pips, self.long_signals),
            avg_long_loss_pips: ratio(self.long_loss_pips, self.long_signals),
            avg_short_profit_pips: ratio(self.short_profit_pips, self.short_signals),
            avg_short_loss_pips: ratio(self.short_loss_pips, self.short_signals),
            quality_ratio: self.quality_ratio(),
        }
    }
}
