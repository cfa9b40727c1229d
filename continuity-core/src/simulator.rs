//! Signal simulator: turns qualifying setup bars into resolved hypothetical trades.
//!
//! For every setup bar `i` in `0..n-1`:
//! 1. The bar must carry a streak of at least `min_streak_len` and a body of at
//!    least `min_body_size`. Bullish streaks are checked first.
//! 2. The trade enters at the open of bar `i + 1` and is measured against that
//!    same bar's high and low.
//! 3. Stop beats target when both are reached in the entry bar.
//!
//! Using the entry bar's full range is a best-case approximation: it assumes the
//! stop was not struck before the target unless the stop threshold itself was
//! reached. The last bar is never a setup bar because it has no entry bar.

use tracing::debug;

use crate::aggregate::{AggregateStats, Aggregator};
use crate::config::{ConfigError, SideThresholds, SimulationConfig};
use crate::domain::Bar;
use crate::signal::{is_high_reward, Outcome, Resolution, Signal, SignalKind};
use crate::streak::{StreakAnnotation, StreakTracker};

/// Validated simulator. Construction is the only place configuration can fail.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Decide whether the annotated setup bar produces a signal.
    ///
    /// `setup_index` must have a following bar; callers in this module only
    /// pass indices in `0..n-1`.
    pub fn evaluate_setup(
        &self,
        setup_bar: &Bar,
        annotation: &StreakAnnotation,
        setup_index: usize,
    ) -> Option<Signal> {
        // NaN bodies never qualify.
        let body_qualifies = setup_bar.body_size() >= self.config.min_body_size;
        if !body_qualifies {
            return None;
        }
        let kind = if annotation.bullish_streak >= self.config.min_streak_len {
            SignalKind::Long
        } else if annotation.bearish_streak >= self.config.min_streak_len {
            SignalKind::Short
        } else {
            return None;
        };
        Some(Signal {
            kind,
            setup_index,
            entry_index: setup_index + 1,
        })
    }

    /// Measure a signal against its entry bar and classify the outcome.
    pub fn resolve(&self, signal: Signal, entry_bar: &Bar) -> Resolution {
        let entry_price = entry_bar.open;
        let pip = self.config.pip_size;
        let upside = (entry_bar.high - entry_price) / pip;
        let downside = (entry_price - entry_bar.low) / pip;

        let (potential_profit_pips, potential_loss_pips, thresholds) = match signal.kind {
            SignalKind::Long => (upside, downside, self.config.long),
            SignalKind::Short => (downside, upside, self.config.short),
        };

        let SideThresholds {
            take_profit_pips,
            stop_loss_pips,
        } = thresholds;
        let take_profit_hit = potential_profit_pips >= take_profit_pips;
        let stop_loss_hit = potential_loss_pips >= stop_loss_pips;

        Resolution {
            signal,
            entry_price,
            potential_profit_pips,
            potential_loss_pips,
            take_profit_hit,
            stop_loss_hit,
            outcome: Outcome::classify(take_profit_hit, stop_loss_hit),
            high_reward: is_high_reward(potential_profit_pips, potential_loss_pips),
        }
    }

    /// Lazily scan a series, yielding one resolution per emitted signal.
    ///
    /// Streaks are tracked inline, so the scan needs no annotation buffer.
    pub fn scan<'a>(&'a self, bars: &'a [Bar]) -> SignalScan<'a> {
        SignalScan {
            simulator: self,
            bars,
            tracker: StreakTracker::new(),
            next_setup: 0,
        }
    }

    /// All resolutions for a series, in setup-bar order.
    pub fn resolutions(&self, bars: &[Bar]) -> Vec<Resolution> {
        self.scan(bars).collect()
    }

    /// Fold the whole series into aggregate statistics.
    pub fn run(&self, bars: &[Bar]) -> AggregateStats {
        let mut aggregator = Aggregator::new();
        aggregator.extend(self.scan(bars));
        aggregator.finish()
    }
}

/// Iterator returned by [`Simulator::scan`].
pub struct SignalScan<'a> {
    simulator: &'a Simulator,
    bars: &'a [Bar],
    tracker: StreakTracker,
    next_setup: usize,
}

impl Iterator for SignalScan<'_> {
    type Item = Resolution;

    fn next(&mut self) -> Option<Resolution> {
        while self.next_setup + 1 < self.bars.len() {
            let i = self.next_setup;
            self.next_setup += 1;

            let setup_bar = &self.bars[i];
            let annotation = self.tracker.push(setup_bar);
            if let Some(signal) = self.simulator.evaluate_setup(setup_bar, &annotation, i) {
                let resolution = self.simulator.resolve(signal, &self.bars[i + 1]);
                debug!(
                    setup_index = i,
                    kind = signal.kind.as_str(),
                    streak = annotation.active_streak(),
                    profit_pips = resolution.potential_profit_pips,
                    loss_pips = resolution.potential_loss_pips,
                    outcome = resolution.outcome.as_str(),
                    "signal resolved"
                );
                return Some(resolution);
            }
        }
        None
    }
}

/// Validate `config` and fold `bars` into aggregate statistics.
pub fn simulate(bars: &[Bar], config: &SimulationConfig) -> Result<AggregateStats, ConfigError> {
    Ok(Simulator::new(*config)?.run(bars))
}
