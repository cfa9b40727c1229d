//! Simulation parameters and their validation.
//!
//! A `SimulationConfig` is validated once, before any simulation state exists.
//! The simulator only accepts a validated config, so a bad pip size can never
//! reach the division in the outcome resolver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected simulation parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_streak_len must be >= 1, got {0}")]
    NonPositiveStreak(usize),

    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Take-profit / stop-loss distances for one trade direction, in pips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideThresholds {
    pub take_profit_pips: f64,
    pub stop_loss_pips: f64,
}

impl SideThresholds {
    pub fn new(take_profit_pips: f64, stop_loss_pips: f64) -> Self {
        Self {
            take_profit_pips,
            stop_loss_pips,
        }
    }
}

impl Default for SideThresholds {
    fn default() -> Self {
        Self::new(20.0, 10.0)
    }
}

/// Everything the simulator needs besides the bars themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Streak length the setup bar must reach (inclusive).
    pub min_streak_len: usize,
    /// Minimum setup-bar body, in price units.
    pub min_body_size: f64,
    /// Price units per pip (0.0001 for most currency pairs).
    pub pip_size: f64,
    pub long: SideThresholds,
    pub short: SideThresholds,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_streak_len: 5,
            min_body_size: 0.0010,
            pip_size: 0.0001,
            long: SideThresholds::default(),
            short: SideThresholds::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every threshold. Called by the simulator before it allocates anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_streak_len == 0 {
            return Err(ConfigError::NonPositiveStreak(self.min_streak_len));
        }
        let reals = [
            ("min_body_size", self.min_body_size),
            ("pip_size", self.pip_size),
            ("take_profit_long_pips", self.long.take_profit_pips),
            ("stop_loss_long_pips", self.long.stop_loss_pips),
            ("take_profit_short_pips", self.short.take_profit_pips),
            ("stop_loss_short_pips", self.short.stop_loss_pips),
        ];
        for (field, value) in reals {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    /// True when the short side uses different thresholds than the long side.
    ///
    /// Net pips are always accounted with the long thresholds, so the figure
    /// is only exact when this returns false.
    pub fn has_asymmetric_thresholds(&self) -> bool {
        self.long != self.short
    }
}
