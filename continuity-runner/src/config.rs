//! Serializable backtest configuration (TOML).
//!
//! ```toml
//! [data]
//! path = "EUR_CHF_1.csv"
//! order = "newest_first"
//!
//! [strategy]
//! min_streak_len = 5
//! min_body_size = 0.0010
//!
//! [trade]
//! pip_size = 0.0001
//! take_profit_long_pips = 20.0
//! stop_loss_long_pips = 10.0
//! take_profit_short_pips = 20.0
//! stop_loss_short_pips = 10.0
//! ```
//!
//! Every field has a default; only `data.path` is needed to run from a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use continuity_core::{SideThresholds, SimulationConfig};

/// Unique identifier for a backtest configuration (BLAKE3 hex digest).
pub type RunId = String;

/// Errors from reading or validating a backtest config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid simulation parameters: {0}")]
    Invalid(#[from] continuity_core::ConfigError),
}

/// Row order of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOrder {
    /// Most recent bar first; rows are reversed on load.
    #[default]
    NewestFirst,
    OldestFirst,
    /// Decide from the first and last parseable timestamps; keep file order if none parse.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSection {
    pub path: Option<PathBuf>,
    pub order: BarOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategySection {
    pub min_streak_len: usize,
    pub min_body_size: f64,
}

impl Default for StrategySection {
    fn default() -> Self {
        let d = SimulationConfig::default();
        Self {
            min_streak_len: d.min_streak_len,
            min_body_size: d.min_body_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TradeSection {
    pub pip_size: f64,
    pub take_profit_long_pips: f64,
    pub stop_loss_long_pips: f64,
    pub take_profit_short_pips: f64,
    pub stop_loss_short_pips: f64,
}

impl Default for TradeSection {
    fn default() -> Self {
        let d = SimulationConfig::default();
        Self {
            pip_size: d.pip_size,
            take_profit_long_pips: d.long.take_profit_pips,
            stop_loss_long_pips: d.long.stop_loss_pips,
            take_profit_short_pips: d.short.take_profit_pips,
            stop_loss_short_pips: d.short.stop_loss_pips,
        }
    }
}

/// Top-level backtest configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    pub data: DataSection,
    pub strategy: StrategySection,
    pub trade: TradeSection,
}

impl BacktestConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Unvalidated simulation parameters.
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            min_streak_len: self.strategy.min_streak_len,
            min_body_size: self.strategy.min_body_size,
            pip_size: self.trade.pip_size,
            long: SideThresholds::new(
                self.trade.take_profit_long_pips,
                self.trade.stop_loss_long_pips,
            ),
            short: SideThresholds::new(
                self.trade.take_profit_short_pips,
                self.trade.stop_loss_short_pips,
            ),
        }
    }

    /// Simulation parameters, rejected if any threshold is non-positive.
    pub fn to_simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let config = self.simulation_config();
        config.validate()?;
        Ok(config)
    }

    /// Deterministic identity of the simulation parameters.
    ///
    /// The data path and row order are not part of the id; the dataset hash
    /// identifies the bars.
    pub fn run_id(&self) -> RunId {
        run_id(&self.simulation_config())
    }
}

/// BLAKE3 over the little-endian encoding of every simulation parameter.
pub fn run_id(config: &SimulationConfig) -> RunId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(config.min_streak_len as u64).to_le_bytes());
    for value in [
        config.min_body_size,
        config.pip_size,
        config.long.take_profit_pips,
        config.long.stop_loss_pips,
        config.short.take_profit_pips,
        config.short.stop_loss_pips,
    ] {
        hasher.update(&value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[data]
path = "EUR_CHF_1.csv"
order = "oldest_first"

[strategy]
min_streak_len = 4
min_body_size = 0.0020

[trade]
pip_size = 0.01
take_profit_long_pips = 30.0
stop_loss_long_pips = 15.0
take_profit_short_pips = 25.0
stop_loss_short_pips = 12.0
"#;

    #[test]
    fn parses_full_config() {
        let config = BacktestConfig::from_toml(FULL).unwrap();
        assert_eq!(config.data.path, Some(PathBuf::from("EUR_CHF_1.csv")));
        assert_eq!(config.data.order, BarOrder::OldestFirst);

        let sim = config.to_simulation_config().unwrap();
        assert_eq!(sim.min_streak_len, 4);
        assert_eq!(sim.min_body_size, 0.0020);
        assert_eq!(sim.pip_size, 0.01);
        assert_eq!(sim.long, SideThresholds::new(30.0, 15.0));
        assert_eq!(sim.short, SideThresholds::new(25.0, 12.0));
    }

    #[test]
    fn empty_config_uses_reference_defaults() {
        let config = BacktestConfig::from_toml("").unwrap();
        assert_eq!(config.data.path, None);
        assert_eq!(config.data.order, BarOrder::NewestFirst);
        assert_eq!(
            config.to_simulation_config().unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = BacktestConfig::from_toml("[trade]\nstop_loss_short_pips = 7.5\n").unwrap();
        let sim = config.to_simulation_config().unwrap();
        assert_eq!(sim.short.stop_loss_pips, 7.5);
        assert_eq!(sim.short.take_profit_pips, 20.0);
        assert_eq!(sim.pip_size, 0.0001);
    }

    #[test]
    fn zero_pip_size_is_invalid() {
        let config = BacktestConfig::from_toml("[trade]\npip_size = 0.0\n").unwrap();
        let err = config.to_simulation_config().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("pip_size"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = BacktestConfig::from_toml("[strategy\nmin_streak_len = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn misspelled_key_is_parse_error() {
        for toml in [
            "[strategy]\nmin_streak = 3\n",
            "[trade]\nstop_loss_short = 5.0\n",
            "[data]\nfile = \"bars.csv\"\n",
            "[stratgy]\nmin_streak_len = 3\n",
        ] {
            let err = BacktestConfig::from_toml(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "accepted {toml:?}");
        }
    }

    #[test]
    fn unknown_order_is_parse_error() {
        let err = BacktestConfig::from_toml("[data]\norder = \"sideways\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BacktestConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn run_id_deterministic() {
        let config = BacktestConfig::from_toml(FULL).unwrap();
        assert_eq!(config.run_id(), config.run_id());
        assert_eq!(config.run_id().len(), 64);
    }

    #[test]
    fn run_id_ignores_data_section() {
        let a = BacktestConfig::from_toml(FULL).unwrap();
        let mut b = a.clone();
        b.data.path = Some(PathBuf::from("other.csv"));
        b.data.order = BarOrder::NewestFirst;
        assert_eq!(a.run_id(), b.run_id());
    }

    #[test]
    fn run_id_changes_with_params() {
        let a = BacktestConfig::default();
        let mut b = a.clone();
        b.strategy.min_streak_len = 6;
        assert_ne!(a.run_id(), b.run_id());
    }
}
