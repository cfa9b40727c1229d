//! Signal and outcome types.
//!
//! Signals are scoped to a single setup bar: nothing carries over from one
//! iteration of the simulator to the next.

use serde::{Deserialize, Serialize};

/// Trade direction implied by a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Long,
    Short,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

/// A qualifying setup bar and the bar the hypothetical trade is taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub setup_index: usize,
    pub entry_index: usize,
}

/// How a signal resolved on its entry bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Target reached and stop untouched.
    Win,
    /// Stop reached. Takes precedence when the target was also reached.
    Loss,
    /// Neither threshold reached within the entry bar.
    Undetermined,
}

impl Outcome {
    /// Stop dominates: intrabar ordering is unknown with OHLC data.
    pub fn classify(take_profit_hit: bool, stop_loss_hit: bool) -> Self {
        if stop_loss_hit {
            Self::Loss
        } else if take_profit_hit {
            Self::Win
        } else {
            Self::Undetermined
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Undetermined => "undetermined",
        }
    }
}

/// A signal together with the excursion measured on its entry bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub signal: Signal,
    pub entry_price: f64,
    /// Favourable excursion from the entry price, in pips.
    pub potential_profit_pips: f64,
    /// Adverse excursion from the entry price, in pips.
    pub potential_loss_pips: f64,
    pub take_profit_hit: bool,
    pub stop_loss_hit: bool,
    pub outcome: Outcome,
    /// Potential profit exceeded three times the potential loss.
    pub high_reward: bool,
}

/// Reward multiple a trade must beat to count as high-reward.
pub const HIGH_REWARD_MULTIPLE: f64 = 3.0;

/// Strictly greater than `HIGH_REWARD_MULTIPLE` times the loss.
pub fn is_high_reward(potential_profit_pips: f64, potential_loss_pips: f64) -> bool {
    potential_profit_pips > potential_loss_pips * HIGH_REWARD_MULTIPLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_dominates_when_both_hit() {
        assert_eq!(Outcome::classify(true, true), Outcome::Loss);
    }

    #[test]
    fn target_only_is_win() {
        assert_eq!(Outcome::classify(true, false), Outcome::Win);
    }

    #[test]
    fn stop_only_is_loss() {
        assert_eq!(Outcome::classify(false, true), Outcome::Loss);
    }

    #[test]
    fn neither_is_undetermined() {
        assert_eq!(Outcome::classify(false, false), Outcome::Undetermined);
    }

    #[test]
    fn high_reward_is_strict() {
        assert!(is_high_reward(31.0, 10.0));
        assert!(!is_high_reward(30.0, 10.0));
        assert!(!is_high_reward(29.0, 10.0));
    }

    #[test]
    fn high_reward_with_zero_loss() {
        assert!(is_high_reward(0.5, 0.0));
        assert!(!is_high_reward(0.0, 0.0));
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&Outcome::Undetermined).unwrap();
        assert_eq!(json, "\"undetermined\"");
    }
}
