//! Streak annotation: consecutive same-colour candle counts.
//!
//! A single left-to-right scan with a reset-on-change counter. For every bar
//! exactly one of the two streak lengths is non-zero, and the non-zero one is
//! at least 1.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, CandleDirection};

/// Per-bar streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakAnnotation {
    pub direction: CandleDirection,
    pub bullish_streak: usize,
    pub bearish_streak: usize,
}

impl StreakAnnotation {
    /// Length of the streak the bar belongs to, whichever colour it is.
    pub fn active_streak(&self) -> usize {
        self.bullish_streak.max(self.bearish_streak)
    }
}

/// Incremental streak counter, fed one bar at a time in series order.
#[derive(Debug, Clone, Default)]
pub struct StreakTracker {
    current: Option<CandleDirection>,
    run: usize,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one bar and return its annotation.
    pub fn push(&mut self, bar: &Bar) -> StreakAnnotation {
        let direction = bar.direction();
        if self.current == Some(direction) {
            self.run += 1;
        } else {
            self.current = Some(direction);
            self.run = 1;
        }

        let (bullish_streak, bearish_streak) = match direction {
            CandleDirection::Bullish => (self.run, 0),
            CandleDirection::Bearish => (0, self.run),
        };
        StreakAnnotation {
            direction,
            bullish_streak,
            bearish_streak,
        }
    }
}

/// Annotate a whole series. Empty in, empty out.
pub fn annotate_streaks(bars: &[Bar]) -> Vec<StreakAnnotation> {
    let mut tracker = StreakTracker::new();
    bars.iter().map(|bar| tracker.push(bar)).collect()
}

/// Build bars from (open, close) pairs with a one-unit wick on both sides.
#[cfg(test)]
pub(crate) fn bars_from_open_close(pairs: &[(f64, f64)]) -> Vec<Bar> {
    pairs
        .iter()
        .map(|&(open, close)| Bar::new(open, open.max(close) + 1.0, open.min(close) - 1.0, close))
        .collect()
}
