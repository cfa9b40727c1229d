//! Bar: the fundamental market data unit.

use serde::{Deserialize, Serialize};

/// OHLC price bar. Position in the series is the bar's identity; the core
/// never looks at timestamps.
///
/// The usual OHLC envelope (`low <= min(open, close)`, `high >= max(open, close)`)
/// is not enforced. Malformed bars flow through the simulation unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Candle colour. A doji (close == open) counts as bearish.
    pub fn direction(&self) -> CandleDirection {
        if self.close > self.open {
            CandleDirection::Bullish
        } else {
            CandleDirection::Bearish
        }
    }

    /// Absolute distance between open and close, in price units.
    pub fn body_size(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low and the body sits inside the range.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Directional sign of a single candle. There is no neutral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleDirection {
    Bullish,
    Bearish,
}

impl CandleDirection {
    pub fn is_bullish(self) -> bool {
        matches!(self, Self::Bullish)
    }
}
