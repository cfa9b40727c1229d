//! Plain-text console report.

use std::fmt::{self, Write};

use super::pct;
use crate::runner::BacktestResult;

const RULE_WIDTH: usize = 40;

pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn generate(&self, result: &BacktestResult) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_to(&mut out, result)?;
        Ok(out)
    }

    /// Write the report into any formatter sink.
    pub fn write_to<W: Write>(&self, out: &mut W, result: &BacktestResult) -> fmt::Result {
        let stats = &result.stats;
        let summary = &result.summary;
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(out)?;
        writeln!(out, "{heavy}")?;
        writeln!(out, "   BACKTEST REPORT: {}", result.source)?;
        writeln!(out, "{heavy}")?;
        if let (Some(first), Some(last)) = (&result.first_bar, &result.last_bar) {
            writeln!(out, "Period:             {first} to {last}")?;
        }
        writeln!(out, "Bars:               {}", result.bar_count)?;
        writeln!(out, "Total trades:       {}", summary.decided_trades)?;
        writeln!(out, "Winning (TP):       {}", stats.wins)?;
        writeln!(out, "Losing (SL):        {}", stats.losses)?;
        writeln!(out, "Undetermined:       {}", stats.undetermined)?;
        writeln!(out, "Win rate:           {}", pct(summary.win_rate))?;
        writeln!(out, "Net result:         {} pips", summary.net_pips)?;
        writeln!(out, "{light}")?;

        if stats.long_signals > 0 {
            writeln!(out, "Long signals:       {}", stats.long_signals)?;
            writeln!(
                out,
                "Avg profit potential (long):  {:.1} pips",
                summary.avg_long_profit_pips
            )?;
            writeln!(
                out,
                "Avg loss potential (long):    {:.1} pips",
                summary.avg_long_loss_pips
            )?;
        } else {
            writeln!(out, "No long signals generated.")?;
        }
        writeln!(out, "{light}")?;

        if stats.short_signals > 0 {
            writeln!(out, "Short signals:      {}", stats.short_signals)?;
            writeln!(
                out,
                "Avg profit potential (short): {:.1} pips",
                summary.avg_short_profit_pips
            )?;
            writeln!(
                out,
                "Avg loss potential (short):   {:.1} pips",
                summary.avg_short_loss_pips
            )?;
        } else {
            writeln!(out, "No short signals generated.")?;
        }
        writeln!(out, "{light}")?;

        writeln!(out, "Trades with R:R > 3: {}", stats.high_reward_count)?;
        writeln!(out, "High-reward share:  {}", pct(summary.quality_ratio))?;
        if result.insane_bars > 0 {
            writeln!(
                out,
                "WARNING: {} bar(s) violate the OHLC envelope",
                result.insane_bars
            )?;
        }
        writeln!(out, "{heavy}")
    }
}
