//! Markdown report generator.

use super::pct;
use crate::runner::BacktestResult;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, result: &BacktestResult) -> String {
        let stats = &result.stats;
        let summary = &result.summary;
        let config = &result.config;

        let mut report = format!(
            "# Candle Continuity Report\n\n\
Run ID: `{}`\n\
Source: `{}` ({} bars, dataset `{}`)\n\n\
## Summary\n\
- Trades (TP or SL reached): {}\n\
- Wins: {}\n\
- Losses: {}\n\
- Undetermined: {}\n\
- Win Rate: {}\n\
- Net: {} pips\n\
- High-reward share: {} ({} signals)\n",
            result.run_id,
            result.source,
            result.bar_count,
            short_hash(&result.dataset_hash),
            summary.decided_trades,
            stats.wins,
            stats.losses,
            stats.undetermined,
            pct(summary.win_rate),
            summary.net_pips,
            pct(summary.quality_ratio),
            stats.high_reward_count,
        );

        report.push_str("\n## Signals by Direction\n\n");
        report.push_str("| Direction | Signals | Avg Profit Potential | Avg Loss Potential |\n");
        report.push_str("|-----------|---------|----------------------|--------------------|\n");
        report.push_str(&format!(
            "| Long | {} | {:.1} pips | {:.1} pips |\n",
            stats.long_signals, summary.avg_long_profit_pips, summary.avg_long_loss_pips
        ));
        report.push_str(&format!(
            "| Short | {} | {:.1} pips | {:.1} pips |\n",
            stats.short_signals, summary.avg_short_profit_pips, summary.avg_short_loss_pips
        ));

        report.push_str("\n## Parameters\n\n");
        report.push_str("| Parameter | Value |\n");
        report.push_str("|-----------|-------|\n");
        report.push_str(&format!("| min_streak_len | {} |\n", config.min_streak_len));
        report.push_str(&format!("| min_body_size | {} |\n", config.min_body_size));
        report.push_str(&format!("| pip_size | {} |\n", config.pip_size));
        report.push_str(&format!(
            "| long TP / SL | {} / {} pips |\n",
            config.long.take_profit_pips, config.long.stop_loss_pips
        ));
        report.push_str(&format!(
            "| short TP / SL | {} / {} pips |\n",
            config.short.take_profit_pips, config.short.stop_loss_pips
        ));

        report.push_str(
            "\n## Notes\n\
- Outcomes are measured on the bar after each setup bar; a stop reached in that bar \
counts as a loss even when the target was also reached.\n\
- Net pips value every decided trade with the long take-profit and stop-loss.\n",
        );
        if result.insane_bars > 0 {
            report.push_str(&format!(
                "- **{} bar(s) violate the OHLC envelope** and were simulated unchanged.\n",
                result.insane_bars
            ));
        }

        report
    }
}

fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}
