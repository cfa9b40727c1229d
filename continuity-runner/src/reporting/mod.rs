//! Report rendering for finished backtests.
//!
//! Renderers are pure consumers of `BacktestResult`: nothing here feeds back into
//! the simulation, and nothing is written to disk.

mod markdown;
mod tape;
mod text;

pub use markdown::MarkdownReportGenerator;
pub use tape::{write_signal_tape, TapeRow};
pub use text::TextReportGenerator;

use std::fmt;

use thiserror::Error;

use crate::runner::BacktestResult;

/// Errors from rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("formatting failed")]
    Format(#[from] fmt::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for a run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Render a result in the requested format.
pub fn render(result: &BacktestResult, format: ReportFormat) -> Result<String, ReportError> {
    Ok(match format {
        ReportFormat::Text => TextReportGenerator.generate(result)?,
        ReportFormat::Markdown => MarkdownReportGenerator.generate(result),
        ReportFormat::Json => serde_json::to_string_pretty(result)?,
    })
}

/// Fraction as a percentage with two decimals.
pub(crate) fn pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
