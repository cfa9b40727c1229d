//! Signal tape export (CSV): one row per resolved signal.

use std::io::Write;

use serde::Serialize;

use continuity_core::Resolution;

/// One CSV row of the signal tape.
#[derive(Debug, Serialize)]
pub struct TapeRow<'a> {
    pub setup_index: usize,
    pub entry_index: usize,
    pub entry_label: Option<&'a str>,
    pub kind: &'static str,
    pub entry_price: f64,
    pub potential_profit_pips: f64,
    pub potential_loss_pips: f64,
    pub take_profit_hit: bool,
    pub stop_loss_hit: bool,
    pub outcome: &'static str,
    pub high_reward: bool,
}

/// Write resolutions as CSV. `labels` is indexed by bar position and may be shorter
/// than the series (missing labels are left empty).
pub fn write_signal_tape<W: Write>(
    writer: W,
    resolutions: &[Resolution],
    labels: &[Option<String>],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in resolutions {
        let entry_label = labels
            .get(r.signal.entry_index)
            .and_then(|l| l.as_deref());
        wtr.serialize(TapeRow {
            setup_index: r.signal.setup_index,
            entry_index: r.signal.entry_index,
            entry_label,
            kind: r.signal.kind.as_str(),
            entry_price: r.entry_price,
            potential_profit_pips: round_pips(r.potential_profit_pips),
            potential_loss_pips: round_pips(r.potential_loss_pips),
            take_profit_hit: r.take_profit_hit,
            stop_loss_hit: r.stop_loss_hit,
            outcome: r.outcome.as_str(),
            high_reward: r.high_reward,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Tenth-of-a-pip precision for display; the raw values stay in the aggregates.
fn round_pips(pips: f64) -> f64 {
    (pips * 10.0).round() / 10.0
}
