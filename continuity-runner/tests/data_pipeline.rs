//! Integration tests for the loader → simulator → signal tape pipeline.

use std::io::Write;

use continuity_core::{Outcome, SignalKind, SimulationConfig, Simulator};
use continuity_runner::{load_csv, write_signal_tape, BarOrder, LoadError, LoadOptions};

const OLDEST_FIRST: &str = "\
time,open,high,low,close,volume
2024.01.02 10:00,1.1000,1.1030,1.0995,1.1020,100
2024.01.02 11:00,1.1020,1.1045,1.1015,1.1040,100
2024.01.02 12:00,1.1040,1.1065,1.1035,1.1060,100
2024.01.02 13:00,1.1060,1.1085,1.1055,1.1080,100
";

fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_hourly_file_in_file_order() {
    let file = write_temp_csv(OLDEST_FIRST);
    let data = load_csv(
        file.path(),
        &LoadOptions {
            order: BarOrder::OldestFirst,
        },
    )
    .unwrap();
    assert_eq!(data.bars.len(), 4);
    assert_eq!(data.first_label(), Some("2024.01.02 10:00"));
    assert_eq!(data.bars[3].close, 1.1080);
}

#[test]
fn signal_tape_lists_each_resolution() {
    let file = write_temp_csv(OLDEST_FIRST);
    let data = load_csv(
        file.path(),
        &LoadOptions {
            order: BarOrder::Auto,
        },
    )
    .unwrap();

    let sim = Simulator::new(SimulationConfig {
        min_streak_len: 2,
        ..Default::default()
    })
    .unwrap();
    let resolutions = sim.resolutions(&data.bars);
    assert_eq!(resolutions.len(), 2);
    assert!(resolutions.iter().all(|r| r.signal.kind == SignalKind::Long));
    // Entry bars: +25 / -5 pips.
    assert!(resolutions.iter().all(|r| r.outcome == Outcome::Win));

    let mut out = Vec::new();
    write_signal_tape(&mut out, &resolutions, &data.labels).unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("1,2,2024.01.02 12:00,long,"));
    assert!(rows[2].starts_with("2,3,2024.01.02 13:00,long,"));
    assert!(rows[1].ends_with(",win,true"));
}

#[test]
fn missing_file_reports_path() {
    let err = load_csv(
        std::path::Path::new("/no/such/bars.csv"),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/no/such/bars.csv"));
}
