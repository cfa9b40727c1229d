//! Domain types for the continuity backtester

pub mod bar;

pub use bar::{Bar, CandleDirection};
