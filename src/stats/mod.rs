//! Stats module - distribution summaries

mod calculator;

pub use calculator::{BoxSummary, StatsCalculator};
