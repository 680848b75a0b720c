//! Charts module - chart descriptors and rendering

mod descriptor;
mod plotter;

pub use descriptor::{ChartDescriptor, ChartSpecBuilder};
#[cfg(test)]
pub use descriptor::{ChartData, ChartKind};
pub use plotter::ChartPlotter;
