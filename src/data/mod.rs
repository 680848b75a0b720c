//! Data module - loan loading and aggregation

mod aggregation;
mod loader;
mod model;

pub use aggregation::{
    AggregationError, Aggregator, AmountHistogram, BoxGroup, LoanSummary,
    DEFAULT_HISTOGRAM_BINS,
};
pub use loader::LoanLoader;
pub use model::{Grade, IssueWeekday, LoanTable};

#[cfg(test)]
pub(crate) mod fixtures;
