//! Render Pipeline
//! One synchronous pass per page: load, aggregate, build chart descriptors.

use crate::charts::{ChartDescriptor, ChartSpecBuilder};
use crate::config::DashboardConfig;
use crate::data::{AggregationError, Aggregator, LoanLoader, LoanSummary, LoanTable};
use anyhow::{Context, Result};

/// Everything the overview page shows.
#[derive(Debug, Clone)]
pub struct OverviewView {
    pub summary: LoanSummary,
    pub loans_over_time: ChartDescriptor,
    pub amount_over_time: ChartDescriptor,
    pub loans_by_weekday: ChartDescriptor,
    pub loans_by_condition: ChartDescriptor,
    pub loans_by_grade: ChartDescriptor,
}

impl OverviewView {
    pub fn build(table: &LoanTable) -> Result<Self, AggregationError> {
        Ok(Self {
            summary: Aggregator::summary(table)?,
            loans_over_time: ChartSpecBuilder::loans_over_time(&Aggregator::count_by_date(
                table,
            )?),
            amount_over_time: ChartSpecBuilder::amount_over_time(
                &Aggregator::sum_amount_by_date(table)?,
            ),
            loans_by_weekday: ChartSpecBuilder::loans_by_weekday(&Aggregator::count_by_weekday(
                table,
            )?),
            loans_by_condition: ChartSpecBuilder::loans_by_condition(
                &Aggregator::distribution_by_condition(table)?,
            ),
            loans_by_grade: ChartSpecBuilder::loans_by_grade(&Aggregator::count_by_grade(table)?),
        })
    }
}

/// Everything the financial analysis page shows for one selected condition.
#[derive(Debug, Clone)]
pub struct FinancialView {
    /// Selector options, in order of first appearance.
    pub conditions: Vec<String>,
    pub selected: Option<String>,
    pub amount_histogram: ChartDescriptor,
    pub amount_by_purpose: ChartDescriptor,
}

impl FinancialView {
    /// Build the page for `selected`, or for the first known condition when `None`.
    pub fn build(
        table: &LoanTable,
        selected: Option<&str>,
        bins: usize,
    ) -> Result<Self, AggregationError> {
        let conditions = Aggregator::distinct_conditions(table)?;
        let selected = match selected {
            Some(condition) => {
                Aggregator::validate_condition(table, condition)?;
                Some(condition.to_string())
            }
            None => conditions.first().cloned(),
        };

        let subset = match &selected {
            Some(condition) => Aggregator::filter_by_condition(table, condition)?,
            None => table.clone(),
        };

        Ok(Self {
            conditions,
            selected,
            amount_histogram: ChartSpecBuilder::amount_histogram(
                &Aggregator::amount_histogram_by_term(&subset, bins)?,
            ),
            amount_by_purpose: ChartSpecBuilder::amount_by_purpose(
                &Aggregator::amount_box_by_purpose_term(&subset)?,
            ),
        })
    }
}

fn load(config: &DashboardConfig) -> Result<LoanTable> {
    LoanLoader::new(&config.data_path)
        .load()
        .with_context(|| format!("loading loans from {}", config.data_path.display()))
}

/// Run the overview pass against the configured dataset.
pub fn render_overview(config: &DashboardConfig) -> Result<OverviewView> {
    let table = load(config)?;
    OverviewView::build(&table).context("building overview charts")
}

/// Run the financial analysis pass against the configured dataset.
pub fn render_financial(config: &DashboardConfig, selected: Option<&str>) -> Result<FinancialView> {
    let table = load(config)?;
    FinancialView::build(&table, selected, config.histogram_bins)
        .context("building financial analysis charts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartData, ChartKind};
    use crate::data::fixtures::{empty, sample};
    use std::path::PathBuf;

    #[test]
    fn overview_binds_each_aggregation_to_its_chart() {
        let view = OverviewView::build(&sample()).unwrap();

        assert_eq!(view.summary.total_loans, 3);
        assert_eq!(view.loans_over_time.kind, ChartKind::Line);
        assert_eq!(view.loans_by_condition.kind, ChartKind::Pie);
        let ChartData::Xy { series } = &view.loans_by_grade.data else {
            panic!("expected xy data");
        };
        assert_eq!(series[0].points.len(), 3);
    }

    #[test]
    fn financial_view_defaults_to_first_condition() {
        let view = FinancialView::build(&sample(), None, 30).unwrap();
        assert_eq!(view.conditions, vec!["Good Loan", "Bad Loan"]);
        assert_eq!(view.selected.as_deref(), Some("Good Loan"));

        let ChartData::Bins { series, .. } = &view.amount_histogram.data else {
            panic!("expected bins");
        };
        let total: u64 = series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn financial_view_filters_to_selected_condition() {
        let view = FinancialView::build(&sample(), Some("Bad Loan"), 30).unwrap();
        let ChartData::Boxes { series } = &view.amount_by_purpose.data else {
            panic!("expected boxes");
        };
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].boxes.len(), 1);
        assert_eq!(series[0].boxes[0].0, "house");
    }

    #[test]
    fn financial_view_rejects_unknown_condition() {
        let err = FinancialView::build(&sample(), Some("Charged Off"), 30).unwrap_err();
        assert!(matches!(err, AggregationError::UnknownCategory { .. }));
    }

    #[test]
    fn empty_table_renders_empty_charts() {
        let view = FinancialView::build(&empty(), None, 30).unwrap();
        assert!(view.conditions.is_empty());
        assert!(view.selected.is_none());

        let overview = OverviewView::build(&empty()).unwrap();
        assert_eq!(overview.summary.total_loans, 0);
    }

    #[test]
    fn missing_dataset_fails_the_pass() {
        let config = DashboardConfig::default()
            .with_data_override(Some(PathBuf::from("missing/loans.parquet")));
        let err = render_overview(&config).unwrap_err();
        assert!(format!("{err:#}").contains("Dataset not found"));
    }
}
