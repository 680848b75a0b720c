//! Loan Aggregation Module
//! Grouped and summary views over a loaded loan table.

use super::model::*;
use crate::stats::{BoxSummary, StatsCalculator};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Default histogram resolution for the loan amount distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

const COUNT: &str = "count";
const TOTAL: &str = "total";

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Unexpected null in column `{0}`")]
    NullValue(&'static str),
    #[error("Unknown value {value:?} in column `{column}`")]
    UnknownCategory { column: &'static str, value: String },
}

/// Headline metrics for the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSummary {
    pub total_loans: u64,
    pub total_loan_amount: f64,
    pub mean_interest_rate: Option<f64>,
    pub mean_loan_amount: Option<f64>,
}

/// Loan amount histogram split by term, sharing one set of bin edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountHistogram {
    pub edges: Vec<f64>,
    pub series: Vec<(String, Vec<u64>)>,
}

/// Box-plot input for one purpose/term pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub purpose: String,
    pub term: String,
    pub summary: BoxSummary,
}

/// Pure aggregation functions over a loan table.
pub struct Aggregator;

impl Aggregator {
    /// Number of loans per issue date, ascending by date.
    pub fn count_by_date(table: &LoanTable) -> Result<Vec<(NaiveDate, u64)>, AggregationError> {
        let grouped = table
            .lazy()
            .group_by([col(ISSUE_DATE)])
            .agg([len().alias(COUNT)])
            .sort([ISSUE_DATE], SortMultipleOptions::default())
            .collect()?;

        let dates = date_values(&grouped, ISSUE_DATE)?;
        let counts = u64_values(&grouped, COUNT)?;
        Ok(dates.into_iter().zip(counts).collect())
    }

    /// Total loan amount per issue date, ascending by date.
    pub fn sum_amount_by_date(
        table: &LoanTable,
    ) -> Result<Vec<(NaiveDate, f64)>, AggregationError> {
        let grouped = table
            .lazy()
            .group_by([col(ISSUE_DATE)])
            .agg([col(LOAN_AMOUNT).sum().alias(TOTAL)])
            .sort([ISSUE_DATE], SortMultipleOptions::default())
            .collect()?;

        let dates = date_values(&grouped, ISSUE_DATE)?;
        let totals = f64_values(&grouped, TOTAL)?;
        Ok(dates.into_iter().zip(totals).collect())
    }

    /// Number of loans per weekday, Monday first.
    pub fn count_by_weekday(
        table: &LoanTable,
    ) -> Result<Vec<(IssueWeekday, u64)>, AggregationError> {
        let mut counts = Self::count_by_category(table, ISSUE_WEEKDAY)?
            .into_iter()
            .map(|(label, count)| Ok((parse_category(ISSUE_WEEKDAY, &label)?, count)))
            .collect::<Result<Vec<(IssueWeekday, u64)>, AggregationError>>()?;
        counts.sort_by_key(|(day, _)| *day);
        Ok(counts)
    }

    /// Number of loans per condition, in order of first appearance.
    pub fn distribution_by_condition(
        table: &LoanTable,
    ) -> Result<Vec<(String, u64)>, AggregationError> {
        Self::count_by_category(table, LOAN_CONDITION)
    }

    /// Number of loans per grade, A first.
    pub fn count_by_grade(table: &LoanTable) -> Result<Vec<(Grade, u64)>, AggregationError> {
        let mut counts = Self::count_by_category(table, GRADE)?
            .into_iter()
            .map(|(label, count)| Ok((parse_category(GRADE, &label)?, count)))
            .collect::<Result<Vec<(Grade, u64)>, AggregationError>>()?;
        counts.sort_by_key(|(grade, _)| *grade);
        Ok(counts)
    }

    /// Rows whose condition equals `condition`.
    pub fn filter_by_condition(
        table: &LoanTable,
        condition: &str,
    ) -> Result<LoanTable, AggregationError> {
        let filtered = table
            .lazy()
            .filter(col(LOAN_CONDITION).eq(lit(condition)))
            .collect()?;
        Ok(LoanTable::from_dataframe(filtered))
    }

    /// Distinct condition values, in order of first appearance.
    pub fn distinct_conditions(table: &LoanTable) -> Result<Vec<String>, AggregationError> {
        let unique = table
            .dataframe()
            .column(LOAN_CONDITION)?
            .as_materialized_series()
            .unique_stable()?;
        str_series_values(&unique, LOAN_CONDITION)
    }

    /// Reject a condition that does not occur in the table.
    pub fn validate_condition(table: &LoanTable, condition: &str) -> Result<(), AggregationError> {
        if Self::distinct_conditions(table)?
            .iter()
            .any(|known| known == condition)
        {
            Ok(())
        } else {
            Err(AggregationError::UnknownCategory {
                column: LOAN_CONDITION,
                value: condition.to_string(),
            })
        }
    }

    /// Headline scalars, computed in a single select over the table.
    pub fn summary(table: &LoanTable) -> Result<LoanSummary, AggregationError> {
        let df = table
            .lazy()
            .select([
                len().alias("total_loans"),
                col(LOAN_AMOUNT).sum().alias("total_loan_amount"),
                col(INTEREST_RATE).mean().alias("mean_interest_rate"),
                col(LOAN_AMOUNT).mean().alias("mean_loan_amount"),
            ])
            .collect()?;

        let total_loans = u64_values(&df, "total_loans")?
            .first()
            .copied()
            .unwrap_or(0);
        Ok(LoanSummary {
            total_loans,
            total_loan_amount: scalar_f64(&df, "total_loan_amount")?.unwrap_or(0.0),
            mean_interest_rate: scalar_f64(&df, "mean_interest_rate")?,
            mean_loan_amount: scalar_f64(&df, "mean_loan_amount")?,
        })
    }

    /// Loan amount histogram with one count series per term.
    pub fn amount_histogram_by_term(
        table: &LoanTable,
        bins: usize,
    ) -> Result<AmountHistogram, AggregationError> {
        let amounts = f64_values(table.dataframe(), LOAN_AMOUNT)?;
        let edges = StatsCalculator::bin_edges(&amounts, bins);

        let grouped = table
            .lazy()
            .group_by_stable([col(TERM)])
            .agg([col(LOAN_AMOUNT)])
            .collect()?;
        let terms = str_values(&grouped, TERM)?;
        let values = list_f64_values(&grouped, LOAN_AMOUNT)?;

        let series = terms
            .into_iter()
            .zip(values)
            .map(|(term, amounts)| (term, StatsCalculator::bin_counts(&edges, &amounts)))
            .collect();
        Ok(AmountHistogram { edges, series })
    }

    /// Loan amount box summaries per purpose and term.
    pub fn amount_box_by_purpose_term(
        table: &LoanTable,
    ) -> Result<Vec<BoxGroup>, AggregationError> {
        let grouped = table
            .lazy()
            .group_by_stable([col(PURPOSE), col(TERM)])
            .agg([col(LOAN_AMOUNT)])
            .collect()?;
        let purposes = str_values(&grouped, PURPOSE)?;
        let terms = str_values(&grouped, TERM)?;
        let values = list_f64_values(&grouped, LOAN_AMOUNT)?;

        Ok(purposes
            .into_iter()
            .zip(terms)
            .zip(values)
            .filter_map(|((purpose, term), amounts)| {
                StatsCalculator::box_summary(&amounts).map(|summary| BoxGroup {
                    purpose,
                    term,
                    summary,
                })
            })
            .collect())
    }

    /// Row count per value of a string column, in order of first appearance.
    fn count_by_category(
        table: &LoanTable,
        column: &'static str,
    ) -> Result<Vec<(String, u64)>, AggregationError> {
        let grouped = table
            .lazy()
            .group_by_stable([col(column)])
            .agg([len().alias(COUNT)])
            .collect()?;

        let labels = str_values(&grouped, column)?;
        let counts = u64_values(&grouped, COUNT)?;
        Ok(labels.into_iter().zip(counts).collect())
    }
}

fn parse_category<T: std::str::FromStr>(
    column: &'static str,
    label: &str,
) -> Result<T, AggregationError> {
    label
        .parse()
        .map_err(|_| AggregationError::UnknownCategory {
            column,
            value: label.to_string(),
        })
}

fn date_values(df: &DataFrame, name: &'static str) -> Result<Vec<NaiveDate>, AggregationError> {
    df.column(name)?
        .as_materialized_series()
        .date()?
        .as_date_iter()
        .map(|v| v.ok_or(AggregationError::NullValue(name)))
        .collect()
}

fn u64_values(df: &DataFrame, name: &'static str) -> Result<Vec<u64>, AggregationError> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    series
        .u64()?
        .into_iter()
        .map(|v| v.ok_or(AggregationError::NullValue(name)))
        .collect()
}

fn f64_values(df: &DataFrame, name: &'static str) -> Result<Vec<f64>, AggregationError> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .map(|v| v.ok_or(AggregationError::NullValue(name)))
        .collect()
}

fn scalar_f64(df: &DataFrame, name: &'static str) -> Result<Option<f64>, AggregationError> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.get(0).filter(|v| !v.is_nan()))
}

fn str_values(df: &DataFrame, name: &'static str) -> Result<Vec<String>, AggregationError> {
    str_series_values(df.column(name)?.as_materialized_series(), name)
}

fn str_series_values(series: &Series, name: &'static str) -> Result<Vec<String>, AggregationError> {
    let series = series.cast(&DataType::String)?;
    series
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::to_string)
                .ok_or(AggregationError::NullValue(name))
        })
        .collect()
}

fn list_f64_values(df: &DataFrame, name: &'static str) -> Result<Vec<Vec<f64>>, AggregationError> {
    df.column(name)?
        .as_materialized_series()
        .list()?
        .into_iter()
        .map(|inner| {
            let inner = inner.ok_or(AggregationError::NullValue(name))?;
            let inner = inner.cast(&DataType::Float64)?;
            inner
                .f64()?
                .into_iter()
                .map(|v| v.ok_or(AggregationError::NullValue(name)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{empty, sample, table};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn count_by_date_is_sorted_and_merged() {
        let counts = Aggregator::count_by_date(&sample()).unwrap();
        assert_eq!(counts, vec![(date(2015, 1, 5), 1), (date(2015, 1, 7), 2)]);
        assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn sum_amount_by_date_totals_each_day() {
        let totals = Aggregator::sum_amount_by_date(&sample()).unwrap();
        assert_eq!(totals, vec![(date(2015, 1, 5), 100.0), (date(2015, 1, 7), 500.0)]);
    }

    #[test]
    fn weekday_counts_follow_calendar_order_and_sum_to_total() {
        let counts = Aggregator::count_by_weekday(&sample()).unwrap();
        assert_eq!(
            counts,
            vec![(IssueWeekday::Monday, 1), (IssueWeekday::Wednesday, 2)]
        );
        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, sample().height() as u64);
    }

    #[test]
    fn unknown_weekday_is_an_aggregation_error() {
        let loans = table(&[(date(2015, 1, 5), "Funday", 1.0, 1.0, "Good Loan", "A", "36 months", "car")]);
        let err = Aggregator::count_by_weekday(&loans).unwrap_err();
        assert!(matches!(
            err,
            AggregationError::UnknownCategory { column: ISSUE_WEEKDAY, .. }
        ));
    }

    #[test]
    fn grade_counts_are_in_label_order() {
        let counts = Aggregator::count_by_grade(&sample()).unwrap();
        assert_eq!(counts, vec![(Grade::A, 1), (Grade::B, 1), (Grade::C, 1)]);
    }

    #[test]
    fn condition_distribution_matches_rows() {
        let distribution = Aggregator::distribution_by_condition(&sample()).unwrap();
        assert_eq!(
            distribution,
            vec![("Good Loan".to_string(), 2), ("Bad Loan".to_string(), 1)]
        );
        let total: u64 = distribution.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn filter_keeps_only_matching_rows_and_is_idempotent() {
        let loans = sample();
        let bad = Aggregator::filter_by_condition(&loans, "Bad Loan").unwrap();
        assert_eq!(bad.height(), 1);
        assert_eq!(
            Aggregator::distinct_conditions(&bad).unwrap(),
            vec!["Bad Loan".to_string()]
        );

        let again = Aggregator::filter_by_condition(&bad, "Bad Loan").unwrap();
        assert!(again.dataframe().equals(bad.dataframe()));

        let none = Aggregator::filter_by_condition(&loans, "Unknown").unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn validate_condition_rejects_absent_values() {
        let loans = sample();
        assert!(Aggregator::validate_condition(&loans, "Good Loan").is_ok());
        assert!(matches!(
            Aggregator::validate_condition(&loans, "Late"),
            Err(AggregationError::UnknownCategory { column: LOAN_CONDITION, .. })
        ));
    }

    #[test]
    fn summary_matches_direct_recomputation() {
        let summary = Aggregator::summary(&sample()).unwrap();
        assert_eq!(summary.total_loans, 3);
        assert_eq!(summary.total_loan_amount, 600.0);
        assert_eq!(summary.mean_loan_amount, Some(200.0));
        assert_eq!(summary.mean_interest_rate, Some(15.0));
    }

    #[test]
    fn empty_table_yields_empty_groupings() {
        let loans = empty();
        assert!(Aggregator::count_by_date(&loans).unwrap().is_empty());
        assert!(Aggregator::count_by_weekday(&loans).unwrap().is_empty());
        assert!(Aggregator::distribution_by_condition(&loans).unwrap().is_empty());
        assert!(Aggregator::distinct_conditions(&loans).unwrap().is_empty());

        let summary = Aggregator::summary(&loans).unwrap();
        assert_eq!(summary.total_loans, 0);
        assert_eq!(summary.mean_loan_amount, None);

        let histogram = Aggregator::amount_histogram_by_term(&loans, 30).unwrap();
        assert!(histogram.edges.is_empty());
        assert!(histogram.series.is_empty());
    }

    #[test]
    fn histogram_counts_every_loan_once() {
        let histogram = Aggregator::amount_histogram_by_term(&sample(), 4).unwrap();
        assert_eq!(histogram.edges.len(), 5);
        assert_eq!(histogram.series.len(), 2);
        assert_eq!(histogram.series[0].0, "36 months");
        assert_eq!(histogram.series[0].1.iter().sum::<u64>(), 2);

        let total: u64 = histogram
            .series
            .iter()
            .flat_map(|(_, counts)| counts.iter())
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn boxes_group_by_purpose_then_term() {
        let boxes = Aggregator::amount_box_by_purpose_term(&sample()).unwrap();
        let keys: Vec<(&str, &str)> = boxes
            .iter()
            .map(|b| (b.purpose.as_str(), b.term.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("car", "36 months"),
                ("car", "60 months"),
                ("house", "36 months")
            ]
        );
        assert_eq!(boxes[0].summary.median, 300.0);
        assert_eq!(boxes[2].summary.count, 1);
    }
}
