//! Loan Data Model
//! Column names, ordered category enums, and the loaded table wrapper.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ISSUE_DATE: &str = "issue_date";
pub const ISSUE_WEEKDAY: &str = "issue_weekday";
pub const LOAN_AMOUNT: &str = "loan_amount";
pub const INTEREST_RATE: &str = "interest_rate";
pub const LOAN_CONDITION: &str = "loan_condition";
pub const GRADE: &str = "grade";
pub const TERM: &str = "term";
pub const PURPOSE: &str = "purpose";

/// Every column a loan table must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    ISSUE_DATE,
    ISSUE_WEEKDAY,
    LOAN_AMOUNT,
    INTEREST_RATE,
    LOAN_CONDITION,
    GRADE,
    TERM,
    PURPOSE,
];

/// Columns holding free-form string categories.
pub const CATEGORY_COLUMNS: [&str; 5] = [ISSUE_WEEKDAY, LOAN_CONDITION, GRADE, TERM, PURPOSE];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseCategoryError {
    pub kind: &'static str,
    pub value: String,
}

/// Day of the week a loan was issued, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IssueWeekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl IssueWeekday {
    pub const ALL: [IssueWeekday; 7] = [
        IssueWeekday::Monday,
        IssueWeekday::Tuesday,
        IssueWeekday::Wednesday,
        IssueWeekday::Thursday,
        IssueWeekday::Friday,
        IssueWeekday::Saturday,
        IssueWeekday::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IssueWeekday::Monday => "Monday",
            IssueWeekday::Tuesday => "Tuesday",
            IssueWeekday::Wednesday => "Wednesday",
            IssueWeekday::Thursday => "Thursday",
            IssueWeekday::Friday => "Friday",
            IssueWeekday::Saturday => "Saturday",
            IssueWeekday::Sunday => "Sunday",
        }
    }
}

impl FromStr for IssueWeekday {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError {
                kind: "weekday",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for IssueWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Credit grade, A being the best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
        Grade::G,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
            Grade::G => "G",
        }
    }
}

impl FromStr for Grade {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError {
                kind: "grade",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An immutable, schema-checked table of loan records.
#[derive(Debug, Clone)]
pub struct LoanTable {
    df: DataFrame,
}

impl LoanTable {
    /// Wrap a DataFrame that already carries the normalised loan columns.
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Lazy view over a clone of the underlying frame.
    pub fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    /// Number of loan records.
    pub fn height(&self) -> usize {
        self.df.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parses_full_names_case_insensitively() {
        assert_eq!("Monday".parse::<IssueWeekday>(), Ok(IssueWeekday::Monday));
        assert_eq!("sunday".parse::<IssueWeekday>(), Ok(IssueWeekday::Sunday));
        assert!("Mon".parse::<IssueWeekday>().is_err());
    }

    #[test]
    fn weekday_order_is_calendar_order() {
        let mut days = vec![
            IssueWeekday::Sunday,
            IssueWeekday::Wednesday,
            IssueWeekday::Monday,
        ];
        days.sort();
        assert_eq!(
            days,
            vec![
                IssueWeekday::Monday,
                IssueWeekday::Wednesday,
                IssueWeekday::Sunday
            ]
        );
    }

    #[test]
    fn grade_rejects_labels_outside_a_to_g() {
        assert_eq!("c".parse::<Grade>(), Ok(Grade::C));
        let err = "H".parse::<Grade>().unwrap_err();
        assert_eq!(err.kind, "grade");
        assert_eq!(err.value, "H");
    }
}
