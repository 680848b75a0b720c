//! Loan tables for unit tests.

use super::model::*;
use chrono::NaiveDate;
use polars::prelude::*;

/// (issue_date, weekday, amount, rate, condition, grade, term, purpose)
pub type Row<'a> = (NaiveDate, &'a str, f64, f64, &'a str, &'a str, &'a str, &'a str);

pub fn table(rows: &[Row<'_>]) -> LoanTable {
    let df = df!(
        ISSUE_DATE => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        ISSUE_WEEKDAY => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
        LOAN_AMOUNT => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        INTEREST_RATE => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        LOAN_CONDITION => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
        GRADE => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
        TERM => rows.iter().map(|r| r.6).collect::<Vec<_>>(),
        PURPOSE => rows.iter().map(|r| r.7).collect::<Vec<_>>(),
    )
    .unwrap();
    LoanTable::from_dataframe(df)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three loans: "Good Loan" x2, "Bad Loan" x1, amounts 300/100/200.
pub fn sample() -> LoanTable {
    table(&[
        (date(2015, 1, 7), "Wednesday", 300.0, 15.0, "Good Loan", "C", "36 months", "car"),
        (date(2015, 1, 5), "Monday", 100.0, 10.0, "Good Loan", "A", "60 months", "car"),
        (date(2015, 1, 7), "Wednesday", 200.0, 20.0, "Bad Loan", "B", "36 months", "house"),
    ])
}

pub fn empty() -> LoanTable {
    table(&[])
}
