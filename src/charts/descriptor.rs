//! Chart Descriptor Module
//! Declarative, renderer-agnostic chart descriptors built from aggregations.

use crate::data::{AmountHistogram, BoxGroup, Grade, IssueWeekday};
use crate::stats::BoxSummary;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Visual template shared by every chart.
pub const TEMPLATE: &str = "seaborn";

pub const LABEL_ISSUE_DATE: &str = "Issue Date";
pub const LABEL_LOAN_COUNT: &str = "Number of Loans";
pub const LABEL_LOAN_AMOUNT: &str = "Loan Amount";
pub const LABEL_WEEKDAY: &str = "Day of the Week";
pub const LABEL_GRADE: &str = "Grade";
pub const LABEL_TERM: &str = "Loan Term";
pub const LABEL_PURPOSE: &str = "Loan Purpose";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Histogram,
    Box,
}

/// One position on a temporal or categorical axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Date(NaiveDate),
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XySeries {
    pub name: String,
    pub points: Vec<(AxisValue, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSeries {
    pub name: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub name: String,
    pub boxes: Vec<(String, BoxSummary)>,
}

/// Data bound to a chart, shaped by what the chart draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ChartData {
    Xy { series: Vec<XySeries> },
    Slices { slices: Vec<Slice> },
    Bins { edges: Vec<f64>, series: Vec<BinSeries> },
    Boxes { series: Vec<BoxSeries> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAnnotation {
    None,
    PercentAndValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub show_legend: bool,
    pub markers: bool,
    /// Inner radius of a pie as a fraction of the outer radius.
    pub hole: Option<f32>,
    pub value_annotation: ValueAnnotation,
    pub template: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            markers: false,
            hole: None,
            value_annotation: ValueAnnotation::None,
            template: TEMPLATE.to_string(),
        }
    }
}

/// A complete description of one visualization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub data: ChartData,
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub category_order: Option<Vec<String>>,
    pub options: DisplayOptions,
}

impl ChartDescriptor {
    /// Human-readable label for a bound field, falling back to the field name.
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map(String::as_str).unwrap_or(field)
    }

    pub fn x_label(&self) -> &str {
        self.label(&self.x)
    }

    pub fn y_label(&self) -> &str {
        self.y.as_deref().map(|y| self.label(y)).unwrap_or("")
    }
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(field, label)| (field.to_string(), label.to_string()))
        .collect()
}

/// Maps aggregation results to chart descriptors. No computation happens here.
pub struct ChartSpecBuilder;

impl ChartSpecBuilder {
    /// Line chart of loans issued per day.
    pub fn loans_over_time(counts: &[(NaiveDate, u64)]) -> ChartDescriptor {
        Self::date_line(
            counts
                .iter()
                .map(|&(date, count)| (AxisValue::Date(date), count as f64))
                .collect(),
            "count",
            LABEL_LOAN_COUNT,
        )
    }

    /// Line chart of the total amount lent per day.
    pub fn amount_over_time(totals: &[(NaiveDate, f64)]) -> ChartDescriptor {
        Self::date_line(
            totals
                .iter()
                .map(|&(date, total)| (AxisValue::Date(date), total))
                .collect(),
            "loan_amount",
            LABEL_LOAN_AMOUNT,
        )
    }

    fn date_line(points: Vec<(AxisValue, f64)>, y: &str, y_label: &str) -> ChartDescriptor {
        ChartDescriptor {
            kind: ChartKind::Line,
            title: None,
            data: ChartData::Xy {
                series: vec![XySeries {
                    name: y.to_string(),
                    points,
                }],
            },
            x: "issue_date".to_string(),
            y: Some(y.to_string()),
            color: None,
            labels: labels(&[("issue_date", LABEL_ISSUE_DATE), (y, y_label)]),
            category_order: None,
            options: DisplayOptions {
                show_legend: false,
                markers: true,
                ..DisplayOptions::default()
            },
        }
    }

    /// Bar chart of loans per weekday, axis fixed Monday to Sunday.
    pub fn loans_by_weekday(counts: &[(IssueWeekday, u64)]) -> ChartDescriptor {
        ChartDescriptor {
            kind: ChartKind::Bar,
            title: Some("Distribution of Loans by Day of the Week".to_string()),
            data: ChartData::Xy {
                series: vec![XySeries {
                    name: "count".to_string(),
                    points: counts
                        .iter()
                        .map(|&(day, count)| {
                            (AxisValue::Category(day.label().to_string()), count as f64)
                        })
                        .collect(),
                }],
            },
            x: "issue_weekday".to_string(),
            y: Some("count".to_string()),
            color: None,
            labels: labels(&[("issue_weekday", LABEL_WEEKDAY), ("count", LABEL_LOAN_COUNT)]),
            category_order: Some(
                IssueWeekday::ALL
                    .iter()
                    .map(|day| day.label().to_string())
                    .collect(),
            ),
            options: DisplayOptions {
                show_legend: false,
                ..DisplayOptions::default()
            },
        }
    }

    /// Donut chart of loans per condition, annotated with percent and count.
    pub fn loans_by_condition(distribution: &[(String, u64)]) -> ChartDescriptor {
        ChartDescriptor {
            kind: ChartKind::Pie,
            title: Some("Distribution of Loans by Condition".to_string()),
            data: ChartData::Slices {
                slices: distribution
                    .iter()
                    .map(|(label, count)| Slice {
                        label: label.clone(),
                        value: *count as f64,
                    })
                    .collect(),
            },
            x: "loan_condition".to_string(),
            y: None,
            color: Some("loan_condition".to_string()),
            labels: BTreeMap::new(),
            category_order: None,
            options: DisplayOptions {
                hole: Some(0.5),
                value_annotation: ValueAnnotation::PercentAndValue,
                ..DisplayOptions::default()
            },
        }
    }

    /// Bar chart of loans per grade, axis fixed A to G.
    pub fn loans_by_grade(counts: &[(Grade, u64)]) -> ChartDescriptor {
        ChartDescriptor {
            kind: ChartKind::Bar,
            title: Some("Distribution of Loans by Grade".to_string()),
            data: ChartData::Xy {
                series: vec![XySeries {
                    name: "count".to_string(),
                    points: counts
                        .iter()
                        .map(|&(grade, count)| {
                            (AxisValue::Category(grade.label().to_string()), count as f64)
                        })
                        .collect(),
                }],
            },
            x: "grade".to_string(),
            y: Some("count".to_string()),
            color: None,
            labels: labels(&[("grade", LABEL_GRADE), ("count", LABEL_LOAN_COUNT)]),
            category_order: Some(Grade::ALL.iter().map(|g| g.label().to_string()).collect()),
            options: DisplayOptions {
                show_legend: false,
                ..DisplayOptions::default()
            },
        }
    }

    /// Stacked histogram of loan amounts, one color per term.
    pub fn amount_histogram(histogram: &AmountHistogram) -> ChartDescriptor {
        ChartDescriptor {
            kind: ChartKind::Histogram,
            title: Some("Loan Amount Distribution by Condition".to_string()),
            data: ChartData::Bins {
                edges: histogram.edges.clone(),
                series: histogram
                    .series
                    .iter()
                    .map(|(term, counts)| BinSeries {
                        name: term.clone(),
                        counts: counts.clone(),
                    })
                    .collect(),
            },
            x: "loan_amount".to_string(),
            y: Some("count".to_string()),
            color: Some("term".to_string()),
            labels: labels(&[
                ("loan_amount", LABEL_LOAN_AMOUNT),
                ("term", LABEL_TERM),
                ("count", "count"),
            ]),
            category_order: None,
            options: DisplayOptions::default(),
        }
    }

    /// Box plots of loan amount per purpose, one color per term.
    pub fn amount_by_purpose(groups: &[BoxGroup]) -> ChartDescriptor {
        let mut purposes: Vec<String> = Vec::new();
        let mut series: Vec<BoxSeries> = Vec::new();

        for group in groups {
            if !purposes.contains(&group.purpose) {
                purposes.push(group.purpose.clone());
            }
            let entry = (group.purpose.clone(), group.summary.clone());
            match series.iter_mut().find(|s| s.name == group.term) {
                Some(existing) => existing.boxes.push(entry),
                None => series.push(BoxSeries {
                    name: group.term.clone(),
                    boxes: vec![entry],
                }),
            }
        }

        ChartDescriptor {
            kind: ChartKind::Box,
            title: Some("Loan Amount Distribution by Purpose".to_string()),
            data: ChartData::Boxes { series },
            x: "purpose".to_string(),
            y: Some("loan_amount".to_string()),
            color: Some("term".to_string()),
            labels: labels(&[
                ("loan_amount", LABEL_LOAN_AMOUNT),
                ("term", LABEL_TERM),
                ("purpose", LABEL_PURPOSE),
            ]),
            category_order: Some(purposes),
            options: DisplayOptions::default(),
        }
    }
}
