//! Chart Viewer Widget
//! Central scrollable panel laying out metric cards, tabs and charts for each page.

use crate::charts::ChartPlotter;
use crate::data::LoanSummary;
use crate::pipeline::{FinancialView, OverviewView};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 380.0;
const CARD_SPACING: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewTab {
    LoansOverTime,
    AmountOverTime,
    IssueDate,
}

impl OverviewTab {
    pub const ALL: [OverviewTab; 3] = [
        OverviewTab::LoansOverTime,
        OverviewTab::AmountOverTime,
        OverviewTab::IssueDate,
    ];

    pub fn title(self) -> &'static str {
        match self {
            OverviewTab::LoansOverTime => "Loans Issued Over Time",
            OverviewTab::AmountOverTime => "Loan Amount Over Time",
            OverviewTab::IssueDate => "Issue Date Analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialTab {
    Distribution,
    ByPurpose,
}

impl FinancialTab {
    pub const ALL: [FinancialTab; 2] = [FinancialTab::Distribution, FinancialTab::ByPurpose];

    pub fn title(self) -> &'static str {
        match self {
            FinancialTab::Distribution => "Loan Amount Distribution",
            FinancialTab::ByPurpose => "Loan Amount Distribution by Purpose",
        }
    }
}

/// Tab selection for both pages. Chart data lives in the views passed to `show_*`.
pub struct ChartViewer {
    pub overview_tab: OverviewTab,
    pub financial_tab: FinancialTab,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            overview_tab: OverviewTab::LoansOverTime,
            financial_tab: FinancialTab::Distribution,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_title(ui: &mut egui::Ui) {
        ui.heading(
            RichText::new("📈 Financial Insights Dashboard: Loan Performance & Trends").size(24.0),
        );
        ui.separator();
    }

    fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, add_contents)
            .inner
    }

    /// Draw the overview page: metrics, time-based tabs and loan performance.
    pub fn show_overview(&mut self, ui: &mut egui::Ui, view: &OverviewView) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::page_title(ui);

                Self::card(ui, |ui| Self::metric_cards(ui, &view.summary));
                ui.add_space(CARD_SPACING);
                ui.separator();

                Self::card(ui, |ui| {
                    ui.horizontal(|ui| {
                        for tab in OverviewTab::ALL {
                            ui.selectable_value(&mut self.overview_tab, tab, tab.title());
                        }
                    });
                    ui.separator();
                    let (id, chart) = match self.overview_tab {
                        OverviewTab::LoansOverTime => ("loans_over_time", &view.loans_over_time),
                        OverviewTab::AmountOverTime => {
                            ("amount_over_time", &view.amount_over_time)
                        }
                        OverviewTab::IssueDate => ("loans_by_weekday", &view.loans_by_weekday),
                    };
                    ChartPlotter::draw(ui, id, chart, CHART_HEIGHT);
                });

                ui.add_space(CARD_SPACING);
                ui.separator();
                ui.heading("Loan Performance");

                egui::CollapsingHeader::new("Distributions")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.columns(2, |columns| {
                            ChartPlotter::draw(
                                &mut columns[0],
                                "loans_by_condition",
                                &view.loans_by_condition,
                                CHART_HEIGHT,
                            );
                            ChartPlotter::draw(
                                &mut columns[1],
                                "loans_by_grade",
                                &view.loans_by_grade,
                                CHART_HEIGHT,
                            );
                        });
                    });
            });
    }

    fn metric_cards(ui: &mut egui::Ui, summary: &LoanSummary) {
        ui.columns(2, |columns| {
            Self::metric(
                &mut columns[0],
                "Total Loans",
                &format_thousands(summary.total_loans as f64),
                "total number of loans",
            );
            Self::metric(
                &mut columns[0],
                "Total Loan Amount",
                &format_currency(Some(summary.total_loan_amount)),
                "sum of all loan amounts",
            );
            Self::metric(
                &mut columns[1],
                "Average Interest Rate",
                &format_percent(summary.mean_interest_rate),
                "percentage of the loan amount that the borrower has to pay",
            );
            Self::metric(
                &mut columns[1],
                "Average Loan Amount",
                &format_currency(summary.mean_loan_amount),
                "average loan amount across all loans",
            );
        });
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: &str, help: &str) {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).size(13.0).color(Color32::GRAY))
                .on_hover_text(help);
            ui.label(RichText::new(value).size(28.0).strong());
        });
        ui.add_space(8.0);
    }

    /// Draw the financial analysis page. Returns the newly selected condition, if any.
    pub fn show_financial(&mut self, ui: &mut egui::Ui, view: &FinancialView) -> Option<String> {
        let mut selection = None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::page_title(ui);
                ui.heading("Financial Analysis");
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.label("Select Loan Condition");
                    ComboBox::from_id_salt("loan_condition")
                        .width(180.0)
                        .selected_text(view.selected.as_deref().unwrap_or("-"))
                        .show_ui(ui, |ui| {
                            for condition in &view.conditions {
                                let is_selected = view.selected.as_ref() == Some(condition);
                                if ui.selectable_label(is_selected, condition).clicked()
                                    && !is_selected
                                {
                                    selection = Some(condition.clone());
                                }
                            }
                        });
                });
                ui.add_space(CARD_SPACING);

                Self::card(ui, |ui| {
                    ui.horizontal(|ui| {
                        for tab in FinancialTab::ALL {
                            ui.selectable_value(&mut self.financial_tab, tab, tab.title());
                        }
                    });
                    ui.separator();
                    let (id, chart) = match self.financial_tab {
                        FinancialTab::Distribution => ("amount_histogram", &view.amount_histogram),
                        FinancialTab::ByPurpose => ("amount_by_purpose", &view.amount_by_purpose),
                    };
                    ChartPlotter::draw(ui, id, chart, CHART_HEIGHT);
                });
            });

        selection
    }

    /// Generic failure notice for a page whose pass did not complete.
    pub fn show_failure(&self, ui: &mut egui::Ui) {
        Self::page_title(ui);
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new("⚠ Failed to render page. See the log for details.")
                    .size(18.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        });
    }
}

/// Format with comma thousands separators, rounded to a whole number.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_currency(value: Option<f64>) -> String {
    value
        .map(|v| format!("${}", format_thousands(v)))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.0}%"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(-12345.0), "-12,345");
    }

    #[test]
    fn metric_values_match_dashboard_format() {
        assert_eq!(format_currency(Some(600.0)), "$600");
        assert_eq!(format_currency(Some(12_345_678.9)), "$12,345,679");
        assert_eq!(format_currency(None), "-");
        assert_eq!(format_percent(Some(12.6)), "13%");
        assert_eq!(format_percent(None), "-");
    }
}
