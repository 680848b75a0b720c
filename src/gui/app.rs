//! Loan Dashboard Main Application
//! Main window with control panel and page views.

use crate::config::DashboardConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, FinancialView, OverviewView};
use egui::SidePanel;

/// The two dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    FinancialAnalysis,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Overview, Page::FinancialAnalysis];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::FinancialAnalysis => "Financial Analysis",
        }
    }
}

/// Output of the latest pass for the current page.
enum PageView {
    Overview(OverviewView),
    Financial(FinancialView),
    Failed,
}

/// Main application window.
pub struct LoanDashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    page: Page,
    /// `None` until the pass for `page` has run.
    view: Option<PageView>,
}

impl LoanDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            page: Page::Overview,
            view: None,
        }
    }

    /// Run the pass for the current page, optionally for a newly selected condition.
    fn render_pass(&mut self, condition: Option<&str>) {
        let result = match self.page {
            Page::Overview => pipeline::render_overview(&self.config).map(PageView::Overview),
            Page::FinancialAnalysis => {
                pipeline::render_financial(&self.config, condition).map(PageView::Financial)
            }
        };

        let view = match result {
            Ok(view) => {
                log::debug!("Rendered {} page", self.page.title());
                self.control_panel
                    .set_status(&format!("{} ready", self.page.title()));
                view
            }
            Err(err) => {
                log::error!("Failed to render {} page: {err:#}", self.page.title());
                self.control_panel.set_status("Failed to render page");
                PageView::Failed
            }
        };
        self.view = Some(view);
    }

    fn selected_condition(&self) -> Option<String> {
        match &self.view {
            Some(PageView::Financial(view)) => view.selected.clone(),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::Navigate(page) => {
                self.page = page;
                self.view = None;
            }
            ControlPanelAction::Reload => {
                let condition = self.selected_condition();
                self.render_pass(condition.as_deref());
            }
            ControlPanelAction::None => {}
        }
    }
}

impl eframe::App for LoanDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.view.is_none() {
            self.render_pass(None);
        }

        // Left panel - Control Panel
        let page = self.page;
        let action = SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        self.control_panel
                            .show(ui, page, &self.config.data_path)
                    })
                    .inner
            })
            .inner;
        self.handle_action(action);

        // Central panel - page view
        let mut selection = None;
        egui::CentralPanel::default().show(ctx, |ui| match &self.view {
            Some(PageView::Overview(view)) => self.chart_viewer.show_overview(ui, view),
            Some(PageView::Financial(view)) => {
                selection = self.chart_viewer.show_financial(ui, view);
            }
            Some(PageView::Failed) => self.chart_viewer.show_failure(ui),
            None => {
                ui.centered_and_justified(|ui| ui.spinner());
            }
        });

        if let Some(condition) = selection {
            log::info!("Selected loan condition {condition:?}");
            self.render_pass(Some(&condition));
        }
    }
}
