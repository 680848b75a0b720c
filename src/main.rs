//! Loan Insights - Financial Insights Dashboard
//!
//! Summary metrics, time-series charts and categorical distributions over a
//! pre-cleaned loan dataset, with a condition-filtered amount analysis page.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;
mod stats;

use anyhow::Context;
use config::DashboardConfig;
use eframe::egui;
use gui::LoanDashboardApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_env().context("loading dashboard configuration")?;
    log::info!("Serving loans from {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 700.0])
            .with_title("💸 Demo Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Demo Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(LoanDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
