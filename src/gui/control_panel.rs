//! Control Panel Widget
//! Left side panel with the feature list, page navigation and data source.

use crate::gui::Page;
use egui::{Color32, RichText};
use std::path::Path;

const FEATURES: [(&str, &str); 4] = [
    ("Overview", "Provides a summary of key loan metrics."),
    ("Loan Performance", "Analyzes loan conditions and distributions."),
    (
        "Financial Analysis",
        "Examines loan amounts and distributions based on conditions.",
    ),
    (
        "Time-Based Analysis",
        "Shows trends over time and loan amounts.",
    ),
];

/// Left side control panel.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, current: Page, data_path: &Path) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Dashboard Filters and Features")
                    .size(18.0)
                    .strong(),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Features =====
        ui.label(RichText::new("Features").size(15.0).strong());
        ui.add_space(5.0);
        for (name, description) in FEATURES {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(format!("• {name}:")).strong());
                ui.label(description);
            });
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Navigation =====
        ui.label(RichText::new("📄 Pages").size(15.0).strong());
        ui.add_space(5.0);
        for page in Page::ALL {
            if ui
                .selectable_label(current == page, page.title())
                .clicked()
                && current != page
            {
                action = ControlPanelAction::Navigate(page);
            }
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(15.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(data_path.display().to_string()).size(12.0));
                if ui.button("🔄 Reload").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

        ui.add_space(10.0);
        let status_color = if self.status.contains("Failed") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Navigate(Page),
    Reload,
}
