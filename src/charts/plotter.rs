//! Chart Plotter Module
//! Draws chart descriptors interactively using egui_plot.

use super::descriptor::{AxisValue, ChartData, ChartDescriptor, ChartKind, ValueAnnotation};
use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridInput, GridMark, Legend, Line, Plot,
    PlotPoints, Points,
};
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

/// Seaborn "deep" palette, in series order.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(76, 114, 176),  // Blue
    Color32::from_rgb(221, 132, 82),  // Orange
    Color32::from_rgb(85, 168, 104),  // Green
    Color32::from_rgb(196, 78, 82),   // Red
    Color32::from_rgb(129, 114, 179), // Purple
    Color32::from_rgb(147, 120, 96),  // Brown
    Color32::from_rgb(218, 139, 195), // Pink
    Color32::from_rgb(140, 140, 140), // Grey
    Color32::from_rgb(204, 185, 116), // Khaki
    Color32::from_rgb(100, 181, 205), // Cyan
];

/// Fraction of a category slot covered by its bars or boxes.
const SLOT_WIDTH: f64 = 0.8;

/// Renders chart descriptors as they are, without altering their bindings.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th series or slice.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw a chart with its title. `id` must be unique within the page.
    pub fn draw(ui: &mut egui::Ui, id: &str, chart: &ChartDescriptor, height: f32) {
        if let Some(title) = &chart.title {
            ui.label(RichText::new(title).size(15.0).strong());
            ui.add_space(4.0);
        }

        match (&chart.kind, &chart.data) {
            (ChartKind::Line, ChartData::Xy { .. }) | (ChartKind::Bar, ChartData::Xy { .. }) => {
                Self::draw_xy(ui, id, chart, height)
            }
            (ChartKind::Pie, ChartData::Slices { .. }) => Self::draw_pie(ui, chart, height),
            (ChartKind::Histogram, ChartData::Bins { .. }) => {
                Self::draw_histogram(ui, id, chart, height)
            }
            (ChartKind::Box, ChartData::Boxes { .. }) => Self::draw_boxes(ui, id, chart, height),
            (kind, _) => {
                log::warn!("Chart {id}: {kind:?} cannot draw the bound data shape");
                ui.label(RichText::new("Unsupported chart").color(Color32::GRAY));
            }
        }
    }

    /// Category labels in axis order: the declared order, then any extras as they appear.
    fn categories(chart: &ChartDescriptor, seen: impl Iterator<Item = String>) -> Vec<String> {
        let mut categories = chart.category_order.clone().unwrap_or_default();
        for category in seen {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    fn date_to_x(date: NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

    /// Line and bar charts over a date or category axis.
    fn draw_xy(ui: &mut egui::Ui, id: &str, chart: &ChartDescriptor, height: f32) {
        let ChartData::Xy { series } = &chart.data else {
            return;
        };

        let seen = series.iter().flat_map(|s| {
            s.points.iter().filter_map(|(x, _)| match x {
                AxisValue::Category(label) => Some(label.clone()),
                AxisValue::Date(_) => None,
            })
        });
        let categories = Self::categories(chart, seen);
        let x_of = |value: &AxisValue| -> f64 {
            match value {
                AxisValue::Date(date) => Self::date_to_x(*date),
                AxisValue::Category(label) => categories
                    .iter()
                    .position(|c| c == label)
                    .map(|i| i as f64)
                    .unwrap_or(f64::NAN),
            }
        };

        let is_temporal = series
            .iter()
            .flat_map(|s| s.points.first())
            .any(|(x, _)| matches!(x, AxisValue::Date(_)));
        let mut plot = Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart.x_label())
            .y_axis_label(chart.y_label());
        if chart.options.show_legend {
            plot = plot.legend(Legend::default());
        }
        plot = if is_temporal {
            plot.x_axis_formatter(date_label)
        } else {
            plot.x_grid_spacer(category_marks(categories.len()))
                .x_axis_formatter(category_label(categories.clone()))
        };

        let bar_width = SLOT_WIDTH / series.len().max(1) as f64;
        plot.show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let color = Self::series_color(i);
                let points: Vec<[f64; 2]> =
                    s.points.iter().map(|(x, y)| [x_of(x), *y]).collect();

                match chart.kind {
                    ChartKind::Bar => {
                        let offset = (i as f64 - (series.len() as f64 - 1.0) / 2.0) * bar_width;
                        let bars = points
                            .iter()
                            .map(|&[x, y]| Bar::new(x + offset, y).width(bar_width * 0.95))
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).name(&s.name).color(color));
                    }
                    _ => {
                        plot_ui.line(
                            Line::new(PlotPoints::from_iter(points.iter().copied()))
                                .color(color)
                                .width(1.5)
                                .name(&s.name),
                        );
                        if chart.options.markers {
                            plot_ui.points(
                                Points::new(PlotPoints::from_iter(points.iter().copied()))
                                    .radius(3.0)
                                    .color(color),
                            );
                        }
                    }
                }
            }
        });
    }

    /// Stacked histogram, one bar chart per series over shared bin edges.
    fn draw_histogram(ui: &mut egui::Ui, id: &str, chart: &ChartDescriptor, height: f32) {
        let ChartData::Bins { edges, series } = &chart.data else {
            return;
        };

        let mut plot = Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart.x_label())
            .y_axis_label(chart.y_label());
        if chart.options.show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            let mut stacked: Vec<BarChart> = Vec::new();
            for (i, s) in series.iter().enumerate() {
                let bars = edges
                    .windows(2)
                    .zip(&s.counts)
                    .map(|(bin, &count)| {
                        Bar::new((bin[0] + bin[1]) / 2.0, count as f64).width(bin[1] - bin[0])
                    })
                    .collect();
                let below: Vec<&BarChart> = stacked.iter().collect();
                let bars = BarChart::new(bars)
                    .name(&s.name)
                    .color(Self::series_color(i))
                    .stack_on(&below);
                stacked.push(bars);
            }
            for bars in stacked {
                plot_ui.bar_chart(bars);
            }
        });
    }

    /// Grouped box plots: one slot per category, one box per series within it.
    fn draw_boxes(ui: &mut egui::Ui, id: &str, chart: &ChartDescriptor, height: f32) {
        let ChartData::Boxes { series } = &chart.data else {
            return;
        };

        let seen = series
            .iter()
            .flat_map(|s| s.boxes.iter().map(|(category, _)| category.clone()));
        let categories = Self::categories(chart, seen);
        let box_width = SLOT_WIDTH / series.len().max(1) as f64;
        let mut plot = Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart.x_label())
            .y_axis_label(chart.y_label())
            .x_grid_spacer(category_marks(categories.len()))
            .x_axis_formatter(category_label(categories.clone()));
        if chart.options.show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let color = Self::series_color(i);
                let offset = (i as f64 - (series.len() as f64 - 1.0) / 2.0) * box_width;
                let mut elems = Vec::new();
                let mut outliers: Vec<[f64; 2]> = Vec::new();

                for (category, summary) in &s.boxes {
                    let Some(slot) = categories.iter().position(|c| c == category) else {
                        continue;
                    };
                    let x = slot as f64 + offset;
                    elems.push(
                        BoxElem::new(
                            x,
                            BoxSpread::new(
                                summary.lower_whisker,
                                summary.q1,
                                summary.median,
                                summary.q3,
                                summary.upper_whisker,
                            ),
                        )
                        .name(format!("{category} / {}", s.name))
                        .box_width(box_width * 0.8)
                        .fill(color.gamma_multiply(0.3))
                        .stroke(Stroke::new(1.5, color)),
                    );
                    outliers.extend(summary.outliers.iter().map(|&v| [x, v]));
                }

                plot_ui.box_plot(BoxPlot::new(elems).name(&s.name).color(color));
                if !outliers.is_empty() {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(outliers))
                            .radius(2.5)
                            .color(color.gamma_multiply(0.7)),
                    );
                }
            }
        });
    }

    /// Pie or donut chart painted directly, with an optional legend.
    fn draw_pie(ui: &mut egui::Ui, chart: &ChartDescriptor, height: f32) {
        let ChartData::Slices { slices } = &chart.data else {
            return;
        };
        let total: f64 = slices.iter().map(|s| s.value).sum();

        if chart.options.show_legend {
            ui.horizontal(|ui| {
                for (i, slice) in slices.iter().enumerate() {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                    ui.painter().rect_filled(rect, 3.0, Self::series_color(i));
                    ui.label(RichText::new(&slice.label).size(13.0));
                    ui.add_space(10.0);
                }
            });
        }

        let width = ui.available_width();
        let (response, painter) = ui.allocate_painter(egui::vec2(width, height), Sense::hover());
        if total <= 0.0 {
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                "No Data",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
            return;
        }

        let center = response.rect.center();
        let outer = (response.rect.width().min(response.rect.height()) / 2.0 - 8.0).max(10.0);
        let inner = outer * chart.options.hole.unwrap_or(0.0).clamp(0.0, 0.95);
        let text_color = ui.visuals().strong_text_color();

        // Start at 12 o'clock and run clockwise.
        let mut start = -TAU / 4.0;
        for (i, slice) in slices.iter().enumerate() {
            let fraction = (slice.value / total) as f32;
            let sweep = fraction * TAU;
            let color = Self::series_color(i);

            // Convex wedge segments keep each shape valid for the tessellator.
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            for step in 0..steps {
                let a0 = start + sweep * step as f32 / steps as f32;
                let a1 = start + sweep * (step + 1) as f32 / steps as f32;
                let points = vec![
                    polar(center, outer, a0),
                    polar(center, outer, a1),
                    polar(center, inner, a1),
                    polar(center, inner, a0),
                ];
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }

            if chart.options.value_annotation == ValueAnnotation::PercentAndValue && fraction > 0.0
            {
                let mid = start + sweep / 2.0;
                let label_radius = if inner > 0.0 {
                    (inner + outer) / 2.0
                } else {
                    outer * 0.6
                };
                painter.text(
                    polar(center, label_radius, mid),
                    Align2::CENTER_CENTER,
                    format!("{:.1}%\n{}", fraction * 100.0, slice.value),
                    FontId::proportional(13.0),
                    text_color,
                );
            }
            start += sweep;
        }
    }
}

/// Integer grid marks, one per category slot.
fn category_marks(count: usize) -> impl Fn(GridInput) -> Vec<GridMark> {
    move |_input| {
        (0..count)
            .map(|i| GridMark {
                value: i as f64,
                step_size: 1.0,
            })
            .collect()
    }
}

/// Axis labels for category slots; anything off-slot stays blank.
fn category_label(categories: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if idx >= 0.0 && (idx as usize) < categories.len() && (mark.value - idx).abs() < 1e-6 {
            categories[idx as usize].clone()
        } else {
            String::new()
        }
    }
}

fn date_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}
