//! Interactive Scatter Window
//! Shows a scatter series with egui_plot; blocks until the window closes.

use crate::charts::{format_axis_value, ChartStyle, PlotError, ScatterSeries};
use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{Plot, PlotPoints, Points};
use tracing::info;

const POINT_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const WINDOW_TITLE: &str = "orderscope";

/// Single-plot window.
pub struct ScatterApp {
    series: ScatterSeries,
    style: ChartStyle,
}

impl ScatterApp {
    pub fn new(series: ScatterSeries, style: ChartStyle) -> Self {
        Self { series, style }
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(title) = &self.style.title {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(title).size(18.0).strong());
                });
            }

            let x_temporal = self.series.x_temporal;
            let y_temporal = self.series.y_temporal;
            let x_label = self
                .style
                .x_label
                .clone()
                .unwrap_or_else(|| self.series.x_column.clone());
            let y_label = self
                .style
                .y_label
                .clone()
                .unwrap_or_else(|| self.series.y_column.clone());

            Plot::new("scatter")
                .x_axis_label(x_label)
                .y_axis_label(y_label)
                .show_grid(self.style.grid)
                .x_axis_formatter(move |mark, _range| format_axis_value(mark.value, x_temporal))
                .y_axis_formatter(move |mark, _range| format_axis_value(mark.value, y_temporal))
                .show(ui, |plot_ui| {
                    let points: PlotPoints = self
                        .series
                        .points
                        .iter()
                        .map(|&(x, y)| [x, y])
                        .collect();
                    plot_ui.points(Points::new(points).radius(3.0).color(POINT_COLOR));
                });
        });
    }
}

/// Open the scatter window and block until it is closed.
pub fn show_scatter(series: ScatterSeries, style: ChartStyle) -> Result<(), PlotError> {
    let (width, height) = style.pixel_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    info!(points = series.points.len(), "opening scatter window");
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(ScatterApp::new(series, style)))),
    )
    .map_err(|e| PlotError::Window(e.to_string()))
}
