//! Static Chart Renderer
//! Writes scatter plots to PNG files with plotters.

use super::series::{format_axis_value, PlotError, ScatterSeries};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const POINT_RADIUS: i32 = 3;
const TITLE_FONT_SIZE: u32 = 20;
const LABEL_FONT_SIZE: u32 = 14;

/// Scatter plot appearance and output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub grid: bool,
    /// Opacity of the major grid lines, 0.0 to 1.0.
    pub grid_alpha: f64,
    /// Figure size in inches.
    pub figsize: (f64, f64),
    pub dpi: u32,
    /// Write a PNG here before any window opens.
    pub save_path: Option<PathBuf>,
    /// Open the interactive window.
    pub show: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            x_label: None,
            y_label: None,
            title: None,
            grid: false,
            grid_alpha: 0.3,
            figsize: (8.0, 6.0),
            dpi: 100,
            save_path: None,
            show: true,
        }
    }
}

impl ChartStyle {
    /// Bitmap size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.figsize.0 * dpi).round().max(1.0) as u32,
            (self.figsize.1 * dpi).round().max(1.0) as u32,
        )
    }
}

fn render_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::Render(e.to_string())
}

pub struct ScatterRenderer;

impl ScatterRenderer {
    /// Render a scatter plot to a PNG file.
    pub fn save_png(
        series: &ScatterSeries,
        style: &ChartStyle,
        path: &Path,
    ) -> Result<(), PlotError> {
        let ((x0, x1), (y0, y1)) = series.bounds();
        let x_fmt = |v: &f64| format_axis_value(*v, series.x_temporal);
        let y_fmt = |v: &f64| format_axis_value(*v, series.y_temporal);

        let root = BitMapBackend::new(path, style.pixel_size()).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = &style.title {
            builder.caption(title, ("sans-serif", TITLE_FONT_SIZE));
        }
        let mut chart = builder
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style(("sans-serif", LABEL_FONT_SIZE));
        if style.grid {
            mesh.bold_line_style(BLACK.mix(style.grid_alpha))
                .light_line_style(BLACK.mix(style.grid_alpha / 3.0));
        } else {
            mesh.disable_mesh();
        }
        if let Some(label) = &style.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &style.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().map_err(render_err)?;

        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), POINT_RADIUS, POINT_COLOR.filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(path = %path.display(), points = series.points.len(), "saved scatter plot");
        Ok(())
    }
}
