//! Charts module - Scatter series extraction and static rendering

mod renderer;
mod series;

pub use renderer::{ChartStyle, ScatterRenderer};
pub use series::{format_axis_value, PlotError, ScatterSeries};
