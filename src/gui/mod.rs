//! GUI module - Interactive plot window

mod app;

pub use app::{show_scatter, ScatterApp};
