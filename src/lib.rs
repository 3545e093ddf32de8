//! orderscope - Customer & Order CSV Analysis
//!
//! Loads customer and order CSV files, joins them, computes a rolling sum of
//! order amounts and renders scatter charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod pipeline;
pub mod report;

pub use config::AnalysisConfig;
pub use pipeline::{Pipeline, PipelineError};
