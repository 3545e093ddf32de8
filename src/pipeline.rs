//! Pipeline Module
//! Runs load → query → present for each command.

use crate::charts::{PlotError, ScatterRenderer, ScatterSeries};
use crate::config::AnalysisConfig;
use crate::data::{
    column_names, numeric_columns, DataLoader, Dataset, LoaderError, QueryEngine, QueryError,
    SqlSession,
};
use crate::gui;
use crate::report::{self, ReportError};
use polars::prelude::DataFrame;
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Loaded inputs plus the settings that drive each stage.
pub struct Pipeline {
    config: AnalysisConfig,
    data: Dataset,
}

impl Pipeline {
    /// Read both input files named by the config.
    pub fn load(config: AnalysisConfig) -> Result<Self, PipelineError> {
        info!(
            customers = %config.customers.display(),
            orders = %config.orders.display(),
            "loading inputs"
        );
        let data = Dataset::load(&DataLoader::new(), &config.customers, &config.orders)?;
        debug!(
            customers = ?column_names(&data.customers),
            orders = ?column_names(&data.orders),
            numeric = ?numeric_columns(&data.orders),
            "inferred columns"
        );
        Ok(Self { config, data })
    }

    /// First rows of each input, fetched through SQL.
    pub fn preview<W: Write>(&self, out: &mut W) -> Result<(), PipelineError> {
        let mut sql = SqlSession::new(&self.data);
        let limit = self.config.preview_rows;
        writeln!(out, "{}", sql.head("customers", limit)?)?;
        writeln!(out)?;
        writeln!(out, "{}", sql.head("orders", limit)?)?;
        Ok(())
    }

    /// Plain join for the configured customer, printed in full.
    pub fn join<W: Write>(&self, out: &mut W) -> Result<DataFrame, PipelineError> {
        let df = QueryEngine::plain_join(&self.data, self.config.customer_id.clone())?;
        writeln!(out, "{}", df)?;
        Ok(df)
    }

    /// Rolling-sum query, head print, scatter plot, then the order listing.
    pub fn rolling<W: Write>(&self, out: &mut W) -> Result<DataFrame, PipelineError> {
        let df = QueryEngine::rolling_join(&self.data, self.config.window_preceding)?;
        report::write_head(out, &df, self.config.preview_rows)?;
        out.flush()?;

        self.plot(&df)?;

        let listed = report::write_where_greater(
            out,
            &df,
            "amount",
            self.config.amount_threshold,
            &self.config.listing_fields,
        )?;
        info!(listed, threshold = self.config.amount_threshold, "listed large orders");
        Ok(df)
    }

    /// Save and/or show the scatter plot of the configured columns.
    pub fn plot(&self, df: &DataFrame) -> Result<ScatterSeries, PipelineError> {
        let series = ScatterSeries::from_frame(df, &self.config.scatter_x, &self.config.scatter_y)?;
        let style = &self.config.chart;

        if let Some(path) = &style.save_path {
            ScatterRenderer::save_png(&series, style, path)?;
        }
        if style.show {
            gui::show_scatter(series.clone(), style.clone())?;
        }
        Ok(series)
    }

    /// Ad-hoc SQL over `customers` and `orders`.
    pub fn sql<W: Write>(&self, out: &mut W, query: &str) -> Result<DataFrame, PipelineError> {
        let df = SqlSession::new(&self.data).execute(query)?;
        writeln!(out, "{}", df)?;
        Ok(df)
    }

    /// Preview followed by the rolling analysis.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<DataFrame, PipelineError> {
        self.preview(out)?;
        self.rolling(out)
    }
}
