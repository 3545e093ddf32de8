//! CSV Data Loader Module
//! Handles CSV file loading and column introspection using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Rows scanned when inferring column types.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV {}: {source}", path.display())]
    CsvError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Handles CSV file loading with Polars.
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: usize,
    try_parse_dates: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: INFER_SCHEMA_ROWS,
            try_parse_dates: true,
        }
    }

    /// Override how many rows are scanned for type inference.
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file with a header row into a DataFrame.
    ///
    /// Column types are inferred; ISO dates become `Date` columns. A malformed
    /// record fails the whole load rather than being skipped.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let wrap = |source| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_try_parse_dates(self.try_parse_dates)
            .finish()
            .map_err(wrap)?
            .collect()
            .map_err(wrap)?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        Ok(df)
    }
}

/// Customer and order tables loaded side by side.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub customers: DataFrame,
    pub orders: DataFrame,
}

impl Dataset {
    pub fn new(customers: DataFrame, orders: DataFrame) -> Self {
        Self { customers, orders }
    }

    /// Load both input files with the same loader settings.
    pub fn load(
        loader: &DataLoader,
        customers: impl AsRef<Path>,
        orders: impl AsRef<Path>,
    ) -> Result<Self, LoaderError> {
        Ok(Self {
            customers: loader.load_csv(customers)?,
            orders: loader.load_csv(orders)?,
        })
    }
}

/// Integer and floating point types count as numeric.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Get list of column names of a DataFrame.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Get list of numeric column names.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}
