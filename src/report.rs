//! Tabular console output for query results.

use crate::data::is_numeric;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Cannot compare non-numeric column '{column}' of type {dtype}")]
    NonNumeric { column: String, dtype: DataType },
}

/// Console table formatting applied through polars' `POLARS_FMT_*` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// `None` shows every column.
    pub max_columns: Option<usize>,
    pub table_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_columns: None,
            table_width: 10_000,
        }
    }
}

impl DisplayOptions {
    /// Must run before any table is formatted.
    pub fn apply(&self) {
        let max_cols = self
            .max_columns
            .map_or_else(|| "-1".to_string(), |n| n.to_string());
        std::env::set_var("POLARS_FMT_MAX_COLS", max_cols);
        std::env::set_var("POLARS_TABLE_WIDTH", self.table_width.to_string());
    }
}

/// Print at most `n` rows of a table.
pub fn write_head<W: Write>(out: &mut W, df: &DataFrame, n: usize) -> Result<(), ReportError> {
    writeln!(out, "{}", df.head(Some(n)))?;
    Ok(())
}

/// Strip the quotes polars puts around string values.
fn cell_text(value: &AnyValue) -> String {
    value.to_string().trim_matches('"').to_string()
}

/// Print `fields` of every row whose `column` is greater than `threshold`,
/// one space-separated line per row.
pub fn write_where_greater<W: Write>(
    out: &mut W,
    df: &DataFrame,
    column: &str,
    threshold: f64,
    fields: &[String],
) -> Result<usize, ReportError> {
    let dtype = df
        .column(column)
        .map_err(|_| ReportError::MissingColumn(column.to_string()))?
        .dtype();
    if !is_numeric(dtype) {
        return Err(ReportError::NonNumeric {
            column: column.to_string(),
            dtype: dtype.clone(),
        });
    }
    for field in fields {
        if df.column(field).is_err() {
            return Err(ReportError::MissingColumn(field.clone()));
        }
    }

    let selected = df
        .clone()
        .lazy()
        .filter(col(column).gt(lit(threshold)))
        .select(fields.iter().map(|f| col(f.as_str())).collect::<Vec<_>>())
        .collect()?;

    let columns = selected.get_columns();
    for i in 0..selected.height() {
        let cells = columns
            .iter()
            .map(|c| c.get(i).map(|v| cell_text(&v)))
            .collect::<PolarsResult<Vec<_>>>()?;
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(selected.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> DataFrame {
        df!(
            "name" => ["Alice", "Bob", "Carol"],
            "amount" => [50i64, 200, 120],
        )
        .unwrap()
    }

    #[test]
    fn test_where_greater_prints_matching_rows() {
        let mut out = Vec::new();
        let fields = vec!["name".to_string(), "amount".to_string()];
        let n = write_where_greater(&mut out, &orders(), "amount", 100.0, &fields).unwrap();

        assert_eq!(n, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "Bob 200\nCarol 120\n");
    }

    #[test]
    fn test_where_greater_rejects_text_column() {
        let mut out = Vec::new();
        let err = write_where_greater(&mut out, &orders(), "name", 1.0, &[]).unwrap_err();
        assert!(matches!(err, ReportError::NonNumeric { .. }));
    }

    #[test]
    fn test_display_options_show_every_column() {
        let wide = DataFrame::new(
            (0..14)
                .map(|i| Column::new(format!("col_{i:02}").into(), [i as i64]))
                .collect(),
        )
        .unwrap();

        DisplayOptions::default().apply();
        let mut out = Vec::new();
        write_head(&mut out, &wide, 1).unwrap();
        let text = String::from_utf8(out).unwrap();

        for i in 0..14 {
            assert!(text.contains(&format!("col_{i:02}")), "col_{i:02} hidden");
        }
        assert!(!text.contains('…'));
    }

    #[test]
    fn test_head_is_bounded() {
        let mut out = Vec::new();
        write_head(&mut out, &orders(), 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("shape: (1, 2)"));
        assert!(text.contains("Alice"));
        assert!(!text.contains("Carol"));
    }
}
