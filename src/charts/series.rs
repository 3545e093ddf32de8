//! Scatter Series Module
//! Extracts (x, y) points from two table columns.

use crate::data::is_numeric;
use chrono::DateTime;
use polars::prelude::*;
use thiserror::Error;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}' has type {dtype}; scatter plots need numeric or date columns")]
    NonNumericColumn { column: String, dtype: DataType },
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Plot window failed: {0}")]
    Window(String),
}

/// Points of a scatter plot. Temporal x values are days since the epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<(f64, f64)>,
    pub x_temporal: bool,
    pub y_temporal: bool,
}

/// Column values as f64, plus whether they are dates.
fn column_values(df: &DataFrame, name: &str) -> Result<(Vec<Option<f64>>, bool), PlotError> {
    let column = df
        .column(name)
        .map_err(|_| PlotError::MissingColumn(name.to_string()))?;

    let (values, temporal) = match column.dtype() {
        dtype if is_numeric(dtype) => (column.cast(&DataType::Float64)?, false),
        DataType::Date => (
            column.cast(&DataType::Int32)?.cast(&DataType::Float64)?,
            true,
        ),
        DataType::Datetime(unit, _) => {
            let per_day = match unit {
                TimeUnit::Nanoseconds => SECONDS_PER_DAY * 1e9,
                TimeUnit::Microseconds => SECONDS_PER_DAY * 1e6,
                TimeUnit::Milliseconds => SECONDS_PER_DAY * 1e3,
            };
            let raw = column.cast(&DataType::Int64)?.cast(&DataType::Float64)?;
            let days = raw
                .f64()?
                .into_iter()
                .map(|v| v.map(|v| v / per_day))
                .collect();
            return Ok((days, true));
        }
        dtype => {
            return Err(PlotError::NonNumericColumn {
                column: name.to_string(),
                dtype: dtype.clone(),
            })
        }
    };

    Ok((values.f64()?.into_iter().collect(), temporal))
}

impl ScatterSeries {
    /// Pair up two columns of a table, skipping rows where either side is
    /// null or not finite.
    pub fn from_frame(df: &DataFrame, x: &str, y: &str) -> Result<Self, PlotError> {
        let (xs, x_temporal) = column_values(df, x)?;
        let (ys, y_temporal) = column_values(df, y)?;

        let points = xs
            .into_iter()
            .zip(ys)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
                _ => None,
            })
            .collect();

        Ok(Self {
            x_column: x.to_string(),
            y_column: y.to_string(),
            points,
            x_temporal,
            y_temporal,
        })
    }

    /// Padded (x, y) ranges covering every point. An empty series gets unit
    /// ranges; a flat axis is widened by one on each side.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
            let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            if !lo.is_finite() {
                return (0.0, 1.0);
            }
            if lo == hi {
                return (lo - 1.0, hi + 1.0);
            }
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }

        (
            padded(self.points.iter().map(|p| p.0)),
            padded(self.points.iter().map(|p| p.1)),
        )
    }
}

/// Tick label for an axis value; temporal axes show `YYYY-MM-DD`.
pub fn format_axis_value(value: f64, temporal: bool) -> String {
    if temporal {
        let secs = (value * SECONDS_PER_DAY).round() as i64;
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return dt.date_naive().format("%Y-%m-%d").to_string();
        }
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_columns_skip_nulls() {
        let df = df!(
            "quantity" => [Some(1i64), Some(2), None],
            "amount" => [Some(10.5), None, Some(3.0)],
        )
        .unwrap();

        let series = ScatterSeries::from_frame(&df, "quantity", "amount").unwrap();
        assert_eq!(series.points, vec![(1.0, 10.5)]);
        assert!(!series.x_temporal);
    }

    #[test]
    fn test_date_axis_is_days_since_epoch() {
        let df = df!(
            "signup_date" => ["1970-01-02", "2024-01-01"],
            "rolling_sum_amount" => [5i64, 7],
        )
        .unwrap()
        .lazy()
        .with_column(col("signup_date").cast(DataType::Date))
        .collect()
        .unwrap();

        let series = ScatterSeries::from_frame(&df, "signup_date", "rolling_sum_amount").unwrap();
        assert!(series.x_temporal);
        assert_eq!(series.points[0], (1.0, 5.0));
        assert_eq!(format_axis_value(series.points[1].0, true), "2024-01-01");
    }

    #[test]
    fn test_text_column_is_a_type_error() {
        let df = df!("name" => ["Alice"], "amount" => [50i64]).unwrap();
        let err = ScatterSeries::from_frame(&df, "name", "amount").unwrap_err();
        assert!(matches!(err, PlotError::NonNumericColumn { .. }));

        let err = ScatterSeries::from_frame(&df, "amount", "missing").unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(_)));
    }

    #[test]
    fn test_bounds() {
        let series = ScatterSeries {
            x_column: "x".into(),
            y_column: "y".into(),
            points: vec![(0.0, 5.0), (10.0, 5.0)],
            x_temporal: false,
            y_temporal: false,
        };
        assert_eq!(series.bounds(), ((-0.5, 10.5), (4.0, 6.0)));

        let empty = ScatterSeries {
            points: Vec::new(),
            ..series
        };
        assert_eq!(empty.bounds(), ((0.0, 1.0), (0.0, 1.0)));
    }

    #[test]
    fn test_format_plain_values() {
        assert_eq!(format_axis_value(200.0, false), "200");
        assert_eq!(format_axis_value(1.234, false), "1.23");
    }
}
