//! Analysis configuration loaded from an optional JSON file.

use crate::charts::ChartStyle;
use crate::data::{CustomerKey, DEFAULT_PRECEDING};
use crate::report::DisplayOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every tunable of a run. Missing keys take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub customers: PathBuf,
    pub orders: PathBuf,
    /// Rows shown by previews and head prints.
    pub preview_rows: usize,
    /// Customer selected by the plain join.
    pub customer_id: CustomerKey,
    /// Rows before the current one in the rolling frame.
    pub window_preceding: usize,
    /// Orders above this amount are listed after the plot.
    pub amount_threshold: f64,
    /// Columns printed for each listed order.
    pub listing_fields: Vec<String>,
    pub scatter_x: String,
    pub scatter_y: String,
    pub display: DisplayOptions,
    pub chart: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            customers: PathBuf::from("customers.csv"),
            orders: PathBuf::from("orders.csv"),
            preview_rows: 3,
            customer_id: CustomerKey::Int(1),
            window_preceding: DEFAULT_PRECEDING,
            amount_threshold: 100.0,
            listing_fields: vec!["name".to_string(), "amount".to_string()],
            scatter_x: "signup_date".to_string(),
            scatter_y: "rolling_sum_amount".to_string(),
            display: DisplayOptions::default(),
            chart: ChartStyle::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orderscope.json");
        fs::write(
            &path,
            r#"{"customers": "/data/customers.csv", "window_preceding": 7, "chart": {"show": false}}"#,
        )
        .unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.customers, PathBuf::from("/data/customers.csv"));
        assert_eq!(config.orders, PathBuf::from("orders.csv"));
        assert_eq!(config.window_preceding, 7);
        assert_eq!(config.customer_id, CustomerKey::Int(1));
        assert_eq!(config.amount_threshold, 100.0);
        assert!(!config.chart.show);
        assert_eq!(config.chart.dpi, 100);
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            AnalysisConfig::load(&missing),
            Err(ConfigError::NotFound(_))
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            AnalysisConfig::load(&broken),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = AnalysisConfig::load_or_default(None).unwrap();
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.window_preceding, 15);
        assert_eq!(config.scatter_y, "rolling_sum_amount");
    }
}
