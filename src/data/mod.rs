//! Data module - CSV loading and customer/order queries

mod loader;
mod query;

pub use loader::{column_names, is_numeric, numeric_columns, DataLoader, Dataset, LoaderError};
pub use query::{
    CustomerKey, QueryEngine, QueryError, SqlSession, DEFAULT_PRECEDING, ROLLING_SUM,
};
