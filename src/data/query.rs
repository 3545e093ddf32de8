//! Query Module
//! Joins customers to orders and computes the rolling amount window.

use super::loader::{is_numeric, Dataset};
use polars::prelude::*;
use polars::sql::SQLContext;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const JOIN_KEY: &str = "customer_id";
pub const ORDER_BY: &str = "signup_date";
pub const QUANTITY: &str = "quantity";
pub const AMOUNT: &str = "amount";
pub const ROLLING_SUM: &str = "rolling_sum_amount";

/// Rows preceding the current one inside the rolling frame.
pub const DEFAULT_PRECEDING: usize = 15;

const CUSTOMER_ROW: &str = "__customer_row";
const ORDER_ROW: &str = "__order_row";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' not found in {table}")]
    MissingColumn { table: &'static str, column: String },
    #[error("Join key 'customer_id' has type {left} in customers but {right} in orders")]
    KeyTypeMismatch { left: DataType, right: DataType },
    #[error("Cannot aggregate non-numeric column '{column}' of type {dtype}")]
    NonNumeric { column: String, dtype: DataType },
    #[error("Customer id '{value}' does not match join key type {dtype}")]
    KeyValueMismatch { value: String, dtype: DataType },
}

/// A `customer_id` value to select; matched against the key column's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerKey {
    Int(i64),
    Text(String),
}

impl From<i64> for CustomerKey {
    fn from(id: i64) -> Self {
        CustomerKey::Int(id)
    }
}

impl From<&str> for CustomerKey {
    fn from(id: &str) -> Self {
        CustomerKey::Text(id.to_string())
    }
}

/// Integers parse as `Int`, anything else is kept as text.
impl FromStr for CustomerKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(CustomerKey::Int)
            .unwrap_or_else(|_| CustomerKey::Text(s.to_string())))
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKey::Int(id) => write!(f, "{id}"),
            CustomerKey::Text(id) => f.write_str(id),
        }
    }
}

impl CustomerKey {
    /// Literal of the key column's type.
    fn literal(&self, dtype: &DataType) -> Result<Expr, QueryError> {
        let mismatch = || QueryError::KeyValueMismatch {
            value: self.to_string(),
            dtype: dtype.clone(),
        };
        match (self, dtype) {
            (CustomerKey::Int(id), dtype) if is_numeric(dtype) => Ok(lit(*id)),
            (CustomerKey::Text(id), dtype) if is_numeric(dtype) => {
                id.trim().parse::<i64>().map(lit).map_err(|_| mismatch())
            }
            (key, DataType::String) => Ok(lit(key.to_string())),
            _ => Err(mismatch()),
        }
    }
}

fn require_column<'a>(
    df: &'a DataFrame,
    table: &'static str,
    column: &str,
) -> Result<&'a DataType, QueryError> {
    df.column(column)
        .map(|c| c.dtype())
        .map_err(|_| QueryError::MissingColumn {
            table,
            column: column.to_string(),
        })
}

/// Builds the customer/order queries over a loaded [`Dataset`].
pub struct QueryEngine;

impl QueryEngine {
    /// Customers left-joined to orders, rows kept in customer file order then
    /// order file order.
    fn joined(data: &Dataset) -> Result<LazyFrame, QueryError> {
        let left = require_column(&data.customers, "customers", JOIN_KEY)?;
        let right = require_column(&data.orders, "orders", JOIN_KEY)?;
        if left != right {
            return Err(QueryError::KeyTypeMismatch {
                left: left.clone(),
                right: right.clone(),
            });
        }

        let customers = data.customers.clone().lazy().with_row_index(CUSTOMER_ROW, None);
        let orders = data.orders.clone().lazy().with_row_index(ORDER_ROW, None);

        Ok(customers
            .join(
                orders,
                [col(JOIN_KEY)],
                [col(JOIN_KEY)],
                JoinArgs::new(JoinType::Left),
            )
            .sort(
                [CUSTOMER_ROW, ORDER_ROW],
                SortMultipleOptions::default().with_nulls_last(true),
            ))
    }

    /// Left join customers to orders restricted to one `customer_id`.
    ///
    /// A customer without orders yields a single row with null order columns;
    /// an id missing from the customer table yields no rows.
    pub fn plain_join(
        data: &Dataset,
        customer_id: impl Into<CustomerKey>,
    ) -> Result<DataFrame, QueryError> {
        let customer_id = customer_id.into();
        let joined = Self::joined(data)?;
        let key = customer_id.literal(require_column(&data.customers, "customers", JOIN_KEY)?)?;
        let df = joined
            .filter(col(JOIN_KEY).eq(key))
            .drop([CUSTOMER_ROW, ORDER_ROW])
            .collect()?;

        info!(%customer_id, rows = df.height(), "plain join");
        Ok(df)
    }

    /// Left join with a rolling sum of `amount` over `signup_date` order.
    ///
    /// Rows with a null `quantity` or `amount` are dropped first. The frame for
    /// each row is the row itself plus up to `preceding` earlier rows, over the
    /// whole result as a single partition; early rows get a shorter frame.
    pub fn rolling_join(data: &Dataset, preceding: usize) -> Result<DataFrame, QueryError> {
        require_column(&data.customers, "customers", ORDER_BY)?;
        require_column(&data.orders, "orders", QUANTITY)?;
        let amount = require_column(&data.orders, "orders", AMOUNT)?;
        if !is_numeric(amount) {
            return Err(QueryError::NonNumeric {
                column: AMOUNT.to_string(),
                dtype: amount.clone(),
            });
        }

        let ordered = Self::joined(data)?
            .filter(col(QUANTITY).is_not_null().and(col(AMOUNT).is_not_null()))
            .sort(
                [ORDER_BY],
                SortMultipleOptions::default()
                    .with_maintain_order(true)
                    .with_nulls_last(true),
            )
            .collect()?;

        // A frame never spans more rows than the result holds.
        let window = RollingOptionsFixedWindow {
            window_size: preceding.saturating_add(1).min(ordered.height().max(1)),
            min_periods: 1,
            ..Default::default()
        };

        let df = ordered
            .lazy()
            .with_column(col(AMOUNT).rolling_sum(window).alias(ROLLING_SUM))
            .drop([CUSTOMER_ROW, ORDER_ROW])
            .collect()?;

        info!(preceding, rows = df.height(), "rolling join");
        Ok(df)
    }
}

/// SQL over the loaded tables, registered as `customers` and `orders`.
pub struct SqlSession {
    ctx: SQLContext,
}

impl SqlSession {
    pub fn new(data: &Dataset) -> Self {
        let mut ctx = SQLContext::new();
        ctx.register("customers", data.customers.clone().lazy());
        ctx.register("orders", data.orders.clone().lazy());
        Self { ctx }
    }

    /// Execute one SQL statement and materialize the result.
    pub fn execute(&mut self, sql: &str) -> Result<DataFrame, QueryError> {
        debug!(sql, "executing sql");
        Ok(self.ctx.execute(sql)?.collect()?)
    }

    /// First `limit` rows of a registered table.
    pub fn head(&mut self, table: &str, limit: usize) -> Result<DataFrame, QueryError> {
        self.execute(&format!("select * from {table} limit {limit}"))
    }
}
