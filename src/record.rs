//! Record types flowing through the pipeline
//!
//! A `RawBatch` of `RawRecord`s comes out of an extractor, the
//! transformer reshapes it into canonical `SalesRecord`s, and the
//! loader appends those to the store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical timestamp format for `sale_date`
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sentinel stored in `sale_date` when the source value cannot be
/// parsed. The row is kept; see the transformer for the coercion rule.
pub const UNPARSEABLE_DATE: &str = "unparseable";

/// A raw row as produced by an extractor, before normalization.
///
/// Every field is optional: empty CSV cells and absent JSON fields
/// both land here as `None` and are resolved by the transformer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub order_id: Option<i64>,
    pub product: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub sale_date: Option<String>,
}

/// An ordered batch of raw rows plus the shape of the source schema.
///
/// The flags tell the transformer which concepts the source natively
/// carries: a delimited sales file has both a quantity column and a
/// sale date, while the product API has neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    pub rows: Vec<RawRecord>,
    pub has_quantity: bool,
    pub has_sale_date: bool,
}

impl RawBatch {
    /// An empty batch with the given source shape, used when
    /// extraction fails and the run degrades to a no-op.
    pub fn empty(has_quantity: bool, has_sale_date: bool) -> Self {
        Self {
            rows: Vec::new(),
            has_quantity,
            has_sale_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// A normalized sales record, field set and order fixed.
///
/// Immutable once the loader has committed it: the pipeline never
/// updates or deletes stored rows.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_id: i64,
    pub product: String,
    pub quantity: i64,
    pub price: f64,
    pub total_revenue: f64,
    pub sale_date: String,
}

/// One row of the revenue-per-product aggregate consumed by the
/// dashboards.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: f64,
}
