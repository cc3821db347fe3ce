//! Batch normalization into the canonical schema
//!
//! Pure function of the input batch plus a caller-supplied timestamp
//! (used only when the source carries no date field). Malformed rows
//! are handled per-row and never abort the batch:
//! - a null required field drops the row
//! - an unparseable date coerces the field to a sentinel, keeping the
//!   row (matches source behavior; flagged for review in DESIGN.md)

use crate::record::{RawBatch, RawRecord, SalesRecord, CANONICAL_DATE_FORMAT, UNPARSEABLE_DATE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

/// Date formats accepted from file sources, tried in order
const INPUT_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

const INPUT_DAY_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Normalize a raw batch into canonical sales records.
///
/// Output preserves input order and contains exactly the canonical
/// field set. An empty input passes through as an empty output.
pub fn transform(batch: &RawBatch, now: DateTime<Utc>) -> Vec<SalesRecord> {
    if batch.is_empty() {
        warn!("No data to transform");
        return Vec::new();
    }

    let input_len = batch.len();
    let stamped = now.format(CANONICAL_DATE_FORMAT).to_string();

    let records: Vec<SalesRecord> = batch
        .rows
        .iter()
        .filter_map(|row| transform_row(row, batch, &stamped))
        .collect();

    let dropped = input_len - records.len();
    info!(
        "Transformed {} records ({} dropped as malformed)",
        records.len(),
        dropped
    );
    records
}

fn transform_row(row: &RawRecord, batch: &RawBatch, stamped: &str) -> Option<SalesRecord> {
    let order_id = row.order_id?;
    let product = row.product.clone()?;
    let price = row.price?;

    // Quantity is required only when the source natively carries it;
    // sources without the concept default every row to 1.
    let quantity = if batch.has_quantity {
        row.quantity?
    } else {
        1
    };

    if price < 0.0 || quantity < 0 {
        debug!("Dropping row {}: negative quantity or price", order_id);
        return None;
    }

    let sale_date = if batch.has_sale_date {
        let raw = row.sale_date.as_deref()?;
        normalize_date(raw).unwrap_or_else(|| {
            debug!("Coercing unparseable date {:?} on row {}", raw, order_id);
            UNPARSEABLE_DATE.to_string()
        })
    } else {
        stamped.to_string()
    };

    // Revenue is always recomputed, never trusted from the source
    let total_revenue = quantity as f64 * price;

    Some(SalesRecord {
        order_id,
        product,
        quantity,
        price,
        total_revenue,
        sale_date,
    })
}

/// Parse a source date into the canonical format, trying a small set
/// of common shapes. Returns None when nothing matches.
fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    for format in INPUT_DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.format(CANONICAL_DATE_FORMAT).to_string());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc().format(CANONICAL_DATE_FORMAT).to_string());
    }

    for format in INPUT_DAY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(dt.format(CANONICAL_DATE_FORMAT).to_string());
        }
    }

    None
}
