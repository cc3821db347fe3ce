//! SQLite schema definition

/// SQL schema for the sales database
pub const SCHEMA_SQL: &str = r#"
-- Sales: normalized records, one row per order, append-only
CREATE TABLE IF NOT EXISTS sales (
    order_id INTEGER PRIMARY KEY,
    product TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    price REAL NOT NULL,
    total_revenue REAL NOT NULL,
    sale_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sales_product ON sales(product);
"#;
