//! Durable sales store backed by SQLite
//!
//! This module owns all database access:
//! - Schema creation (idempotent, on connect)
//! - Dedup lookups and bulk appends used by the loader
//! - The revenue-per-product aggregate consumed by the dashboards

mod schema;

pub use schema::*;

use crate::error::Result;
use crate::record::{ProductRevenue, SalesRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Sales database handle
#[derive(Clone)]
pub struct SalesDb {
    pool: SqlitePool,
}

impl SalesDb {
    /// Open (creating if missing) the sales database at the given path
    /// and ensure the schema exists.
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Create the sales table if it doesn't exist
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        info!("Checked/created sales table in database");
        Ok(())
    }

    /// Read the full set of order ids currently in the store.
    ///
    /// The loader recomputes its dedup difference against this set on
    /// every call; there is no cached "already processed" marker
    /// outside the store itself.
    pub async fn existing_order_ids(&self) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT order_id FROM sales")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Append records in a single transaction. All-or-nothing: a
    /// failed insert rolls back the whole batch, leaving existing
    /// rows untouched.
    pub async fn insert_records(&self, records: &[SalesRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO sales (order_id, product, quantity, price, total_revenue, sale_date)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.order_id)
            .bind(&record.product)
            .bind(record.quantity)
            .bind(record.price)
            .bind(record.total_revenue)
            .bind(&record.sale_date)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Get a record by order id
    pub async fn get_record(&self, order_id: i64) -> Result<Option<SalesRecord>> {
        let record =
            sqlx::query_as::<_, SalesRecord>("SELECT * FROM sales WHERE order_id = ?")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    /// Count all stored records
    pub async fn count_records(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    /// Total revenue per product, the aggregate the dashboards read.
    /// The sales schema must keep this query valid after every load.
    pub async fn revenue_by_product(&self) -> Result<Vec<ProductRevenue>> {
        let rows = sqlx::query_as::<_, ProductRevenue>(
            "SELECT product, SUM(total_revenue) AS revenue FROM sales GROUP BY product",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
