//! Idempotent loader
//!
//! Appends transformed records to the store, skipping any whose
//! order id already exists. The existing-id set is read fresh from
//! the store on every call, so re-running the identical load any
//! number of times converges to the same store content.

use crate::error::Result;
use crate::record::SalesRecord;
use crate::store::SalesDb;
use tracing::{info, warn};

/// Outcome of one load call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadResult {
    pub inserted: usize,
}

/// Loads batches into the sales store
pub struct Loader {
    db: SalesDb,
}

impl Loader {
    pub fn new(db: SalesDb) -> Self {
        Self { db }
    }

    /// Merge a batch into the store.
    ///
    /// Rows whose order id is already present are silently skipped;
    /// the remainder is appended in one transaction. A store read or
    /// write failure propagates as `Err`, fatal for this run, but
    /// the read-before-write order guarantees no row is written when
    /// the dedup lookup fails.
    pub async fn load(&self, batch: &[SalesRecord]) -> Result<LoadResult> {
        if batch.is_empty() {
            warn!("No data to load");
            return Ok(LoadResult::default());
        }

        let existing = self.db.existing_order_ids().await?;

        let new_records: Vec<SalesRecord> = batch
            .iter()
            .filter(|r| !existing.contains(&r.order_id))
            .cloned()
            .collect();

        if new_records.is_empty() {
            info!("No new records to insert");
            return Ok(LoadResult::default());
        }

        self.db.insert_records(&new_records).await?;
        info!("Loaded {} new records into the database", new_records.len());

        Ok(LoadResult {
            inserted: new_records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (Loader, SalesDb, TempDir) {
        let tmp = TempDir::new().unwrap();
        let db = SalesDb::new(&tmp.path().join("test.db")).await.unwrap();
        (Loader::new(db.clone()), db, tmp)
    }

    fn record(order_id: i64, product: &str) -> SalesRecord {
        SalesRecord {
            order_id,
            product: product.to_string(),
            quantity: 2,
            price: 5.0,
            total_revenue: 10.0,
            sale_date: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let (loader, db, _tmp) = setup().await;
        let result = loader.load(&[]).await.unwrap();
        assert_eq!(result.inserted, 0);
        assert_eq!(db.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let (loader, db, _tmp) = setup().await;
        let batch = vec![record(1, "Widget"), record(2, "Gadget")];

        let first = loader.load(&batch).await.unwrap();
        assert_eq!(first.inserted, 2);

        let second = loader.load(&batch).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(db.count_records().await.unwrap(), 2);
        assert_eq!(db.get_record(1).await.unwrap().unwrap(), batch[0]);
    }

    #[tokio::test]
    async fn test_dedup_inserts_only_unseen_ids() {
        let (loader, db, _tmp) = setup().await;

        loader
            .load(&[record(1, "A"), record(2, "B"), record(3, "C")])
            .await
            .unwrap();

        // Overlapping batch: only order 4 is new. Existing rows keep
        // their original content, not the incoming one.
        let result = loader
            .load(&[record(2, "changed"), record(3, "changed"), record(4, "D")])
            .await
            .unwrap();
        assert_eq!(result.inserted, 1);
        assert_eq!(db.count_records().await.unwrap(), 4);
        assert_eq!(db.get_record(2).await.unwrap().unwrap().product, "B");
        assert_eq!(db.get_record(3).await.unwrap().unwrap().product, "C");
        assert_eq!(db.get_record(4).await.unwrap().unwrap().product, "D");
    }

    #[tokio::test]
    async fn test_schema_stable_for_aggregate() {
        let (loader, db, _tmp) = setup().await;
        loader.load(&[record(101, "Widget")]).await.unwrap();

        let rows = db.revenue_by_product().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Widget");
        assert_eq!(rows[0].revenue, 10.0);
    }
}
