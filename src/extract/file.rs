//! Delimited-file extractor

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::record::{RawBatch, RawRecord};
use async_trait::async_trait;
use csv::ReaderBuilder;
use std::path::PathBuf;
use tracing::{error, info};

const REQUIRED_HEADERS: [&str; 5] = ["order_id", "product", "quantity", "price", "sale_date"];

/// Reads sales rows from a delimited file with a header row.
///
/// All-or-nothing per call: any I/O or parse failure fails the whole
/// extraction, there is no partial-file recovery.
pub struct FileExtractor {
    path: PathBuf,
}

impl FileExtractor {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn try_extract(&self) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let mut columns = [0usize; 5];
        for (i, name) in REQUIRED_HEADERS.iter().enumerate() {
            columns[i] = headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| Error::Extract(format!("Missing column: {}", name)))?;
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(RawRecord {
                order_id: parse_cell(record.get(columns[0]), "order_id")?,
                product: record
                    .get(columns[1])
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string()),
                quantity: parse_cell(record.get(columns[2]), "quantity")?,
                price: parse_cell(record.get(columns[3]), "price")?,
                sale_date: record
                    .get(columns[4])
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string()),
            });
        }
        Ok(rows)
    }
}

/// Parse a numeric cell: empty means missing, unparseable text fails
/// the whole extraction.
fn parse_cell<T: std::str::FromStr>(cell: Option<&str>, column: &str) -> Result<Option<T>> {
    match cell {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::Extract(format!("Invalid {} value: {:?}", column, s))),
    }
}

#[async_trait]
impl Extractor for FileExtractor {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    async fn extract(&self) -> RawBatch {
        match self.try_extract() {
            Ok(rows) => {
                info!("Extracted {} records from {}", rows.len(), self.source());
                RawBatch {
                    rows,
                    has_quantity: true,
                    has_sale_date: true,
                }
            }
            Err(e) => {
                error!("Failed to extract data from {}: {}", self.source(), e);
                RawBatch::empty(true, true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sales_data.csv");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[tokio::test]
    async fn test_extract_rows() {
        let (_tmp, path) = write_csv(
            "order_id,product,quantity,price,sale_date\n\
             1,Widget,2,5.0,2024-01-01\n\
             2,Gadget,1,3.5,2024-01-02 10:30:00\n",
        );

        let batch = FileExtractor::new(path).extract().await;
        assert_eq!(batch.len(), 2);
        assert!(batch.has_quantity);
        assert!(batch.has_sale_date);
        assert_eq!(batch.rows[0].order_id, Some(1));
        assert_eq!(batch.rows[0].product.as_deref(), Some("Widget"));
        assert_eq!(batch.rows[1].price, Some(3.5));
    }

    #[tokio::test]
    async fn test_empty_cells_become_none() {
        let (_tmp, path) = write_csv(
            "order_id,product,quantity,price,sale_date\n\
             1,Widget,2,,2024-01-01\n",
        );

        let batch = FileExtractor::new(path).extract().await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.rows[0].price, None);
        assert_eq!(batch.rows[0].quantity, Some(2));
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty_batch() {
        let tmp = TempDir::new().unwrap();
        let batch = FileExtractor::new(tmp.path().join("nope.csv"))
            .extract()
            .await;
        assert!(batch.is_empty());
        assert!(batch.has_quantity);
    }

    #[tokio::test]
    async fn test_unparseable_cell_fails_whole_call() {
        let (_tmp, path) = write_csv(
            "order_id,product,quantity,price,sale_date\n\
             1,Widget,2,5.0,2024-01-01\n\
             oops,Gadget,1,3.5,2024-01-02\n",
        );

        let batch = FileExtractor::new(path).extract().await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_missing_header_degrades_to_empty_batch() {
        let (_tmp, path) = write_csv("order_id,product,price\n1,Widget,5.0\n");
        let batch = FileExtractor::new(path).extract().await;
        assert!(batch.is_empty());
    }
}
