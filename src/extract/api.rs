//! HTTP API extractor

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::record::{RawBatch, RawRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Product object as served by the API. Extra fields are ignored;
/// only id, title and price map into the raw row.
#[derive(Debug, Deserialize)]
struct ApiProduct {
    id: i64,
    title: String,
    price: f64,
}

/// Issues a single GET to a fixed endpoint and parses the body as a
/// JSON array of products. The source has no quantity or date
/// concept; the transformer fills both in.
pub struct ApiExtractor {
    client: Client,
    url: String,
}

impl ApiExtractor {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| Error::Extract(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    async fn try_extract(&self) -> Result<Vec<RawRecord>> {
        debug!("Fetching: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        let products: Vec<ApiProduct> = response.json().await?;

        Ok(products
            .into_iter()
            .map(|p| RawRecord {
                order_id: Some(p.id),
                product: Some(p.title),
                quantity: None,
                price: Some(p.price),
                sale_date: None,
            })
            .collect())
    }
}

#[async_trait]
impl Extractor for ApiExtractor {
    fn source(&self) -> String {
        self.url.clone()
    }

    async fn extract(&self) -> RawBatch {
        match self.try_extract().await {
            Ok(rows) => {
                info!("Extracted {} records from {}", rows.len(), self.source());
                RawBatch {
                    rows,
                    has_quantity: false,
                    has_sale_date: false,
                }
            }
            Err(e) => {
                error!("Failed to extract data from {}: {}", self.source(), e);
                RawBatch::empty(false, false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor(server: &MockServer) -> ApiExtractor {
        ApiExtractor::new(format!("{}/products", server.uri()), 5).unwrap()
    }

    #[tokio::test]
    async fn test_extract_maps_product_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "Backpack", "price": 109.95, "category": "gear"},
                {"id": 2, "title": "Shirt", "price": 22.3}
            ])))
            .mount(&server)
            .await;

        let batch = extractor(&server).extract().await;
        assert_eq!(batch.len(), 2);
        assert!(!batch.has_quantity);
        assert!(!batch.has_sale_date);
        assert_eq!(batch.rows[0].order_id, Some(1));
        assert_eq!(batch.rows[0].product.as_deref(), Some("Backpack"));
        assert_eq!(batch.rows[0].quantity, None);
        assert_eq!(batch.rows[1].price, Some(22.3));
    }

    #[tokio::test]
    async fn test_non_2xx_degrades_to_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let batch = extractor(&server).extract().await;
        assert!(batch.is_empty());
        assert!(!batch.has_quantity);
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let batch = extractor(&server).extract().await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty_batch() {
        // Port 9 (discard) is near-certain to refuse the connection
        let extractor = ApiExtractor::new("http://127.0.0.1:9/products".to_string(), 1).unwrap();
        let batch = extractor.extract().await;
        assert!(batch.is_empty());
    }
}
