//! Product catalog read contract.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use orderflow_core::ProductId;

use crate::error::LookupError;
use crate::http;

/// Product record as served by the catalog.
///
/// `price` is the current unit price; callers that need price stability must
/// snapshot it (the catalog may change it at any time).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

/// Read contract against the product catalog.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch one product by id. Single attempt, bounded timeout.
    async fn product(&self, id: ProductId) -> Result<Product, LookupError>;
}

/// `reqwest`-backed client for the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: http::normalize_base_url(base_url),
        })
    }
}

#[async_trait]
impl ProductLookup for CatalogClient {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        let url = format!("{}/products/{}", self.base_url, id);
        http::fetch_one(&self.http, &url).await
    }
}
