//! Customer directory read contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use orderflow_core::CustomerId;

use crate::error::LookupError;
use crate::http;

/// Customer record as served by the directory.
///
/// The directory also carries contact details and a registration date; this
/// core only consumes the display fields, so everything else is ignored on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

/// Read contract against the customer directory.
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    /// Fetch one customer by id. Single attempt, bounded timeout.
    async fn customer(&self, id: CustomerId) -> Result<Customer, LookupError>;
}

/// `reqwest`-backed client for the customer directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
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
impl CustomerLookup for DirectoryClient {
    async fn customer(&self, id: CustomerId) -> Result<Customer, LookupError> {
        let url = format!("{}/customers/{}", self.base_url, id);
        http::fetch_one(&self.http, &url).await
    }
}
