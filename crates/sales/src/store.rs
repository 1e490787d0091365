//! Order store port.
//!
//! The trait is defined here, next to the domain that needs it; the adapters
//! (in-memory, Postgres) live in `orderflow-store`. The store owns identifier
//! assignment and the creation timestamp. Line items are persisted verbatim as
//! a child collection keyed by sale id, so historical line-item detail
//! survives reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use orderflow_core::{CustomerId, SaleId};

use crate::sale::{SaleStatus, ValidatedLineItem};

/// A sale validated and ready to persist. No id, no timestamp yet: the store
/// assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub customer_id: CustomerId,
    pub line_items: Vec<ValidatedLineItem>,
    pub grand_total: Decimal,
}

/// A sale as stored: header plus its line items. Read-time customer
/// enrichment is layered on top by the service; it is not a storage concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSale {
    pub id: SaleId,
    pub customer_id: CustomerId,
    pub line_items: Vec<ValidatedLineItem>,
    pub grand_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub status: SaleStatus,
}

/// Datastore failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The datastore could not be reached (pool exhausted, connection lost).
    #[error("datastore unavailable: {0}")]
    Unavailable(String),

    /// The datastore answered but the operation failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// Durable storage for sales.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a validated sale atomically (header and line items together);
    /// assigns the id and creation timestamp.
    async fn insert(&self, sale: NewSale) -> Result<PersistedSale, StoreError>;

    /// Fetch one sale by id.
    async fn get(&self, id: SaleId) -> Result<Option<PersistedSale>, StoreError>;

    /// All sales, most recent first.
    async fn list_all(&self) -> Result<Vec<PersistedSale>, StoreError>;

    /// Total number of recorded sales.
    async fn count(&self) -> Result<u64, StoreError>;
}
