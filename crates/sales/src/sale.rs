use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_clients::{Customer, Product};
use orderflow_core::{CustomerId, ProductId, SaleId};

use crate::store::PersistedSale;

/// One product-quantity pairing in an incoming request. Ephemeral: it only
/// exists between the API boundary and validation, and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Line item after validation.
///
/// Product name and unit price are snapshotted at validation time so the sale
/// keeps its historical values even when the catalog later changes them.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ValidatedLineItem {
    /// Snapshot a catalog product into a line, deriving the line total.
    pub fn snapshot(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            line_total: product.price * Decimal::from(quantity),
        }
    }
}

/// Sale lifecycle. A sale is recorded already completed; no further
/// transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
}

/// Display-only customer view attached at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
        }
    }
}

/// The persisted aggregate as exposed to callers.
///
/// Everything except `customer` comes from the store and is immutable.
/// `customer` is fetched fresh from the directory on every read and degrades
/// to `None` when the directory is unreachable; the stored record is not
/// affected. Invariant: `grand_total` equals the sum of the line totals; it is
/// recomputed at validation time and never taken from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    pub id: SaleId,
    pub customer_id: CustomerId,
    pub line_items: Vec<ValidatedLineItem>,
    pub grand_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub status: SaleStatus,
    pub customer: Option<CustomerSummary>,
}

impl Sale {
    /// Attach a read-time customer view to a stored sale.
    pub fn from_persisted(persisted: PersistedSale, customer: Option<CustomerSummary>) -> Self {
        Self {
            id: persisted.id,
            customer_id: persisted.customer_id,
            line_items: persisted.line_items,
            grand_total: persisted.grand_total,
            created_at: persisted.created_at,
            status: persisted.status,
            customer,
        }
    }
}
