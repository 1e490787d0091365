//! Sale error taxonomy.

use thiserror::Error;

use orderflow_core::ProductId;

use crate::store::StoreError;

/// Which collaborator failed to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Directory,
    Catalog,
}

impl core::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Collaborator::Directory => f.write_str("customer directory"),
            Collaborator::Catalog => f.write_str("product catalog"),
        }
    }
}

/// Failure of a `create_sale` / read operation.
///
/// Validation variants are detected locally and never retried. `Store` means
/// the insert failed; a sale is never considered created unless the insert
/// succeeded. `CollaboratorUnavailable` is kept distinct from the not-found
/// variants so callers can tell "the record does not exist" apart from "we
/// could not ask"; the HTTP boundary may still collapse the two.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaleError {
    /// The request carried no line items.
    #[error("at least one line item is required")]
    EmptyRequest,

    /// The customer directory has no such customer.
    #[error("customer not found")]
    CustomerNotFound,

    /// The product catalog has no such product. Fails the whole request.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Requested quantity was zero or negative.
    #[error("quantity must be positive (product {product_id}, got {quantity})")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i64,
    },

    /// A collaborator could not be reached; validation cannot proceed.
    #[error("{0} unavailable")]
    CollaboratorUnavailable(Collaborator),

    /// The datastore rejected or could not perform the operation.
    #[error("order store failure: {0}")]
    Store(#[from] StoreError),
}
