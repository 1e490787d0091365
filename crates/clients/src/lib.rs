//! Collaborator read contracts and their HTTP implementations.
//!
//! The customer directory and the product catalog are external services; this
//! core only ever reads from them, one record at a time, over
//! `GET /<resource>/{id}`. Both speak the same `{success, data}` response
//! envelope, so the transport plumbing lives in one place (`http`) and each
//! collaborator contributes its record type, its lookup trait, and a thin
//! `reqwest`-backed client.
//!
//! Lookups are single-attempt and bounded by a per-request timeout. There is
//! deliberately no retry and no caching here.

pub mod customer;
pub mod error;
mod http;
pub mod product;

pub use customer::{Customer, CustomerLookup, DirectoryClient};
pub use error::LookupError;
pub use product::{CatalogClient, Product, ProductLookup};
