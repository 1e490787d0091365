//! Lookup error model.

use thiserror::Error;

/// Outcome of a failed collaborator read.
///
/// `NotFound` means the collaborator answered and the record does not exist.
/// `Unavailable` means we never got a usable answer (timeout, connection
/// failure, server error, undecodable body). Callers choose how to treat
/// unavailability; this crate never collapses the two.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The collaborator responded; the record does not exist.
    #[error("record not found")]
    NotFound,

    /// The collaborator could not be reached or did not answer usably.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}
