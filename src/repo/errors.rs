//! Domain error taxonomy shared by the three repositories.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Domain outcomes of a repository operation.
///
/// `Storage` covers constraint violations the pre-checks should have caught
/// as well as I/O failures; both surface to the client as a generic internal
/// failure.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Requested entity key does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An entity with the same identity already exists.
    #[error("{0}")]
    Conflict(String),

    /// A required foreign key does not resolve to an existing country.
    #[error("country code '{0}' does not exist")]
    UnprocessableReference(String),

    /// Storage-layer failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RepoError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }
}
