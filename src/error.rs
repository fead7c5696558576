// Rickllow Listings - Error Taxonomy
// Three failure classes, mapped to HTTP status codes by the server binary

use thiserror::Error;

/// Errors surfaced by the catalog core.
///
/// `Validation` and `NotFound` are client errors; `Store` is a server
/// error. The core never formats a response body — the transport layer
/// owns status-code mapping.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a parameter the catalog cannot interpret
    /// (e.g. an unknown category token).
    #[error("{0}")]
    Validation(String),

    /// No location matches the requested name.
    #[error("{0}")]
    NotFound(String),

    /// Query execution or connectivity failure in the store.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
