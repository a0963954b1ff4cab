//! Error types for marginalia-core

use thiserror::Error;

/// Result type alias using marginalia-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in marginalia-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Manifest is missing, malformed or incompatible
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Input snapshot is corrupted or malformed
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// Merge engine error
    #[error(transparent)]
    Merge(#[from] crate::merge::MergeError),
}
