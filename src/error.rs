//! Error types for DepotKV
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DepotError
pub type Result<T> = std::result::Result<T, DepotError>;

/// Unified error type for DepotKV operations
#[derive(Debug, Error)]
pub enum DepotError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key '{0}' does not exist in Depot")]
    KeyNotFound(String),

    #[error("Chunk {0} does not exist")]
    ChunkDoesNotExist(String),

    #[error("File {} does not exist", .0.display())]
    FileDoesNotExist(PathBuf),

    #[error("Directory {} does not exist", .0.display())]
    DirectoryDoesNotExist(PathBuf),

    // -------------------------------------------------------------------------
    // Value Errors
    // -------------------------------------------------------------------------
    #[error("Key '{0}' already exists in Depot")]
    KeyConflict(String),

    #[error("Value for key '{key}' cannot be encoded: {reason}")]
    ValueMalformed { key: String, reason: String },

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("Illegal parameter: {0}")]
    IllegalParameter(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Depot has been destroyed and can no longer be accessed")]
    NullDepot,

    // -------------------------------------------------------------------------
    // Transcoding Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Authentication failed: wrong key or tampered data")]
    AuthenticationFailed,
}

impl DepotError {
    /// Lookup errors are the expected-path failures callers are meant to handle
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DepotError::KeyNotFound(_)
                | DepotError::ChunkDoesNotExist(_)
                | DepotError::FileDoesNotExist(_)
                | DepotError::DirectoryDoesNotExist(_)
        )
    }
}
