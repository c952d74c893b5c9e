//! Error types for Permaweave Core.

use thiserror::Error;

/// Errors that can occur while chunking, proving, or hashing payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A Merkle path failed to hash up to the expected root, or was malformed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// Input bytes were too short or structurally malformed.
    #[error("malformed input: {0}")]
    Format(String),

    /// Reading a streamed source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
