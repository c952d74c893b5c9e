//! Error types for the Permaweave facade.

use permaweave_core::CoreError;
use permaweave_items::{BundleError, ItemError, ValidationError};
use thiserror::Error;

/// Errors that can occur during wallet and transaction operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Chunking, proof, or hashing error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Data item error.
    #[error("data item error: {0}")]
    Item(#[from] ItemError),

    /// Bundle error.
    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Tag or anchor policy violation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A chunk was requested before `prepare_chunks` ran.
    #[error("chunks have not been prepared")]
    ChunksNotPrepared,

    /// Chunk index past the last chunk.
    #[error("chunk index {index} out of range, transaction has {len} chunks")]
    ChunkIndexOutOfRange { index: usize, len: usize },

    /// Only format 2 transactions can be signed or verified.
    #[error("unsupported transaction format: {0}")]
    UnsupportedFormat(u8),

    /// A caller tag reused a name the wallet sets itself.
    #[error("tag name is reserved: {0}")]
    ReservedTag(String),

    /// A string field could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
