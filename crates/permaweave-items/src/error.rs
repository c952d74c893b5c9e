//! Error types for data items and bundles.

use permaweave_core::CoreError;
use thiserror::Error;

/// Errors that can occur while signing, encoding, decoding, or verifying a
/// data item.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("malformed data item: {0}")]
    Format(String),

    #[error("unsupported signature type: {0}")]
    UnsupportedSignatureType(u16),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("id does not match signature")]
    IdMismatch,

    #[error("signature length mismatch: expected {expected}, got {actual}")]
    SignatureLength { expected: usize, actual: usize },

    #[error("owner length mismatch: expected {expected}, got {actual}")]
    OwnerLength { expected: usize, actual: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("signer error: {0}")]
    Signer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Policy violations found by data item verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("too many tags: {count} exceeds maximum of 128")]
    TooManyTags { count: usize },

    #[error("tag {index} has an empty name")]
    EmptyTagName { index: usize },

    #[error("tag {index} name is {len} bytes, maximum is 1024")]
    TagNameTooLong { index: usize, len: usize },

    #[error("tag {index} has an empty value")]
    EmptyTagValue { index: usize },

    #[error("tag {index} value is {len} bytes, maximum is 3072")]
    TagValueTooLong { index: usize, len: usize },

    #[error("anchor must be 32 bytes, got {len}")]
    AnchorLength { len: usize },
}

/// Errors that can occur while encoding or decoding a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("malformed bundle: {0}")]
    Format(String),

    #[error("bundle declares {declared} items but only {available} headers fit")]
    ItemCountMismatch { declared: u64, available: u64 },

    #[error("{count} bytes left after the last item")]
    TrailingBytes { count: usize },

    #[error("header {index} id does not match its item")]
    HeaderIdMismatch { index: usize },

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: ItemError,
    },
}

/// Result type for data item operations.
pub type Result<T> = std::result::Result<T, ItemError>;
