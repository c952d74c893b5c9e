//! # Permaweave
//!
//! Client library for a content-anchored ledger: signed data items, the
//! bundles that carry them, and chunked transactions.
//!
//! ## Overview
//!
//! - **Data items**: signed records whose id is the hash of the signature
//! - **Bundles**: many data items packed behind a header table
//! - **Transactions**: format 2 records that commit to a payload by the
//!   Merkle root of its chunks
//! - **Chunks**: 256 KiB pieces of a payload, each uploadable with its proof
//!
//! ## Usage
//!
//! ```rust
//! use permaweave::{Tag, Wallet, WalletConfig};
//! use permaweave::items::Ed25519Signer;
//!
//! let wallet = Wallet::new(Ed25519Signer::generate(), WalletConfig::default());
//!
//! let item = wallet
//!     .create_item(&b"hello"[..], None, None, vec![Tag::new("Content-Type", "text/plain")])
//!     .unwrap();
//! let bundle = wallet.create_bundle(vec![item]).unwrap();
//!
//! let ingested = wallet.ingest_bundle(bundle.into_raw()).unwrap();
//! assert_eq!(ingested.len(), 1);
//! ```
//!
//! ## Re-exports
//!
//! - `permaweave::core` - chunking, Merkle trees, proofs, DeepHash
//! - `permaweave::items` - signers, data items, bundles

pub mod error;
pub mod transaction;
pub mod wallet;

#[cfg(test)]
mod test_support;

// Re-export component crates
pub use permaweave_core as core;
pub use permaweave_items as items;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use transaction::{ChunkUpload, Transaction, TRANSACTION_FORMAT};
pub use wallet::{Wallet, WalletConfig, BUNDLE_FORMAT_TAG, BUNDLE_VERSION_TAG};

// Re-export commonly used component types
pub use permaweave_core::{
    base64url_decode, base64url_encode, chunk_data, deep_hash, generate_proofs, validate_path,
    Chunk, ChunkData, DeepHashItem, ItemId, Proof, Sha256Hash, Sha384Digest, MAX_CHUNK_SIZE,
    MIN_CHUNK_SIZE,
};
pub use permaweave_items::{
    Bundle, BundleHeader, DataItem, DataItemBuilder, Ed25519Signer, RsaPssSigner, SignatureType,
    Signer, Tag,
};
