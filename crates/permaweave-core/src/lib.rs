//! # Permaweave Core
//!
//! Integrity primitives for Permaweave: payload chunking, Merkle trees and
//! inclusion proofs, and deep hashing.
//!
//! This crate contains no networking and no signing. It is pure computation
//! over byte buffers, plus `std::io::Read` for payloads too large to hold in
//! memory.
//!
//! ## Key Types
//!
//! - [`Chunk`] - A hashed byte range of a payload
//! - [`ChunkData`] - Data root, retained chunks, and their proofs
//! - [`MerkleNode`] - Leaf or branch of the chunk tree
//! - [`DeepHashItem`] - Blob-or-list input to [`deep_hash`]
//! - [`ItemId`] - SHA-256 of a signature, the address of a signed record
//!
//! ## Chunking
//!
//! Payloads are cut into chunks of at most [`MAX_CHUNK_SIZE`] bytes. See
//! [`chunker`] for the rebalancing rule that keeps every non-final chunk at
//! least [`MIN_CHUNK_SIZE`] bytes.

pub mod chunk_data;
pub mod chunker;
pub mod crypto;
pub mod deep_hash;
pub mod error;
pub mod merkle;
pub mod proof;
pub mod types;

pub use chunk_data::ChunkData;
pub use chunker::{chunk_data, chunk_reader, Chunk, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
pub use crypto::{base64url_decode, base64url_encode, Sha256Hash, Sha384Digest};
pub use deep_hash::{deep_hash, deep_hash_blob_reader, deep_hash_with_stream, DeepHashItem};
pub use error::{CoreError, Result};
pub use merkle::{
    build_layers, compute_root, decode_note, encode_note, generate_leaves, generate_tree,
    MerkleNode, HASH_SIZE, NOTE_SIZE,
};
pub use proof::{generate_proofs, validate_path, Proof, ValidatedPath};
pub use types::ItemId;
