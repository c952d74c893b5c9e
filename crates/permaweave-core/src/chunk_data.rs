//! Chunked payload: data root, retained chunks, and their proofs.

use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::debug;

use crate::chunker::{chunk_data, chunk_reader, Chunk};
use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};
use crate::merkle::generate_tree;
use crate::proof::{generate_proofs, validate_path, Proof, ValidatedPath};

/// The chunks and inclusion proofs of one payload.
///
/// `chunks[i]` is proven by `proofs[i]`. A trailing zero-length chunk left by
/// the chunker is part of the tree but is not retained here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkData {
    pub data_root: Sha256Hash,
    pub chunks: Vec<Chunk>,
    pub proofs: Vec<Proof>,
}

impl ChunkData {
    /// Chunk an in-memory payload.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::from_chunks(chunk_data(data))
    }

    /// Chunk `size` bytes read from `reader`.
    pub fn from_reader<R: Read>(reader: R, size: u64) -> Result<Self> {
        Self::from_chunks(chunk_reader(reader, size)?)
    }

    /// Build the tree and proofs over a chunker output.
    pub fn from_chunks(mut chunks: Vec<Chunk>) -> Result<Self> {
        let root = generate_tree(&chunks)?;
        let mut proofs = generate_proofs(&root);

        if proofs.len() != chunks.len() {
            return Err(CoreError::Format(format!(
                "{} proofs for {} chunks",
                proofs.len(),
                chunks.len()
            )));
        }

        if chunks.last().is_some_and(Chunk::is_empty) {
            chunks.pop();
            proofs.pop();
            debug!("dropped trailing empty chunk");
        }

        let data_root = *root.id();
        debug!(
            chunks = chunks.len(),
            data_root = %data_root.to_base64url(),
            "prepared chunks"
        );

        Ok(Self {
            data_root,
            chunks,
            proofs,
        })
    }

    pub fn data_root(&self) -> &Sha256Hash {
        &self.data_root
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total payload length covered by the retained chunks.
    pub fn data_size(&self) -> u64 {
        self.chunks.last().map_or(0, |c| c.max_byte_range)
    }

    /// Chunk and proof at `index`.
    pub fn get(&self, index: usize) -> Option<(&Chunk, &Proof)> {
        Some((self.chunks.get(index)?, self.proofs.get(index)?))
    }

    /// Validate the stored proof of chunk `index` against the data root.
    pub fn validate_chunk(&self, index: usize) -> Result<ValidatedPath> {
        let (chunk, proof) = self
            .get(index)
            .ok_or_else(|| CoreError::InvalidProof(format!("no chunk at index {index}")))?;
        validate_path(
            &self.data_root,
            chunk.min_byte_range,
            0,
            self.data_size(),
            &proof.path,
        )
    }
}
