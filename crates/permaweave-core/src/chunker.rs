//! Deterministic payload chunking.
//!
//! A payload is cut into `MAX_CHUNK_SIZE` pieces, except that the cut before
//! a would-be runt (a remainder smaller than `MIN_CHUNK_SIZE`) splits the
//! remaining bytes into two near-equal halves instead. Every chunk but the
//! last is therefore within `[MIN_CHUNK_SIZE, MAX_CHUNK_SIZE]`.
//!
//! The chunker always emits a final chunk for whatever is left, even when
//! nothing is left. That zero-length chunk takes part in tree building and is
//! dropped afterwards, see [`crate::chunk_data::ChunkData`].

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::crypto::Sha256Hash;
use crate::error::Result;

/// Upper bound on a chunk's length.
pub const MAX_CHUNK_SIZE: usize = 256 * 1024;

/// Lower bound on the length of every chunk except the last.
pub const MIN_CHUNK_SIZE: usize = 32 * 1024;

/// A half-open byte range `[min_byte_range, max_byte_range)` of a payload and
/// the SHA-256 hash of the bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub data_hash: Sha256Hash,
    pub min_byte_range: u64,
    pub max_byte_range: u64,
}

impl Chunk {
    fn from_slice(bytes: &[u8], min_byte_range: u64) -> Self {
        Self {
            data_hash: Sha256Hash::hash(bytes),
            min_byte_range,
            max_byte_range: min_byte_range + bytes.len() as u64,
        }
    }

    /// Number of payload bytes covered.
    pub fn len(&self) -> u64 {
        self.max_byte_range - self.min_byte_range
    }

    /// True for the trailing zero-length chunk.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` falls inside this chunk's range.
    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.min_byte_range && offset < self.max_byte_range
    }
}

/// Length of the next chunk to cut from `remaining` unchunked bytes.
///
/// Returns `None` once the remainder is short enough to be the final chunk.
fn next_chunk_size(remaining: u64) -> Option<u64> {
    let max = MAX_CHUNK_SIZE as u64;
    if remaining < max {
        return None;
    }
    let after = remaining - max;
    if after > 0 && after < MIN_CHUNK_SIZE as u64 {
        Some(remaining.div_ceil(2))
    } else {
        Some(max)
    }
}

/// Split an in-memory payload into chunks.
pub fn chunk_data(data: &[u8]) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(data.len() / MAX_CHUNK_SIZE + 1);
    let mut cursor = 0usize;

    while let Some(size) = next_chunk_size((data.len() - cursor) as u64) {
        let end = cursor + size as usize;
        chunks.push(Chunk::from_slice(&data[cursor..end], cursor as u64));
        cursor = end;
    }
    chunks.push(Chunk::from_slice(&data[cursor..], cursor as u64));

    chunks
}

/// Split `size` bytes read from `reader` into chunks.
///
/// Produces exactly what [`chunk_data`] produces for the same bytes while
/// holding at most one chunk in memory. A reader that ends before `size`
/// bytes is an I/O error.
pub fn chunk_reader<R: Read>(mut reader: R, size: u64) -> Result<Vec<Chunk>> {
    let mut buf = vec![0u8; MAX_CHUNK_SIZE];
    let mut chunks = Vec::new();
    let mut cursor = 0u64;

    loop {
        let remaining = size - cursor;
        let next = next_chunk_size(remaining);
        let take = next.unwrap_or(remaining) as usize;

        reader.read_exact(&mut buf[..take])?;
        chunks.push(Chunk::from_slice(&buf[..take], cursor));
        cursor += take as u64;

        if next.is_none() {
            break;
        }
    }

    Ok(chunks)
}
