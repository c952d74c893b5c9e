//! Merkle inclusion proofs.
//!
//! A proof path is the concatenation, from the root down, of one 96-byte
//! segment per branch (`left id || right id || note(split)`) followed by a
//! 64-byte leaf segment (`data hash || note(max)`).

use serde::{Deserialize, Serialize};

use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};
use crate::merkle::{decode_note, encode_note, hash_branch_parts, MerkleNode, HASH_SIZE, NOTE_SIZE};

const LEAF_SEGMENT: usize = HASH_SIZE + NOTE_SIZE;
const BRANCH_SEGMENT: usize = HASH_SIZE * 2 + NOTE_SIZE;

/// Inclusion path for one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Last byte covered by the chunk (`max_byte_range - 1`).
    pub offset: u64,
    pub path: Vec<u8>,
}

/// Result of a successful [`validate_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPath {
    pub offset: u64,
    pub left_bound: u64,
    pub right_bound: u64,
    pub chunk_size: u64,
}

/// Emit one proof per leaf, in leaf order.
pub fn generate_proofs(root: &MerkleNode) -> Vec<Proof> {
    let mut proofs = Vec::new();
    let mut path = Vec::new();
    collect_proofs(root, &mut path, &mut proofs);
    proofs
}

fn collect_proofs(node: &MerkleNode, path: &mut Vec<u8>, proofs: &mut Vec<Proof>) {
    let prefix_len = path.len();

    match node {
        MerkleNode::Leaf {
            data_hash,
            max_byte_range,
            ..
        } => {
            path.extend_from_slice(data_hash.as_bytes());
            path.extend_from_slice(&encode_note(*max_byte_range));
            proofs.push(Proof {
                offset: max_byte_range.saturating_sub(1),
                path: path.clone(),
            });
        }
        MerkleNode::Branch {
            byte_range,
            left,
            right,
            ..
        } => {
            path.extend_from_slice(left.id().as_bytes());
            path.extend_from_slice(right.id().as_bytes());
            path.extend_from_slice(&encode_note(*byte_range));
            collect_proofs(left, path, proofs);
            collect_proofs(right, path, proofs);
        }
    }

    path.truncate(prefix_len);
}

/// Check that `path` leads from `root` to the chunk containing byte `dest`.
///
/// `left_bound` and `right_bound` are the range the root covers, normally
/// `0` and the payload length. A `dest` at or beyond `right_bound` is
/// clamped to the last byte. On success returns the bounds of the chunk the
/// path ends at.
pub fn validate_path(
    root: &Sha256Hash,
    dest: u64,
    left_bound: u64,
    right_bound: u64,
    path: &[u8],
) -> Result<ValidatedPath> {
    if right_bound == 0 {
        return Err(CoreError::InvalidProof("right bound must be positive".into()));
    }

    let dest = dest.min(right_bound - 1);
    let mut left_bound = left_bound;
    let mut right_bound = right_bound;
    let mut expected = *root;
    let mut rest = path;

    loop {
        if rest.len() == LEAF_SEGMENT {
            let (data_hash, note) = rest.split_at(HASH_SIZE);
            let id = Sha256Hash::hash_parts(&[
                Sha256Hash::hash(data_hash).as_bytes(),
                Sha256Hash::hash(note).as_bytes(),
            ]);
            if id != expected {
                return Err(CoreError::InvalidProof("leaf hash mismatch".into()));
            }
            let chunk_size = right_bound
                .checked_sub(left_bound)
                .ok_or_else(|| CoreError::InvalidProof("inverted chunk bounds".into()))?;
            return Ok(ValidatedPath {
                offset: right_bound - 1,
                left_bound,
                right_bound,
                chunk_size,
            });
        }

        if rest.len() < BRANCH_SEGMENT {
            return Err(CoreError::InvalidProof(format!(
                "truncated path segment of {} bytes",
                rest.len()
            )));
        }

        let (left, tail) = rest.split_at(HASH_SIZE);
        let (right, tail) = tail.split_at(HASH_SIZE);
        let (note, tail) = tail.split_at(NOTE_SIZE);
        let offset = decode_note(note)?;

        if hash_branch_parts(left, right, note) != expected {
            return Err(CoreError::InvalidProof("branch hash mismatch".into()));
        }

        let next = if dest < offset {
            right_bound = right_bound.min(offset);
            left
        } else {
            left_bound = left_bound.max(offset);
            right
        };
        let mut id = [0u8; HASH_SIZE];
        id.copy_from_slice(next);
        expected = Sha256Hash::from_bytes(id);
        rest = tail;
    }
}
