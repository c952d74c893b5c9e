//! Binary Merkle tree over payload chunks.
//!
//! Leaves commit to a chunk's hash and the end of its byte range. Branches
//! commit to both children and the split offset between them. Nodes are
//! paired left to right one layer at a time; an unpaired last node moves up
//! to the next layer unchanged.
//!
//! ## Note encoding
//!
//! Offsets are hashed as 32-byte "notes": 24 zero bytes followed by the
//! offset as a big-endian `u64`.

use crate::chunker::{chunk_data, Chunk};
use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};

/// Width of an encoded offset.
pub const NOTE_SIZE: usize = 32;

/// Width of a node id or chunk hash.
pub const HASH_SIZE: usize = 32;

const NOTE_PAD: usize = NOTE_SIZE - 8;

/// Encode an offset as a 32-byte note.
pub fn encode_note(value: u64) -> [u8; NOTE_SIZE] {
    let mut note = [0u8; NOTE_SIZE];
    note[NOTE_PAD..].copy_from_slice(&value.to_be_bytes());
    note
}

/// Decode a 32-byte note.
///
/// Fails when the slice is not exactly one note wide or when the value does
/// not fit in 64 bits.
pub fn decode_note(bytes: &[u8]) -> Result<u64> {
    if bytes.len() != NOTE_SIZE {
        return Err(CoreError::InvalidProof(format!(
            "note must be {NOTE_SIZE} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[..NOTE_PAD].iter().any(|b| *b != 0) {
        return Err(CoreError::InvalidProof("note offset overflows u64".into()));
    }
    let mut value = [0u8; 8];
    value.copy_from_slice(&bytes[NOTE_PAD..]);
    Ok(u64::from_be_bytes(value))
}

/// A node of the chunk tree. Branches own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleNode {
    Leaf {
        id: Sha256Hash,
        data_hash: Sha256Hash,
        max_byte_range: u64,
    },
    Branch {
        id: Sha256Hash,
        /// Split offset: the left child's `max_byte_range`.
        byte_range: u64,
        max_byte_range: u64,
        left: Box<MerkleNode>,
        right: Box<MerkleNode>,
    },
}

impl MerkleNode {
    /// Leaf committing to `data_hash` and the end of its range.
    pub fn leaf(data_hash: Sha256Hash, max_byte_range: u64) -> Self {
        let id = leaf_id(&data_hash, max_byte_range);
        Self::Leaf {
            id,
            data_hash,
            max_byte_range,
        }
    }

    /// Branch over two adjacent subtrees.
    pub fn branch(left: MerkleNode, right: MerkleNode) -> Self {
        let byte_range = left.max_byte_range();
        let id = branch_id(left.id(), right.id(), byte_range);
        Self::Branch {
            id,
            byte_range,
            max_byte_range: right.max_byte_range(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn id(&self) -> &Sha256Hash {
        match self {
            Self::Leaf { id, .. } | Self::Branch { id, .. } => id,
        }
    }

    pub fn max_byte_range(&self) -> u64 {
        match self {
            Self::Leaf { max_byte_range, .. } | Self::Branch { max_byte_range, .. } => {
                *max_byte_range
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// `H(H(data_hash) || H(note(max)))`
pub(crate) fn leaf_id(data_hash: &Sha256Hash, max_byte_range: u64) -> Sha256Hash {
    Sha256Hash::hash_parts(&[
        Sha256Hash::hash(data_hash.as_bytes()).as_bytes(),
        Sha256Hash::hash(&encode_note(max_byte_range)).as_bytes(),
    ])
}

/// `H(H(left) || H(right) || H(note(split)))`
pub(crate) fn branch_id(left: &Sha256Hash, right: &Sha256Hash, split: u64) -> Sha256Hash {
    hash_branch_parts(left.as_bytes(), right.as_bytes(), &encode_note(split))
}

pub(crate) fn hash_branch_parts(left: &[u8], right: &[u8], note: &[u8]) -> Sha256Hash {
    Sha256Hash::hash_parts(&[
        Sha256Hash::hash(left).as_bytes(),
        Sha256Hash::hash(right).as_bytes(),
        Sha256Hash::hash(note).as_bytes(),
    ])
}

/// One leaf per chunk, in chunk order.
pub fn generate_leaves(chunks: &[Chunk]) -> Vec<MerkleNode> {
    chunks
        .iter()
        .map(|chunk| MerkleNode::leaf(chunk.data_hash, chunk.max_byte_range))
        .collect()
}

/// Pair nodes layer by layer until a single root remains.
pub fn build_layers(mut layer: Vec<MerkleNode>) -> Result<MerkleNode> {
    if layer.is_empty() {
        return Err(CoreError::Format("cannot build a tree without leaves".into()));
    }

    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut nodes = layer.into_iter();
        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(MerkleNode::branch(left, right)),
                None => next.push(left),
            }
        }
        layer = next;
    }

    layer
        .pop()
        .ok_or_else(|| CoreError::Format("tree reduction produced no root".into()))
}

/// Build the tree over a chunk list.
pub fn generate_tree(chunks: &[Chunk]) -> Result<MerkleNode> {
    build_layers(generate_leaves(chunks))
}

/// Root id of the tree over an in-memory payload.
pub fn compute_root(data: &[u8]) -> Result<Sha256Hash> {
    Ok(*generate_tree(&chunk_data(data))?.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn root_b64(len: usize) -> String {
        compute_root(&pattern(len)).unwrap().to_base64url()
    }

    #[test]
    fn test_note_layout() {
        let note = encode_note(0x0102);
        assert!(note[..30].iter().all(|b| *b == 0));
        assert_eq!(&note[30..], &[0x01, 0x02]);
        assert_eq!(decode_note(&note).unwrap(), 0x0102);
    }

    #[test]
    fn test_note_rejects_overflow_and_wrong_width() {
        let mut note = encode_note(7);
        note[0] = 1;
        assert!(matches!(decode_note(&note), Err(CoreError::InvalidProof(_))));
        assert!(matches!(decode_note(&[0u8; 8]), Err(CoreError::InvalidProof(_))));
    }

    #[test]
    fn test_single_leaf_is_root() {
        let chunks = chunk_data(b"x");
        let root = generate_tree(&chunks).unwrap();
        assert!(root.is_leaf());
        assert_eq!(*root.id(), leaf_id(&chunks[0].data_hash, 1));
    }

    #[test]
    fn test_branch_records_split() {
        let a = MerkleNode::leaf(Sha256Hash::hash(b"a"), 10);
        let b = MerkleNode::leaf(Sha256Hash::hash(b"b"), 25);
        let branch = MerkleNode::branch(a.clone(), b.clone());
        match &branch {
            MerkleNode::Branch {
                byte_range,
                max_byte_range,
                ..
            } => {
                assert_eq!(*byte_range, 10);
                assert_eq!(*max_byte_range, 25);
            }
            MerkleNode::Leaf { .. } => panic!("expected branch"),
        }
        assert_eq!(*branch.id(), branch_id(a.id(), b.id(), 10));
    }

    #[test]
    fn test_odd_node_is_carried_up() {
        let leaves: Vec<_> = (1..=3)
            .map(|i| MerkleNode::leaf(Sha256Hash::hash(&[i]), i as u64 * 10))
            .collect();
        let third = leaves[2].clone();
        let pair = MerkleNode::branch(leaves[0].clone(), leaves[1].clone());

        let root = build_layers(leaves).unwrap();
        let expected = MerkleNode::branch(pair, third);
        assert_eq!(root, expected);
    }

    #[test]
    fn test_empty_leaf_set_is_error() {
        assert!(build_layers(Vec::new()).is_err());
    }

    #[test]
    fn test_known_roots() {
        assert_eq!(root_b64(0), "x9bUbvLyiRlsOOqClNkKV0LAohFd-PfXfb_XoYosfQI");
        assert_eq!(root_b64(1), "Ht_yZhXGBDUZfLv4OD6we7FkrjcpDpGPwQZEZgEJVfk");
        assert_eq!(root_b64(1000), "OBN0lHZnrFrskv9s1HKU7VRRDXrzQ3sOgMniX5cGavM");
        assert_eq!(root_b64(262_144), "gty7KB2baLFp7OGxuV2wBeX3NippS1tNVlMOZryIq5o");
        assert_eq!(root_b64(263_144), "bFtxR6l6BRJt4Y7utAH1mGDg4Ps969jw17_NfjGzB_Q");
        assert_eq!(root_b64(300_000), "48NCFfChsqNv4kmqH4QDmwtV9ejBNlPutiSwwAuFCwg");
    }
}
