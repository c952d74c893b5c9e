//! Format 2 transactions.
//!
//! A transaction commits to its payload through the Merkle root of the
//! payload's chunks, so a node can accept the data later, one chunk and
//! proof at a time. The signature covers a DeepHash of the header fields
//! including that root.

use permaweave_core::crypto::base64url_serde;
use permaweave_core::{
    base64url_encode, deep_hash, ChunkData, CoreError, DeepHashItem, Sha256Hash, Sha384Digest,
};
use permaweave_items::{verify_rsa_pss, ItemError, SignatureType, Signer, Tag};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// The only transaction format this crate signs and verifies.
pub const TRANSACTION_FORMAT: u8 = 2;

/// A format 2 transaction in the node's JSON shape.
///
/// Binary fields are base64url strings on the wire; `quantity`, `reward`
/// and `data_size` are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub format: u8,
    #[serde(with = "base64url_serde")]
    pub id: Vec<u8>,
    #[serde(with = "base64url_serde")]
    pub last_tx: Vec<u8>,
    #[serde(with = "base64url_serde")]
    pub owner: Vec<u8>,
    pub tags: Vec<Tag>,
    #[serde(with = "base64url_serde")]
    pub target: Vec<u8>,
    pub quantity: String,
    #[serde(with = "base64url_serde")]
    pub data: Vec<u8>,
    pub reward: String,
    #[serde(with = "base64url_serde")]
    pub signature: Vec<u8>,
    pub data_size: String,
    #[serde(with = "base64url_serde")]
    pub data_root: Vec<u8>,

    #[serde(skip)]
    chunk_data: Option<ChunkData>,
}

/// One chunk in the shape the node's chunk upload endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkUpload {
    pub data_root: String,
    pub data_size: String,
    pub data_path: String,
    pub offset: String,
    pub chunk: String,
}

impl Transaction {
    /// Create an unsigned transaction. An empty `quantity` becomes `"0"`.
    pub fn new(
        data: impl Into<Vec<u8>>,
        target: Option<[u8; 32]>,
        quantity: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        let mut quantity = quantity.into();
        if quantity.is_empty() {
            quantity = "0".to_string();
        }

        Self {
            format: TRANSACTION_FORMAT,
            id: Vec::new(),
            last_tx: Vec::new(),
            owner: Vec::new(),
            tags,
            target: target.map(|t| t.to_vec()).unwrap_or_default(),
            quantity,
            data: data.into(),
            reward: "0".to_string(),
            signature: Vec::new(),
            data_size: "0".to_string(),
            data_root: Vec::new(),
            chunk_data: None,
        }
    }

    /// Parse the node JSON shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Render the node JSON shape.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    pub fn set_reward(&mut self, reward: impl Into<String>) {
        self.reward = reward.into();
    }

    pub fn set_last_tx(&mut self, last_tx: impl Into<Vec<u8>>) {
        self.last_tx = last_tx.into();
    }

    /// Chunk `data` and record its size and root.
    ///
    /// Empty data leaves no chunks, an empty root and a zero size.
    pub fn prepare_chunks(&mut self, data: &[u8]) -> Result<()> {
        let chunk_data = ChunkData::from_data(data)?;
        if data.is_empty() {
            self.data_size = "0".to_string();
            self.data_root = Vec::new();
            self.chunk_data = Some(chunk_data);
            return Ok(());
        }

        self.data_size = data.len().to_string();
        self.data_root = chunk_data.data_root().as_bytes().to_vec();
        debug!(
            chunks = chunk_data.len(),
            data_root = %chunk_data.data_root().to_base64url(),
            "prepared transaction chunks"
        );
        self.chunk_data = Some(chunk_data);
        Ok(())
    }

    /// The prepared chunks, if any.
    pub fn chunk_data(&self) -> Option<&ChunkData> {
        self.chunk_data.as_ref()
    }

    /// Chunk `index` of `data` with its proof, ready for upload.
    pub fn get_chunk(&self, index: usize, data: &[u8]) -> Result<ChunkUpload> {
        let chunk_data = self.chunk_data.as_ref().ok_or(Error::ChunksNotPrepared)?;
        let (chunk, proof) = chunk_data
            .get(index)
            .ok_or(Error::ChunkIndexOutOfRange {
                index,
                len: chunk_data.len(),
            })?;

        let bytes = usize::try_from(chunk.min_byte_range)
            .ok()
            .zip(usize::try_from(chunk.max_byte_range).ok())
            .and_then(|(start, end)| data.get(start..end))
            .ok_or_else(|| {
                CoreError::Format(format!(
                    "chunk {index} spans {}..{} but data is {} bytes",
                    chunk.min_byte_range,
                    chunk.max_byte_range,
                    data.len()
                ))
            })?;

        Ok(ChunkUpload {
            data_root: base64url_encode(&self.data_root),
            data_size: self.data_size.clone(),
            data_path: base64url_encode(&proof.path),
            offset: proof.offset.to_string(),
            chunk: base64url_encode(bytes),
        })
    }

    /// The digest the owner signs. Re-derives the data root from `data`.
    pub fn signature_data(&mut self) -> Result<Sha384Digest> {
        if self.format != TRANSACTION_FORMAT {
            return Err(Error::UnsupportedFormat(self.format));
        }

        let data = std::mem::take(&mut self.data);
        let prepared = self.prepare_chunks(&data);
        self.data = data;
        prepared?;

        let tags = self.tags.iter().map(|tag| {
            DeepHashItem::list([
                DeepHashItem::blob(&tag.name[..]),
                DeepHashItem::blob(&tag.value[..]),
            ])
        });
        let format = self.format.to_string();

        Ok(deep_hash(&DeepHashItem::list([
            DeepHashItem::from(format.as_str()),
            DeepHashItem::blob(&self.owner[..]),
            DeepHashItem::blob(&self.target[..]),
            DeepHashItem::from(self.quantity.as_str()),
            DeepHashItem::from(self.reward.as_str()),
            DeepHashItem::blob(&self.last_tx[..]),
            DeepHashItem::list(tags),
            DeepHashItem::from(self.data_size.as_str()),
            DeepHashItem::blob(&self.data_root[..]),
        ])))
    }

    /// Sign with an RSA-PSS signer. Sets `owner`, `signature` and `id`.
    pub fn sign<S: Signer + ?Sized>(&mut self, signer: &S) -> Result<()> {
        let signature_type = signer.signature_type();
        if signature_type != SignatureType::Arweave {
            return Err(ItemError::UnsupportedSignatureType(signature_type.as_u16()).into());
        }

        self.owner = signer.public_key();
        let digest = self.signature_data()?;
        self.signature = signer.sign(digest.as_bytes())?;
        self.id = Sha256Hash::hash(&self.signature).as_bytes().to_vec();

        debug!(
            id = %base64url_encode(&self.id),
            data_size = %self.data_size,
            "signed transaction"
        );
        Ok(())
    }

    /// Check the id and the owner's signature.
    pub fn verify(&mut self) -> Result<()> {
        if self.id != Sha256Hash::hash(&self.signature).as_bytes() {
            warn!(id = %base64url_encode(&self.id), "transaction id does not match signature");
            return Err(ItemError::IdMismatch.into());
        }

        let digest = self.signature_data()?;
        verify_rsa_pss(&self.owner, digest.as_bytes(), &self.signature).map_err(|e| {
            warn!(id = %base64url_encode(&self.id), "transaction signature rejected");
            Error::from(e)
        })
    }
}
