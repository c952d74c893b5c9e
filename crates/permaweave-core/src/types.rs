//! Strong type definitions for Permaweave.
//!
//! Identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{base64url_decode, base64url_encode, Sha256Hash};
use crate::error::{CoreError, Result};

/// A 32-byte record identifier, computed as SHA-256(signature).
///
/// Transactions and data items share this addressing scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub [u8; 32]);

impl ItemId {
    /// Derive the identifier of a signed record from its signature bytes.
    pub fn from_signature(signature: &[u8]) -> Self {
        Self(Sha256Hash::hash(signature).0)
    }

    /// Create a new ItemId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to unpadded base64url.
    pub fn to_base64url(&self) -> String {
        base64url_encode(&self.0)
    }

    /// Parse from unpadded base64url.
    pub fn from_base64url(s: &str) -> Result<Self> {
        let bytes = base64url_decode(s)?;
        Self::try_from(bytes.as_slice())
            .map_err(|_| CoreError::Format(format!("item id must be 32 bytes, got {}", bytes.len())))
    }

    /// The zero id (used as a sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64url())
    }
}

impl AsRef<[u8]> for ItemId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ItemId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for ItemId {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> std::result::Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}
