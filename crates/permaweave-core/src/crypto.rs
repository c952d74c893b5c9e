//! Hash primitives and the base64url text encoding.
//!
//! SHA-256 addresses chunks, tree nodes, and item ids. SHA-384 is the
//! digest behind deep hashing.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384};
use std::fmt;

use crate::error::{CoreError, Result};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Hash the concatenation of several byte strings.
    pub fn hash_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to unpadded base64url, the form used on the wire.
    pub fn to_base64url(&self) -> String {
        base64url_encode(&self.0)
    }

    /// Parse from unpadded base64url.
    pub fn from_base64url(s: &str) -> Result<Self> {
        let bytes = base64url_decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::Format(format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 48-byte SHA-384 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha384Digest(pub [u8; 48]);

impl Sha384Digest {
    /// Compute the SHA-384 digest of data.
    pub fn hash(data: &[u8]) -> Self {
        Self::from_hasher(Sha384::new_with_prefix(data))
    }

    /// Digest the concatenation of two byte strings.
    pub fn hash_pair(left: &[u8], right: &[u8]) -> Self {
        let mut hasher = Sha384::new();
        hasher.update(left);
        hasher.update(right);
        Self::from_hasher(hasher)
    }

    /// Finish a running SHA-384 computation.
    pub fn from_hasher(hasher: Sha384) -> Self {
        let mut out = [0u8; 48];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha384Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA384({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha384Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode bytes as unpadded base64url.
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| CoreError::Format(format!("invalid base64url: {e}")))
}

/// Serde adapter for byte vectors carried as unpadded base64url strings.
pub mod base64url_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::base64url_encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::base64url_decode(&text).map_err(serde::de::Error::custom)
    }
}
