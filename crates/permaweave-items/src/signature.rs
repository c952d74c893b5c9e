//! Registered signature schemes and their field widths.

use std::fmt;

use crate::error::{ItemError, Result};

/// Byte widths of a scheme's signature and public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureConfig {
    pub signature_length: usize,
    pub public_key_length: usize,
}

/// The 2-byte signature type tag that opens every data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SignatureType {
    /// RSA-PSS over SHA-256, 4096-bit keys.
    Arweave = 1,
    Ed25519 = 2,
    /// secp256k1. Decodable, not verifiable.
    Ethereum = 3,
    /// Ed25519 under a separate tag.
    Solana = 4,
}

impl SignatureType {
    pub const ALL: [SignatureType; 4] = [
        SignatureType::Arweave,
        SignatureType::Ed25519,
        SignatureType::Ethereum,
        SignatureType::Solana,
    ];

    pub fn from_u16(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::Arweave),
            2 => Ok(Self::Ed25519),
            3 => Ok(Self::Ethereum),
            4 => Ok(Self::Solana),
            other => Err(ItemError::UnsupportedSignatureType(other)),
        }
    }

    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn config(self) -> SignatureConfig {
        match self {
            Self::Arweave => SignatureConfig {
                signature_length: 512,
                public_key_length: 512,
            },
            Self::Ed25519 | Self::Solana => SignatureConfig {
                signature_length: 64,
                public_key_length: 32,
            },
            Self::Ethereum => SignatureConfig {
                signature_length: 65,
                public_key_length: 65,
            },
        }
    }

    pub const fn signature_length(self) -> usize {
        self.config().signature_length
    }

    pub const fn public_key_length(self) -> usize {
        self.config().public_key_length
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl TryFrom<u16> for SignatureType {
    type Error = ItemError;

    fn try_from(value: u16) -> Result<Self> {
        Self::from_u16(value)
    }
}
