//! Signing capability and scheme verification.
//!
//! Data items and transactions are signed over a deep-hash digest. RSA-PSS
//! signs `SHA-256(digest)`; Ed25519 signs the digest directly.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{ItemError, Result};
use crate::signature::SignatureType;

/// Public exponent of every RSA owner key.
pub const RSA_PUBLIC_EXPONENT: u32 = 65537;

/// Modulus size of RSA owner keys.
pub const RSA_KEY_BITS: usize = 4096;

/// Salt length used when producing RSA-PSS signatures.
pub const RSA_PSS_SALT_LENGTH: usize = 32;

/// Something that can produce signatures for one registered scheme.
pub trait Signer {
    fn signature_type(&self) -> SignatureType;

    /// Public key bytes as embedded in the `owner` field.
    fn public_key(&self) -> Vec<u8>;

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn signature_type(&self) -> SignatureType {
        (**self).signature_type()
    }

    fn public_key(&self) -> Vec<u8> {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        (**self).sign(message)
    }
}

/// Ed25519 signer for signature types 2 and 4.
#[derive(Clone)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
    signature_type: SignatureType,
}

impl Ed25519Signer {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            signature_type: SignatureType::Ed25519,
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
            signature_type: SignatureType::Ed25519,
        }
    }

    /// Sign under the Solana tag (type 4) instead of type 2.
    pub fn solana(mut self) -> Self {
        self.signature_type = SignatureType::Solana;
        self
    }

    /// The raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Signer for Ed25519Signer {
    fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    fn public_key(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("signature_type", &self.signature_type)
            .finish_non_exhaustive()
    }
}

/// RSA-PSS signer for signature type 1.
#[derive(Clone)]
pub struct RsaPssSigner {
    private_key: RsaPrivateKey,
    owner: Vec<u8>,
}

impl RsaPssSigner {
    /// Generate a new 4096-bit key.
    pub fn generate() -> Result<Self> {
        let private_key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| ItemError::Signer(format!("key generation failed: {e}")))?;
        Self::from_private_key(private_key)
    }

    /// Wrap an existing key. The modulus must be 4096 bits and the public
    /// exponent 65537.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self> {
        if *private_key.e() != BigUint::from(RSA_PUBLIC_EXPONENT) {
            return Err(ItemError::Signer("public exponent must be 65537".into()));
        }
        let expected = SignatureType::Arweave.public_key_length();
        if private_key.size() != expected {
            return Err(ItemError::OwnerLength {
                expected,
                actual: private_key.size(),
            });
        }
        let owner = private_key.n().to_bytes_be();
        Ok(Self { private_key, owner })
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

impl Signer for RsaPssSigner {
    fn signature_type(&self) -> SignatureType {
        SignatureType::Arweave
    }

    fn public_key(&self) -> Vec<u8> {
        self.owner.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let hashed = Sha256::digest(message);
        self.private_key
            .sign_with_rng(
                &mut OsRng,
                Pss::new_with_salt::<Sha256>(RSA_PSS_SALT_LENGTH),
                &hashed,
            )
            .map_err(|e| ItemError::Signer(format!("RSA-PSS signing failed: {e}")))
    }
}

impl fmt::Debug for RsaPssSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPssSigner")
            .field("bits", &self.private_key.n().bits())
            .finish_non_exhaustive()
    }
}

/// Verify `signature` over `message` under the scheme of `signature_type`.
///
/// `owner` is the public key as embedded in the record.
pub fn verify_signature(
    signature_type: SignatureType,
    owner: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<()> {
    match signature_type {
        SignatureType::Arweave => verify_rsa_pss(owner, message, signature),
        SignatureType::Ed25519 | SignatureType::Solana => verify_ed25519(owner, message, signature),
        SignatureType::Ethereum => Err(ItemError::UnsupportedSignatureType(
            SignatureType::Ethereum.as_u16(),
        )),
    }
}

/// RSA-PSS verification of `SHA-256(message)` against a big-endian modulus.
///
/// Accepts a 32-byte salt and the maximal salt length for the key.
pub fn verify_rsa_pss(owner: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
    let public_key = RsaPublicKey::new(
        BigUint::from_bytes_be(owner),
        BigUint::from(RSA_PUBLIC_EXPONENT),
    )
    .map_err(|_| ItemError::InvalidSignature)?;

    let hashed = Sha256::digest(message);
    let em_len = (public_key.n().bits().saturating_sub(1) + 7) / 8;
    let max_salt = em_len.saturating_sub(Sha256::output_size() + 2);

    for salt_len in [RSA_PSS_SALT_LENGTH, max_salt] {
        let scheme = Pss::new_with_salt::<Sha256>(salt_len);
        if public_key.verify(scheme, &hashed, signature).is_ok() {
            return Ok(());
        }
    }
    Err(ItemError::InvalidSignature)
}

fn verify_ed25519(owner: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
    let owner: [u8; 32] = owner.try_into().map_err(|_| ItemError::OwnerLength {
        expected: 32,
        actual: owner.len(),
    })?;
    let verifying_key = VerifyingKey::from_bytes(&owner).map_err(|_| ItemError::InvalidSignature)?;
    let signature = Signature::from_slice(signature).map_err(|_| ItemError::SignatureLength {
        expected: 64,
        actual: signature.len(),
    })?;

    verifying_key
        .verify(message, &signature)
        .map_err(|_| ItemError::InvalidSignature)
}
