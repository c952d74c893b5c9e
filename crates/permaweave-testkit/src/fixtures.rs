//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::OnceLock;

use bytes::Bytes;
use permaweave::{Bundle, DataItem, Ed25519Signer, RsaPssSigner, Tag, Wallet, WalletConfig};
use rand::RngCore;

/// A test fixture with a deterministic Ed25519 wallet.
pub struct TestFixture {
    pub seed: [u8; 32],
    pub wallet: Wallet<Ed25519Signer>,
}

impl TestFixture {
    /// Create a new test fixture with a random key.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::with_seed(seed)
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            seed,
            wallet: Wallet::new(Ed25519Signer::from_seed(&seed), WalletConfig::default()),
        }
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.wallet.public_key()
    }

    /// Sign an untagged item.
    pub fn make_item(&self, payload: impl Into<Bytes>) -> DataItem {
        self.make_tagged_item(payload, Vec::new())
    }

    /// Sign an item with tags.
    pub fn make_tagged_item(&self, payload: impl Into<Bytes>, tags: Vec<Tag>) -> DataItem {
        self.wallet
            .create_item(payload, None, None, tags)
            .expect("fixture item is valid")
    }

    /// A bundle of `count` items with distinct payloads.
    pub fn make_bundle(&self, count: usize) -> Bundle {
        let items = (0..count)
            .map(|i| self.make_item(format!("item {i}").into_bytes()))
            .collect();
        self.wallet.create_bundle(items).expect("fixture bundle is valid")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// One 4096-bit RSA key per process; generation is slow.
pub fn rsa_signer() -> &'static RsaPssSigner {
    static SIGNER: OnceLock<RsaPssSigner> = OnceLock::new();
    SIGNER.get_or_init(|| RsaPssSigner::generate().expect("RSA key generation"))
}

/// The fixed payload pattern used by the data root vectors.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// `len` random bytes.
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut payload = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut payload);
    payload
}
