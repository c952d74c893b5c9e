//! Golden test vectors for deterministic verification.
//!
//! Ed25519 signatures are deterministic, so a fixed seed, payload, and tag
//! list always produce the same item bytes and id. Data roots depend only on
//! the payload.

use permaweave::{DataItem, DataItemBuilder, Ed25519Signer, Tag};
use permaweave_core::compute_root;
use serde::Serialize;

use crate::fixtures::pattern;

/// A golden data item vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    /// Payload bytes.
    pub payload: &'static [u8],
    pub target: Option<[u8; 32]>,
    pub anchor: Option<[u8; 32]>,
    pub tags: &'static [(&'static str, &'static str)],
    /// Encoded length of the item.
    pub expected_len: usize,
    /// Expected item id (base64url).
    pub expected_item_id: &'static str,
}

/// A golden data root over [`pattern`] bytes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DataRootVector {
    pub len: usize,
    /// Expected root (base64url).
    pub expected_root: &'static str,
}

/// Avro encoding of [`ARDRIVE_TAGS`].
pub const ARDRIVE_TAG_BYTES: [u8; 66] = [
    6, 24, 67, 111, 110, 116, 101, 110, 116, 45, 84, 121, 112, 101, 20, 116, 101, 120, 116, 47,
    112, 108, 97, 105, 110, 16, 65, 112, 112, 45, 78, 97, 109, 101, 22, 65, 114, 68, 114, 105,
    118, 101, 45, 67, 76, 73, 22, 65, 112, 112, 45, 86, 101, 114, 115, 105, 111, 110, 12, 49, 46,
    50, 49, 46, 48, 0,
];

pub const ARDRIVE_TAGS: &[(&str, &str)] = &[
    ("Content-Type", "text/plain"),
    ("App-Name", "ArDrive-CLI"),
    ("App-Version", "1.21.0"),
];

/// Digest of the bundle holding the `hello` and `empty` vectors, in that order.
pub const HELLO_EMPTY_BUNDLE_SHA256: &str =
    "d14181266a39668e62aa19bf2159b159565cd5e96788b22bc5d41fa3e790adf9";

/// Get all golden data item vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hello",
            seed: [0x01; 32],
            payload: b"hello",
            target: None,
            anchor: None,
            tags: &[],
            expected_len: 121,
            expected_item_id: "MykJOGVAHGuoJEiRacmgGVlOxAj0zwzwC-wr5eBxx6w",
        },
        GoldenVector {
            name: "tagged",
            seed: [0x02; 32],
            payload: b"tagged payload",
            target: Some([0xaa; 32]),
            anchor: Some([0xbb; 32]),
            tags: ARDRIVE_TAGS,
            expected_len: 260,
            expected_item_id: "jfHW5azNm0P7dw2v6m2Ghads1qWOtRVbdCINlbjYyx4",
        },
        GoldenVector {
            name: "empty",
            seed: [0x03; 32],
            payload: b"",
            target: None,
            anchor: None,
            tags: &[],
            expected_len: 116,
            expected_item_id: "m8pugPwpk3CI9Hc1LT37WLJ44bVjZRGhJKmXkkyl8q0",
        },
    ]
}

/// Get all golden data root vectors.
pub fn data_root_vectors() -> Vec<DataRootVector> {
    [
        (0, "x9bUbvLyiRlsOOqClNkKV0LAohFd-PfXfb_XoYosfQI"),
        (1, "Ht_yZhXGBDUZfLv4OD6we7FkrjcpDpGPwQZEZgEJVfk"),
        (1000, "OBN0lHZnrFrskv9s1HKU7VRRDXrzQ3sOgMniX5cGavM"),
        (262_144, "gty7KB2baLFp7OGxuV2wBeX3NippS1tNVlMOZryIq5o"),
        (263_144, "bFtxR6l6BRJt4Y7utAH1mGDg4Ps969jw17_NfjGzB_Q"),
        (300_000, "48NCFfChsqNv4kmqH4QDmwtV9ejBNlPutiSwwAuFCwg"),
        (524_288, "H2bNmvftzAlIQXVYCetFsJ9f0uoC4C2FbfivZTRSyqI"),
        (836_907, "XFwTelMPyzg0l6iZB813y-duUv1zOp_lIq2FfX-s_IQ"),
    ]
    .into_iter()
    .map(|(len, expected_root)| DataRootVector { len, expected_root })
    .collect()
}

/// Sign the data item a golden vector describes.
pub fn generate_item_from_vector(vector: &GoldenVector) -> DataItem {
    let signer = Ed25519Signer::from_seed(&vector.seed);
    let mut builder = DataItemBuilder::new(vector.payload)
        .tags(vector.tags.iter().map(|(n, v)| Tag::new(*n, *v)));

    if let Some(target) = vector.target {
        builder = builder.target(target);
    }
    if let Some(anchor) = vector.anchor {
        builder = builder.anchor(anchor.to_vec());
    }

    // Vectors are fixed inputs within every policy limit.
    builder.sign(&signer).expect("golden vector inputs are valid")
}

/// Verify all golden vectors produce the expected item ids.
///
/// Returns `(name, matches, computed_id)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let item = generate_item_from_vector(v);
            let id = item.id().to_base64url();
            let matches = id == v.expected_item_id && item.raw_len() == v.expected_len as u64;
            (v.name.to_string(), matches, id)
        })
        .collect()
}

/// Verify every data root vector against [`compute_root`].
pub fn verify_data_roots() -> Vec<(usize, bool, String)> {
    data_root_vectors()
        .iter()
        .map(|v| {
            let root = compute_root(&pattern(v.len))
                .map(|r| r.to_base64url())
                .unwrap_or_default();
            (v.len, root == v.expected_root, root)
        })
        .collect()
}

/// All vectors as pretty JSON, for other implementations to consume.
pub fn vectors_json() -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct VectorFile {
        items: Vec<GoldenVector>,
        data_roots: Vec<DataRootVector>,
        bundle_sha256: &'static str,
    }

    serde_json::to_string_pretty(&VectorFile {
        items: all_vectors(),
        data_roots: data_root_vectors(),
        bundle_sha256: HELLO_EMPTY_BUNDLE_SHA256,
    })
}
