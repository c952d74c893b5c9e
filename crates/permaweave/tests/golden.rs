//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation must produce identical:
//! - tag_bytes (Avro)
//! - signature_data (DeepHash digest)
//! - signature (deterministic Ed25519)
//! - item_bytes
//! - item_id
//! - data roots for the fixed payload pattern

use permaweave::core::{compute_root, CoreError};
use permaweave::items::{serialize_tags, BundleError, ItemError, ValidationError};
use permaweave::{
    base64url_encode, deep_hash, validate_path, Bundle, ChunkData, DataItem, DataItemBuilder,
    DeepHashItem, Ed25519Signer, Signer, Tag, Transaction,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single golden test vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub signer_seed: String, // 32 bytes hex
    pub owner: String,       // 32 bytes hex (derived)
    pub target: String,      // 32 bytes hex or empty
    pub anchor: String,      // 32 bytes hex or empty
    pub tags: Vec<(String, String)>,
    pub payload: String, // hex

    // Derived outputs (hex except item_id)
    pub tag_bytes: String,
    pub signature_data: String, // 48 bytes
    pub signature: String,      // 64 bytes
    pub item_bytes: String,
    pub item_id: String, // base64url
}

/// Fixed payload pattern shared by the data root vectors.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn to_tags(tags: &[(&str, &str)]) -> Vec<Tag> {
    tags.iter().map(|(n, v)| Tag::new(*n, *v)).collect()
}

/// Generate a golden vector from inputs.
fn generate_vector(
    name: &str,
    description: &str,
    seed: [u8; 32],
    payload: &[u8],
    target: Option<[u8; 32]>,
    anchor: Option<[u8; 32]>,
    tags: &[(&str, &str)],
) -> GoldenVector {
    let signer = Ed25519Signer::from_seed(&seed);
    let owner = signer.public_key();
    let tag_bytes = serialize_tags(&to_tags(tags));

    let digest = deep_hash(&DeepHashItem::list([
        "dataitem".into(),
        "1".into(),
        "2".into(),
        DeepHashItem::from(&owner[..]),
        DeepHashItem::from(target.as_ref().map_or(&[][..], |t| &t[..])),
        DeepHashItem::from(anchor.as_ref().map_or(&[][..], |a| &a[..])),
        DeepHashItem::from(&tag_bytes[..]),
        DeepHashItem::from(payload),
    ]));

    let mut builder = DataItemBuilder::new(payload.to_vec()).tags(to_tags(tags));
    if let Some(target) = target {
        builder = builder.target(target);
    }
    if let Some(anchor) = anchor {
        builder = builder.anchor(anchor.to_vec());
    }
    let mut item = builder.sign(&signer).unwrap();

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        signer_seed: hex::encode(seed),
        owner: hex::encode(&owner),
        target: target.map(hex::encode).unwrap_or_default(),
        anchor: anchor.map(hex::encode).unwrap_or_default(),
        tags: tags
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        payload: hex::encode(payload),
        tag_bytes: hex::encode(&tag_bytes),
        signature_data: digest.to_hex(),
        signature: hex::encode(item.signature()),
        item_bytes: hex::encode(item.to_bytes().unwrap()),
        item_id: item.id().to_base64url(),
    }
}

const ARDRIVE_TAGS: &[(&str, &str)] = &[
    ("Content-Type", "text/plain"),
    ("App-Name", "ArDrive-CLI"),
    ("App-Version", "1.21.0"),
];

/// Generate all 6 golden vectors.
pub fn generate_all_vectors() -> Vec<GoldenVector> {
    let long_name = "n".repeat(1024);
    let long_value = "v".repeat(3072);

    vec![
        // Vector 1: Short payload, no optional fields
        generate_vector(
            "hello",
            "Minimal item: no target, no anchor, no tags",
            [0x01; 32],
            b"hello",
            None,
            None,
            &[],
        ),
        // Vector 2: Every optional field present
        generate_vector(
            "tagged_with_target_and_anchor",
            "Item with target, anchor and three tags",
            [0x02; 32],
            b"tagged payload",
            Some([0xaa; 32]),
            Some([0xbb; 32]),
            ARDRIVE_TAGS,
        ),
        // Vector 3: Empty payload
        generate_vector(
            "empty_payload",
            "Item with a zero-length payload",
            [0x03; 32],
            b"",
            None,
            None,
            &[],
        ),
        // Vector 4: Binary payload (all byte values)
        generate_vector(
            "binary_payload",
            "Payload containing all 256 byte values",
            [0x04; 32],
            &(0u8..=255).collect::<Vec<u8>>(),
            None,
            None,
            &[("Content-Type", "application/octet-stream")],
        ),
        // Vector 5: Payload spanning several chunks
        generate_vector(
            "multi_chunk_payload",
            "Payload larger than one chunk",
            [0x05; 32],
            &pattern(300_000),
            Some([0x11; 32]),
            None,
            &[],
        ),
        // Vector 6: Tag at the name and value limits
        generate_vector(
            "max_tag_lengths",
            "One tag with a 1024-byte name and a 3072-byte value",
            [0x06; 32],
            b"limits",
            None,
            None,
            &[(long_name.as_str(), long_value.as_str())],
        ),
    ]
}

#[test]
fn test_generate_vectors() {
    let vectors = generate_all_vectors();
    assert_eq!(vectors.len(), 6);

    // Print vectors for inspection
    for v in &vectors {
        println!("=== {} ===", v.name);
        println!("  description: {}", v.description);
        println!("  owner: {}", v.owner);
        println!("  item_id: {}", v.item_id);
        println!();
    }
}

#[test]
fn test_known_vectors() {
    let vectors = generate_all_vectors();

    assert_eq!(vectors[0].item_id, "MykJOGVAHGuoJEiRacmgGVlOxAj0zwzwC-wr5eBxx6w");
    assert_eq!(vectors[0].item_bytes.len() / 2, 121);
    assert_eq!(
        vectors[0].item_bytes,
        "02005b32f6861368a3a3c2d454f5ad4dcb57925948a53531ddb96bfdff3f20c07ae0199f284c503f909a9bfb99c68c4a9d206dcb6c0b8c74ece3018deeeb8f3a3f0c8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c00000000000000000000000000000000000068656c6c6f"
    );

    assert_eq!(vectors[1].item_id, "jfHW5azNm0P7dw2v6m2Ghads1qWOtRVbdCINlbjYyx4");
    assert_eq!(vectors[1].item_bytes.len() / 2, 260);
    assert_eq!(vectors[1].tag_bytes.len() / 2, 66);
    assert!(vectors[1].tag_bytes.starts_with("0618436f"));
    assert!(vectors[1].tag_bytes.ends_with("3000"));

    assert_eq!(vectors[2].item_id, "m8pugPwpk3CI9Hc1LT37WLJ44bVjZRGhJKmXkkyl8q0");
    assert_eq!(vectors[2].item_bytes.len() / 2, 116);
}

#[test]
fn test_vectors_deterministic() {
    // Generate twice, must be identical
    let v1 = generate_all_vectors();
    let v2 = generate_all_vectors();

    for (a, b) in v1.iter().zip(v2.iter()) {
        assert_eq!(a.tag_bytes, b.tag_bytes, "tag_bytes mismatch for {}", a.name);
        assert_eq!(a.signature_data, b.signature_data, "signature_data mismatch for {}", a.name);
        assert_eq!(a.signature, b.signature, "signature mismatch for {}", a.name);
        assert_eq!(a.item_bytes, b.item_bytes, "item_bytes mismatch for {}", a.name);
        assert_eq!(a.item_id, b.item_id, "item_id mismatch for {}", a.name);
    }
}

#[test]
fn test_vectors_verify() {
    // Ensure every encoded item decodes and verifies
    let vectors = generate_all_vectors();

    for v in &vectors {
        let raw = hex::decode(&v.item_bytes).unwrap();
        let mut item = DataItem::decode(raw).unwrap();
        assert!(item.verify().is_ok(), "verify failed for {}", v.name);

        // Verify decoded fields match the inputs
        assert_eq!(hex::encode(item.owner()), v.owner, "owner mismatch for {}", v.name);
        assert_eq!(
            item.target().map(hex::encode).unwrap_or_default(),
            v.target,
            "target mismatch for {}",
            v.name
        );
        assert_eq!(
            item.anchor().map(hex::encode).unwrap_or_default(),
            v.anchor,
            "anchor mismatch for {}",
            v.name
        );
        assert_eq!(
            hex::encode(item.data().unwrap()),
            v.payload,
            "payload mismatch for {}",
            v.name
        );
        assert_eq!(item.tags().len(), v.tags.len(), "tag count mismatch for {}", v.name);
        assert_eq!(item.id().to_base64url(), v.item_id, "item_id mismatch for {}", v.name);

        let signature = hex::decode(&v.signature).unwrap();
        assert_eq!(
            base64url_encode(&Sha256::digest(&signature)),
            v.item_id,
            "id is not the hash of the signature for {}",
            v.name
        );
    }
}

#[test]
fn test_known_data_roots() {
    let roots = [
        (0, "x9bUbvLyiRlsOOqClNkKV0LAohFd-PfXfb_XoYosfQI"),
        (1, "Ht_yZhXGBDUZfLv4OD6we7FkrjcpDpGPwQZEZgEJVfk"),
        (1000, "OBN0lHZnrFrskv9s1HKU7VRRDXrzQ3sOgMniX5cGavM"),
        (262_144, "gty7KB2baLFp7OGxuV2wBeX3NippS1tNVlMOZryIq5o"),
        (263_144, "bFtxR6l6BRJt4Y7utAH1mGDg4Ps969jw17_NfjGzB_Q"),
        (300_000, "48NCFfChsqNv4kmqH4QDmwtV9ejBNlPutiSwwAuFCwg"),
        (836_907, "XFwTelMPyzg0l6iZB813y-duUv1zOp_lIq2FfX-s_IQ"),
    ];

    for (len, expected) in roots {
        let payload = pattern(len);
        assert_eq!(compute_root(&payload).unwrap().to_base64url(), expected, "root mismatch for {len}");

        let chunks = ChunkData::from_data(&payload).unwrap();
        assert_eq!(chunks.data_root().to_base64url(), expected);
        for index in 0..chunks.len() {
            chunks.validate_chunk(index).unwrap();
        }
    }
}

#[test]
fn test_known_deep_hash() {
    assert_eq!(
        deep_hash(&DeepHashItem::from("abc")).to_hex(),
        "71115a30152ebcffb6defbb643abc8ef76f01fe323f1d62340646085960f6e347cb2d8e9a46ddee655b3012c6131d4e0"
    );
    assert_eq!(
        deep_hash(&DeepHashItem::list([
            "a".into(),
            DeepHashItem::list(["b".into(), "c".into()]),
            "".into(),
        ]))
        .to_hex(),
        "041610a481af67a00b33e0e2197bf20e92747db97a47197e2181648ea1f571d7d11537859258d953eebf88a170abccb0"
    );
}

#[test]
fn test_known_bundle() {
    let vectors = generate_all_vectors();
    let items = [&vectors[0], &vectors[2]]
        .iter()
        .map(|v| DataItem::decode(hex::decode(&v.item_bytes).unwrap()).unwrap())
        .collect();

    let bundle = Bundle::new(items).unwrap();
    assert_eq!(bundle.raw().len(), 397);
    assert_eq!(
        hex::encode(Sha256::digest(bundle.raw())),
        "d14181266a39668e62aa19bf2159b159565cd5e96788b22bc5d41fa3e790adf9"
    );
}

#[test]
fn print_golden_vectors_json() {
    let vectors = generate_all_vectors();

    #[derive(Serialize)]
    struct VectorFile {
        version: String,
        description: String,
        signature_type: u16,
        vectors: Vec<GoldenVector>,
    }

    let file = VectorFile {
        version: "0.1.0".to_string(),
        description: "Golden test vectors for Permaweave data items. Every implementation must produce identical outputs.".to_string(),
        signature_type: 2,
        vectors,
    };

    let json = serde_json::to_string_pretty(&file).unwrap();
    println!("{}", json);
}

// =============================================================================
// REJECTION TEST VECTORS
// These test that invalid inputs are properly rejected.
// =============================================================================

#[test]
fn test_reject_too_many_tags() {
    let signer = Ed25519Signer::from_seed(&[0x42; 32]);
    let tags = (0..129).map(|i| Tag::new(format!("tag-{i}"), "v"));

    let mut item = DataItemBuilder::new(&b"payload"[..]).tags(tags).sign(&signer).unwrap();
    assert!(
        matches!(
            item.verify(),
            Err(ItemError::Validation(ValidationError::TooManyTags { count: 129 }))
        ),
        "must reject > 128 tags"
    );
}

#[test]
fn test_reject_unknown_signature_type() {
    let signer = Ed25519Signer::from_seed(&[0x42; 32]);
    let mut item = DataItemBuilder::new(&b"payload"[..]).sign(&signer).unwrap();
    let mut raw = item.to_bytes().unwrap();
    raw[0] = 99;

    assert!(
        matches!(DataItem::decode(raw), Err(ItemError::UnsupportedSignatureType(99))),
        "must reject unknown signature type"
    );
}

#[test]
fn test_reject_short_anchor() {
    let signer = Ed25519Signer::from_seed(&[0x42; 32]);
    let result = DataItemBuilder::new(&b"payload"[..])
        .anchor(vec![0u8; 31])
        .sign(&signer);
    assert!(
        matches!(
            result,
            Err(ItemError::Validation(ValidationError::AnchorLength { len: 31 }))
        ),
        "must reject anchor that is not 32 bytes"
    );
}

#[test]
fn test_reject_tampered_payload() {
    let vectors = generate_all_vectors();
    let mut raw = hex::decode(&vectors[0].item_bytes).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;

    let mut item = DataItem::decode(raw).unwrap();
    assert!(
        matches!(item.verify(), Err(ItemError::InvalidSignature)),
        "must reject tampered payload"
    );
}

#[test]
fn test_reject_tampered_proof() {
    let payload = pattern(600_000);
    let chunks = ChunkData::from_data(&payload).unwrap();
    let (chunk, proof) = chunks.get(1).unwrap();

    let mut path = proof.path.clone();
    path[0] ^= 0xff;
    assert!(
        matches!(
            validate_path(chunks.data_root(), chunk.min_byte_range, 0, payload.len() as u64, &path),
            Err(CoreError::InvalidProof(_))
        ),
        "must reject tampered proof"
    );

    let truncated = &proof.path[..proof.path.len() - 1];
    assert!(
        validate_path(chunks.data_root(), chunk.min_byte_range, 0, payload.len() as u64, truncated).is_err(),
        "must reject truncated proof"
    );
}

#[test]
fn test_reject_bundle_with_trailing_bytes() {
    let vectors = generate_all_vectors();
    let item = DataItem::decode(hex::decode(&vectors[0].item_bytes).unwrap()).unwrap();
    let mut raw = Bundle::new(vec![item]).unwrap().into_raw().to_vec();
    raw.extend_from_slice(&[0, 0]);

    assert!(!Bundle::verify(&raw));
    assert!(
        matches!(Bundle::decode(raw), Err(BundleError::TrailingBytes { count: 2 })),
        "must reject trailing bytes"
    );
}

#[test]
fn test_reject_transaction_format() {
    let mut tx = Transaction::new(b"data".to_vec(), None, "0", Vec::new());
    tx.format = 1;
    assert!(
        matches!(tx.signature_data(), Err(permaweave::Error::UnsupportedFormat(1))),
        "must reject format 1 transactions"
    );
}

// =============================================================================
// BUNDLE LAWS
// Properties every encoded bundle must satisfy.
// =============================================================================

mod bundle_laws {
    use super::*;
    use proptest::prelude::*;

    fn signed_items(seed: u8, payloads: &[Vec<u8>]) -> Vec<DataItem> {
        let signer = Ed25519Signer::from_seed(&[seed; 32]);
        payloads
            .iter()
            .map(|p| DataItemBuilder::new(p.clone()).sign(&signer).unwrap())
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn encoded_bundle_verifies_and_decodes(
            seed in any::<u8>(),
            payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 0..6),
        ) {
            let items = signed_items(seed, &payloads);
            let ids: Vec<_> = items.iter().map(|i| *i.id()).collect();
            let body: u64 = items.iter().map(|i| i.raw_len()).sum();

            let raw = Bundle::new(items).unwrap().into_raw();
            prop_assert!(Bundle::verify(&raw));
            prop_assert_eq!(raw.len() as u64, 32 + 64 * ids.len() as u64 + body);

            let mut decoded = Bundle::decode(raw).unwrap();
            prop_assert!(decoded.verify_items().is_ok());
            prop_assert_eq!(decoded.ids().copied().collect::<Vec<_>>(), ids);
        }

        #[test]
        fn resized_bundle_fails_structural_check(
            payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..256), 1..4),
            extra in 1usize..64,
        ) {
            let raw = Bundle::new(signed_items(7, &payloads)).unwrap().into_raw().to_vec();

            let mut longer = raw.clone();
            longer.extend(std::iter::repeat(0u8).take(extra));
            prop_assert!(!Bundle::verify(&longer));

            let shorter = &raw[..raw.len() - extra.min(raw.len() - 1)];
            prop_assert!(!Bundle::verify(shorter));
        }
    }
}
