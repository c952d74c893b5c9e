//! Proptest generators for property-based testing.

use std::borrow::Cow;

use proptest::prelude::*;

use permaweave::{DataItem, DataItemBuilder, DeepHashItem, Ed25519Signer, Tag};
use permaweave_core::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use permaweave_items::{MAX_TAGS, MAX_TAG_NAME_LENGTH, MAX_TAG_VALUE_LENGTH};

/// Generate a deterministic Ed25519 signer.
pub fn ed25519_signer() -> impl Strategy<Value = Ed25519Signer> {
    any::<[u8; 32]>().prop_map(|seed| Ed25519Signer::from_seed(&seed))
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Payload lengths clustered around the chunk boundaries, where the
/// balancing rule applies.
pub fn chunk_boundary_len() -> impl Strategy<Value = usize> {
    prop_oneof![
        0usize..=1024,
        (MAX_CHUNK_SIZE - 64)..=(MAX_CHUNK_SIZE + 64),
        (MAX_CHUNK_SIZE + MIN_CHUNK_SIZE - 64)..=(MAX_CHUNK_SIZE + MIN_CHUNK_SIZE + 64),
        (2 * MAX_CHUNK_SIZE - 64)..=(2 * MAX_CHUNK_SIZE + 64),
        0usize..=(4 * MAX_CHUNK_SIZE),
    ]
}

/// Generate a tag within the policy limits.
pub fn tag() -> impl Strategy<Value = Tag> {
    (
        prop::collection::vec(any::<u8>(), 1..=64),
        prop::collection::vec(any::<u8>(), 1..=128),
    )
        .prop_map(|(name, value)| Tag::new(name, value))
}

/// Generate a tag at or near the length limits.
pub fn long_tag() -> impl Strategy<Value = Tag> {
    (
        (MAX_TAG_NAME_LENGTH - 8)..=MAX_TAG_NAME_LENGTH,
        (MAX_TAG_VALUE_LENGTH - 8)..=MAX_TAG_VALUE_LENGTH,
    )
        .prop_map(|(name, value)| Tag::new(vec![b'n'; name], vec![b'v'; value]))
}

/// Generate up to `max` tags.
pub fn tags(max: usize) -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(tag(), 0..=max.min(MAX_TAGS))
}

/// Generate a DeepHash input tree.
pub fn deep_hash_item() -> impl Strategy<Value = DeepHashItem<'static>> {
    let leaf = payload(64).prop_map(|bytes| DeepHashItem::Blob(Cow::Owned(bytes)));
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(DeepHashItem::List)
    })
}

/// Parameters for generating a data item.
#[derive(Debug, Clone)]
pub struct ItemParams {
    pub seed: [u8; 32],
    pub payload: Vec<u8>,
    pub target: Option<[u8; 32]>,
    pub anchor: Option<[u8; 32]>,
    pub tags: Vec<Tag>,
}

impl Arbitrary for ItemParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            payload(2048),
            any::<Option<[u8; 32]>>(),
            any::<Option<[u8; 32]>>(),
            tags(8),
        )
            .prop_map(|(seed, payload, target, anchor, tags)| ItemParams {
                seed,
                payload,
                target,
                anchor,
                tags,
            })
            .boxed()
    }
}

/// Sign a data item from parameters.
pub fn item_from_params(params: &ItemParams) -> DataItem {
    let mut builder = DataItemBuilder::new(params.payload.clone()).tags(params.tags.clone());
    if let Some(target) = params.target {
        builder = builder.target(target);
    }
    if let Some(anchor) = params.anchor {
        builder = builder.anchor(anchor.to_vec());
    }
    builder
        .sign(&Ed25519Signer::from_seed(&params.seed))
        .expect("generated parameters are within policy")
}

#[cfg(test)]
mod tests {
    use super::*;
    use permaweave::{chunk_data, deep_hash, ChunkData};

    proptest! {
        #[test]
        fn test_item_id_deterministic(params: ItemParams) {
            let a = item_from_params(&params);
            let b = item_from_params(&params);

            prop_assert_eq!(a.id(), b.id());
        }

        #[test]
        fn test_item_round_trip(params: ItemParams) {
            let mut item = item_from_params(&params);
            let raw = item.to_bytes().unwrap();

            let mut decoded = DataItem::decode(raw).unwrap();
            prop_assert!(decoded.verify().is_ok());
            prop_assert_eq!(decoded.id(), item.id());
            prop_assert_eq!(decoded.tags(), &params.tags[..]);
            prop_assert_eq!(decoded.target(), params.target.as_ref());
            prop_assert_eq!(decoded.anchor(), params.anchor.as_ref());
        }

        #[test]
        fn test_item_id_unique_with_different_payload(
            seed in any::<[u8; 32]>(),
            p1 in payload(100),
            p2 in payload(100),
        ) {
            prop_assume!(p1 != p2);

            let signer = Ed25519Signer::from_seed(&seed);
            let a = DataItemBuilder::new(p1).sign(&signer).unwrap();
            let b = DataItemBuilder::new(p2).sign(&signer).unwrap();

            prop_assert_ne!(a.id(), b.id());
        }

        #[test]
        fn test_long_tags_verify(tag in long_tag(), seed in any::<[u8; 32]>()) {
            let mut item = DataItemBuilder::new(&b"x"[..])
                .tags([tag])
                .sign(&Ed25519Signer::from_seed(&seed))
                .unwrap();
            prop_assert!(item.verify().is_ok());
        }

        #[test]
        fn test_deep_hash_deterministic(item in deep_hash_item()) {
            prop_assert_eq!(deep_hash(&item), deep_hash(&item.clone()));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_chunks_cover_payload(len in chunk_boundary_len()) {
            let data = vec![0u8; len];
            let chunks = chunk_data(&data);

            prop_assert_eq!(chunks.first().map(|c| c.min_byte_range), Some(0));
            prop_assert_eq!(chunks.last().map(|c| c.max_byte_range), Some(len as u64));
            for pair in chunks.windows(2) {
                prop_assert_eq!(pair[0].max_byte_range, pair[1].min_byte_range);
            }
            for chunk in &chunks {
                prop_assert!(chunk.len() <= MAX_CHUNK_SIZE as u64);
            }
        }

        #[test]
        fn test_every_proof_validates(len in chunk_boundary_len()) {
            let data = crate::fixtures::pattern(len);
            let prepared = ChunkData::from_data(&data).unwrap();
            for index in 0..prepared.len() {
                prop_assert!(prepared.validate_chunk(index).is_ok());
            }
        }
    }
}
