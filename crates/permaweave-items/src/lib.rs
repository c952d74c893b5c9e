//! # Permaweave Items
//!
//! Signed data items and the bundle container.
//!
//! ## Overview
//!
//! A data item is a self-contained signed record: an owner key, optional
//! target and anchor, tags, and a payload. Its id is the SHA-256 of its
//! signature, so the id is fixed once the item is signed. A bundle packs
//! many encoded items behind a table of `(size, id)` headers.
//!
//! ## Key Concepts
//!
//! - **Signature type**: 2-byte tag selecting the scheme and field widths
//! - **Signer**: anything that can sign for one registered scheme
//! - **Payload**: in memory, or streamed from a seekable source on each pass
//! - **Verify**: id, signature, then tag and anchor policy
//!
//! ## Usage
//!
//! ```rust
//! use permaweave_items::{Bundle, DataItem, DataItemBuilder, Ed25519Signer};
//!
//! let signer = Ed25519Signer::generate();
//! let item = DataItemBuilder::new(&b"hello"[..])
//!     .tag("Content-Type", "text/plain")
//!     .sign(&signer)
//!     .unwrap();
//!
//! let bundle = Bundle::new(vec![item]).unwrap();
//! assert!(Bundle::verify(bundle.raw()));
//!
//! let mut decoded = Bundle::decode(bundle.raw().clone()).unwrap();
//! decoded.verify_items().unwrap();
//! ```

pub mod bundle;
pub mod data_item;
pub mod error;
pub mod signature;
pub mod signer;
pub mod tags;
pub mod validation;
mod wire;

#[cfg(test)]
mod test_support;

pub use bundle::{Bundle, BundleHeader};
pub use data_item::{DataItem, DataItemBuilder, Payload, PayloadSource};
pub use error::{BundleError, ItemError, Result, ValidationError};
pub use signature::{SignatureConfig, SignatureType};
pub use signer::{verify_rsa_pss, verify_signature, Ed25519Signer, RsaPssSigner, Signer};
pub use tags::{deserialize_tags, deserialize_tags_prefix, serialize_tags, Tag};
pub use validation::{
    validate_anchor, validate_tags, MAX_ANCHOR_LENGTH, MAX_TAGS, MAX_TAG_NAME_LENGTH,
    MAX_TAG_VALUE_LENGTH,
};
pub use wire::DEFAULT_COPY_BUFFER_SIZE;
