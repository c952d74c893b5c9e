//! # Permaweave Testkit
//!
//! Testing utilities for Permaweave.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known data items and data roots with expected outputs
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic signers and wallets for test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use permaweave_testkit::vectors::{all_vectors, generate_item_from_vector};
//!
//! for vector in all_vectors() {
//!     let item = generate_item_from_vector(&vector);
//!     println!("{}: {}", vector.name, item.id());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use permaweave_testkit::generators::{item_from_params, ItemParams};
//!
//! proptest! {
//!     #[test]
//!     fn item_id_is_deterministic(params: ItemParams) {
//!         let a = item_from_params(&params);
//!         let b = item_from_params(&params);
//!         prop_assert_eq!(a.id(), b.id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use permaweave_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([7; 32]);
//! let bundle = fixture.make_bundle(3);
//! assert_eq!(bundle.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, pattern, rsa_signer, TestFixture};
pub use generators::{item_from_params, ItemParams};
pub use vectors::{all_vectors, generate_item_from_vector, verify_all_vectors, GoldenVector};
