//! The Wallet: one signer behind the item, bundle and transaction APIs.

use std::io::{Read, Seek, Write};

use bytes::Bytes;
use permaweave_items::{
    validate_tags, Bundle, BundleError, DataItem, DataItemBuilder, SignatureType, Signer, Tag,
    DEFAULT_COPY_BUFFER_SIZE,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transaction::Transaction;

/// Tag naming the payload encoding of a bundle.
pub const BUNDLE_FORMAT_TAG: &str = "Bundle-Format";

/// Tag naming the bundle layout version.
pub const BUNDLE_VERSION_TAG: &str = "Bundle-Version";

const BUNDLE_FORMAT: &str = "binary";
const BUNDLE_VERSION: &str = "2.0.0";

/// Configuration for the Wallet.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Whether to verify every item of a bundle on ingest.
    pub verify_on_ingest: bool,
    /// Buffer size used when writing streamed payloads.
    pub copy_buffer_size: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            verify_on_ingest: true,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
        }
    }
}

/// A signer plus the operations that need one.
pub struct Wallet<S: Signer> {
    signer: S,
    config: WalletConfig,
}

impl<S: Signer> Wallet<S> {
    /// Create a new wallet.
    pub fn new(signer: S, config: WalletConfig) -> Self {
        Self { signer, config }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signer.signature_type()
    }

    /// The owner field this wallet writes into items and transactions.
    pub fn public_key(&self) -> Vec<u8> {
        self.signer.public_key()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data Items
    // ─────────────────────────────────────────────────────────────────────────

    /// Build and sign a data item over an in-memory payload.
    ///
    /// Tags are checked against the item policy before signing.
    pub fn create_item(
        &self,
        data: impl Into<Bytes>,
        target: Option<[u8; 32]>,
        anchor: Option<[u8; 32]>,
        tags: Vec<Tag>,
    ) -> Result<DataItem> {
        let builder = DataItemBuilder::new(data);
        self.sign_item(builder, target, anchor, tags)
    }

    /// Build and sign a data item whose payload is read from `reader`.
    ///
    /// The reader is rewound and read again each time the item is written.
    pub fn create_item_from_reader<R: Read + Seek + Send + 'static>(
        &self,
        reader: R,
        size: u64,
        target: Option<[u8; 32]>,
        anchor: Option<[u8; 32]>,
        tags: Vec<Tag>,
    ) -> Result<DataItem> {
        let builder = DataItemBuilder::streamed(reader, size);
        self.sign_item(builder, target, anchor, tags)
    }

    fn sign_item(
        &self,
        mut builder: DataItemBuilder,
        target: Option<[u8; 32]>,
        anchor: Option<[u8; 32]>,
        tags: Vec<Tag>,
    ) -> Result<DataItem> {
        validate_tags(&tags).map_err(|e| {
            debug!(error = %e, "refusing to sign data item");
            e
        })?;
        if let Some(target) = target {
            builder = builder.target(target);
        }
        if let Some(anchor) = anchor {
            builder = builder.anchor(anchor.to_vec());
        }
        let item = builder.tags(tags).sign(&self.signer)?;
        debug!(id = %item.id(), "wallet signed data item");
        Ok(item)
    }

    /// Write an item using the configured copy buffer. Returns bytes written.
    pub fn write_item<W: Write + ?Sized>(&self, item: &mut DataItem, sink: &mut W) -> Result<u64> {
        Ok(item.write_to_with_buffer(sink, self.config.copy_buffer_size)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bundles
    // ─────────────────────────────────────────────────────────────────────────

    /// Encode signed items into a bundle.
    pub fn create_bundle(&self, items: Vec<DataItem>) -> Result<Bundle> {
        Ok(Bundle::new(items)?)
    }

    /// A data item carrying a bundle of `items` as its payload.
    pub fn create_nested_item(
        &self,
        items: Vec<DataItem>,
        target: Option<[u8; 32]>,
        anchor: Option<[u8; 32]>,
        tags: Vec<Tag>,
    ) -> Result<DataItem> {
        let bundle = self.create_bundle(items)?;
        let tags = with_bundle_tags(tags)?;
        self.create_item(bundle.into_raw(), target, anchor, tags)
    }

    /// An unsigned transaction carrying `bundle`.
    pub fn bundle_transaction(&self, bundle: &Bundle, tags: Vec<Tag>) -> Result<Transaction> {
        let tags = with_bundle_tags(tags)?;
        debug!(items = bundle.len(), size = bundle.raw().len(), "bundle transaction");
        Ok(Transaction::new(bundle.raw().to_vec(), None, "0", tags))
    }

    /// Decode a bundle received from elsewhere.
    ///
    /// The header table is checked before any item is decoded. Items are
    /// verified when `verify_on_ingest` is set.
    pub fn ingest_bundle(&self, raw: impl Into<Bytes>) -> Result<Bundle> {
        let raw = raw.into();
        if !Bundle::verify(&raw) {
            warn!(size = raw.len(), "rejected bundle with inconsistent header table");
            return Err(BundleError::Format("header table does not match bundle length".into()).into());
        }

        let mut bundle = Bundle::decode(raw)?;
        if self.config.verify_on_ingest {
            bundle.verify_items().map_err(|e| {
                warn!(error = %e, "rejected bundle item");
                e
            })?;
        }

        debug!(items = bundle.len(), "ingested bundle");
        Ok(bundle)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign `tx` in place. Only RSA-PSS wallets can sign transactions.
    pub fn sign_transaction(&self, tx: &mut Transaction) -> Result<()> {
        tx.sign(&self.signer)
    }
}

/// Prefix the two bundle tags, refusing caller tags that reuse their names.
fn with_bundle_tags(tags: Vec<Tag>) -> Result<Vec<Tag>> {
    if let Some(reserved) = tags.iter().find(|tag| {
        tag.name == BUNDLE_FORMAT_TAG.as_bytes() || tag.name == BUNDLE_VERSION_TAG.as_bytes()
    }) {
        return Err(Error::ReservedTag(
            String::from_utf8_lossy(&reserved.name).into_owned(),
        ));
    }

    let mut out = Vec::with_capacity(tags.len() + 2);
    out.push(Tag::new(BUNDLE_FORMAT_TAG, BUNDLE_FORMAT));
    out.push(Tag::new(BUNDLE_VERSION_TAG, BUNDLE_VERSION));
    out.extend(tags);
    Ok(out)
}
