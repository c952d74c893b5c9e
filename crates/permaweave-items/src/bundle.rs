//! Bundles: many data items behind a fixed header table.
//!
//! ```text
//! item count           32 bytes, little-endian
//! headers              item count * (size: 32 bytes LE || id: 32 bytes)
//! items                encoded data items, in header order
//! ```

use bytes::Bytes;
use permaweave_core::ItemId;
use tracing::debug;

use crate::data_item::DataItem;
use crate::error::BundleError;
use crate::wire::{encode_u256_le, ByteReader};

/// Width of the item count field.
pub const COUNT_SIZE: usize = 32;

/// Width of one header record.
pub const HEADER_SIZE: usize = 64;

/// One entry of the header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    pub id: ItemId,
    /// Encoded length of the item.
    pub size: u64,
}

impl BundleHeader {
    /// The 64-byte record: `size || id`.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..32].copy_from_slice(&encode_u256_le(self.size));
        out[32..].copy_from_slice(self.id.as_bytes());
        out
    }
}

/// An encoded bundle and its items.
#[derive(Debug)]
pub struct Bundle {
    headers: Vec<BundleHeader>,
    items: Vec<DataItem>,
    raw: Bytes,
}

impl Bundle {
    /// Encode signed items into a bundle.
    ///
    /// Streamed items are read once to produce the encoding.
    pub fn new(mut items: Vec<DataItem>) -> Result<Self, BundleError> {
        let headers: Vec<BundleHeader> = items
            .iter()
            .map(|item| BundleHeader {
                id: *item.id(),
                size: item.raw_len(),
            })
            .collect();

        let body: u64 = headers.iter().map(|h| h.size).sum();
        let table = COUNT_SIZE + HEADER_SIZE * headers.len();
        let mut raw = Vec::with_capacity(table + usize::try_from(body).unwrap_or(0));

        raw.extend_from_slice(&encode_u256_le(headers.len() as u64));
        for header in &headers {
            raw.extend_from_slice(&header.to_bytes());
        }
        for (index, item) in items.iter_mut().enumerate() {
            item.write_to(&mut raw)
                .map_err(|source| BundleError::Item { index, source })?;
        }

        debug!(items = headers.len(), size = raw.len(), "encoded bundle");

        Ok(Self {
            headers,
            items,
            raw: Bytes::from(raw),
        })
    }

    /// Decode a bundle and every item in it.
    ///
    /// Items are not verified; see [`Bundle::verify_items`].
    pub fn decode(raw: impl Into<Bytes>) -> Result<Self, BundleError> {
        let raw = raw.into();
        let mut reader = ByteReader::new(&raw);

        let count = reader.u256_le("item count").map_err(BundleError::Format)?;
        let available = ((raw.len() - COUNT_SIZE) / HEADER_SIZE) as u64;
        if count > available {
            return Err(BundleError::ItemCountMismatch {
                declared: count,
                available,
            });
        }

        let mut headers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let size = reader.u256_le("item size").map_err(BundleError::Format)?;
            let id = ItemId::from_bytes(reader.array32("item id").map_err(BundleError::Format)?);
            headers.push(BundleHeader { id, size });
        }

        let mut items = Vec::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let len = usize::try_from(header.size)
                .map_err(|_| BundleError::Format(format!("item {index} size {} too large", header.size)))?;
            let start = reader.position();
            reader.take(len, "item").map_err(BundleError::Format)?;

            let item = DataItem::decode(raw.slice(start..start + len))
                .map_err(|source| BundleError::Item { index, source })?;
            if item.id() != &header.id {
                return Err(BundleError::HeaderIdMismatch { index });
            }
            items.push(item);
        }

        let trailing = raw.len() - reader.position();
        if trailing != 0 {
            return Err(BundleError::TrailingBytes { count: trailing });
        }

        debug!(items = items.len(), size = raw.len(), "decoded bundle");

        Ok(Self {
            headers,
            items,
            raw,
        })
    }

    /// Structural check without decoding items: the buffer length must equal
    /// the header table plus the declared item sizes.
    pub fn verify(raw: &[u8]) -> bool {
        let mut reader = ByteReader::new(raw);
        let Ok(count) = reader.u256_le("item count") else {
            return false;
        };

        let table = count
            .checked_mul(HEADER_SIZE as u64)
            .and_then(|n| n.checked_add(COUNT_SIZE as u64));
        match table {
            Some(table) if table <= raw.len() as u64 => {}
            _ => return false,
        }

        let mut expected = table.unwrap_or(u64::MAX);
        for _ in 0..count {
            let Ok(size) = reader.u256_le("item size") else {
                return false;
            };
            if reader.take(32, "item id").is_err() {
                return false;
            }
            expected = match expected.checked_add(size) {
                Some(total) => total,
                None => return false,
            };
        }

        expected == raw.len() as u64
    }

    /// Verify every item. Stops at the first failure.
    pub fn verify_items(&mut self) -> Result<(), BundleError> {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.verify()
                .map_err(|source| BundleError::Item { index, source })?;
        }
        Ok(())
    }

    pub fn headers(&self) -> &[BundleHeader] {
        &self.headers
    }

    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [DataItem] {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<DataItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.headers.iter().map(|h| &h.id)
    }

    /// The complete encoding.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn into_raw(self) -> Bytes {
        self.raw
    }
}
