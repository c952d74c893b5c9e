//! Signed data items.
//!
//! ## Layout
//!
//! ```text
//! signature_type   2 bytes, little-endian
//! signature        table width
//! owner            table width
//! target flag      1 byte, followed by 32 bytes when 1
//! anchor flag      1 byte, followed by 32 bytes when 1
//! tag count        8 bytes, little-endian
//! tag bytes length 8 bytes, little-endian
//! tags             Avro, see [`crate::tags`]
//! payload          everything that remains
//! ```
//!
//! ## Signing
//!
//! The signed message is the deep hash of
//! `["dataitem", "1", signature_type, owner, target, anchor, tags, payload]`
//! with the signature type rendered in decimal and absent target or anchor
//! hashed as empty blobs. The item id is `SHA-256(signature)`.

use bytes::Bytes;
use permaweave_core::{deep_hash, deep_hash_with_stream, DeepHashItem, ItemId, Sha384Digest};
use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::{debug, trace, warn};

use crate::error::{ItemError, Result};
use crate::signature::SignatureType;
use crate::signer::{verify_signature, Signer};
use crate::tags::{deserialize_tags, serialize_tags, Tag};
use crate::validation::{anchor_field, validate_anchor, validate_tags};
use crate::wire::{copy_exact, ByteReader, DEFAULT_COPY_BUFFER_SIZE};

/// A payload source that can be rewound for each pass.
pub trait PayloadSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> PayloadSource for T {}

/// The bytes a data item carries.
pub enum Payload {
    InMemory(Bytes),
    /// Read from `source` on each pass. `size` bytes starting at offset 0.
    Streamed {
        source: Box<dyn PayloadSource>,
        size: u64,
    },
}

impl Payload {
    pub fn size(&self) -> u64 {
        match self {
            Self::InMemory(data) => data.len() as u64,
            Self::Streamed { size, .. } => *size,
        }
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, Self::Streamed { .. })
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory(data) => write!(f, "InMemory({} bytes)", data.len()),
            Self::Streamed { size, .. } => write!(f, "Streamed({size} bytes)"),
        }
    }
}

/// A signed data item.
pub struct DataItem {
    signature_type: SignatureType,
    signature: Vec<u8>,
    owner: Vec<u8>,
    target: Option<[u8; 32]>,
    anchor: Option<[u8; 32]>,
    tags: Vec<Tag>,
    payload: Payload,
    /// Encoded fields up to, not including, the payload.
    header: Vec<u8>,
    id: ItemId,
}

impl DataItem {
    /// Decode an encoded data item.
    ///
    /// Checks layout only. Call [`DataItem::verify`] to check the signature
    /// and tag policy.
    pub fn decode(raw: impl Into<Bytes>) -> Result<Self> {
        let raw = raw.into();
        let mut reader = ByteReader::new(&raw);

        let signature_type = SignatureType::from_u16(reader.u16_le("signature type").map_err(ItemError::Format)?)?;
        let config = signature_type.config();
        let signature = reader
            .take(config.signature_length, "signature")
            .map_err(ItemError::Format)?
            .to_vec();
        let owner = reader
            .take(config.public_key_length, "owner")
            .map_err(ItemError::Format)?
            .to_vec();
        let target = read_optional(&mut reader, "target")?;
        let anchor = read_optional(&mut reader, "anchor")?;

        let tag_count = reader.u64_le("tag count").map_err(ItemError::Format)?;
        let tag_bytes_len = reader.u64_le("tag bytes length").map_err(ItemError::Format)?;
        let tag_bytes_len = usize::try_from(tag_bytes_len)
            .map_err(|_| ItemError::Format(format!("tag bytes length {tag_bytes_len} too large")))?;
        let tag_bytes = reader.take(tag_bytes_len, "tags").map_err(ItemError::Format)?;
        let tags = deserialize_tags(tag_bytes)?;
        if tags.len() as u64 != tag_count {
            return Err(ItemError::Format(format!(
                "declared {tag_count} tags, decoded {}",
                tags.len()
            )));
        }

        let header_len = reader.position();
        let header = raw[..header_len].to_vec();
        let payload = raw.slice(header_len..);
        let id = ItemId::from_signature(&signature);

        trace!(id = %id, signature_type = %signature_type, size = raw.len(), "decoded data item");

        Ok(Self {
            signature_type,
            signature,
            owner,
            target,
            anchor,
            tags,
            payload: Payload::InMemory(payload),
            header,
            id,
        })
    }

    /// Check the id, the signature, and tag and anchor policy, in that order.
    pub fn verify(&mut self) -> Result<()> {
        // 1. Id commits to the signature
        if ItemId::from_signature(&self.signature) != self.id {
            warn!(id = %self.id, "data item id does not match signature");
            return Err(ItemError::IdMismatch);
        }

        // 2. Signature over the deep hash
        let message = signature_data(
            self.signature_type,
            &self.owner,
            self.target.as_ref(),
            self.anchor.as_ref(),
            &serialize_tags(&self.tags),
            &mut self.payload,
        )?;
        if let Err(e) = verify_signature(self.signature_type, &self.owner, message.as_bytes(), &self.signature) {
            debug!(id = %self.id, error = %e, "data item signature rejected");
            return Err(e);
        }

        // 3. Tag and anchor policy
        validate_tags(&self.tags)
            .and_then(|()| validate_anchor(self.anchor.as_ref().map_or(&[][..], |a| &a[..])))
            .map_err(|e| {
                debug!(id = %self.id, error = %e, "data item failed validation");
                ItemError::Validation(e)
            })?;

        trace!(id = %self.id, streamed = self.payload.is_streamed(), "verified data item");
        Ok(())
    }

    /// The complete encoding: header followed by payload.
    ///
    /// A streamed payload is read into memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let capacity = usize::try_from(self.raw_len()).unwrap_or(0);
        let mut out = Vec::with_capacity(capacity);
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Write the complete encoding to `sink`. Returns the bytes written.
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        self.write_to_with_buffer(sink, DEFAULT_COPY_BUFFER_SIZE)
    }

    /// [`DataItem::write_to`] with an explicit copy buffer size for streamed
    /// payloads.
    pub fn write_to_with_buffer<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
        buffer_size: usize,
    ) -> Result<u64> {
        sink.write_all(&self.header)?;
        match &mut self.payload {
            Payload::InMemory(data) => sink.write_all(data)?,
            Payload::Streamed { source, size } => {
                source.seek(SeekFrom::Start(0))?;
                copy_exact(source.as_mut(), sink, *size, buffer_size)?;
            }
        }
        Ok(self.raw_len())
    }

    /// Length of the complete encoding.
    pub fn raw_len(&self) -> u64 {
        self.header.len() as u64 + self.payload.size()
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    pub fn target(&self) -> Option<&[u8; 32]> {
        self.target.as_ref()
    }

    pub fn anchor(&self) -> Option<&[u8; 32]> {
        self.anchor.as_ref()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// In-memory payload bytes, `None` when streamed.
    pub fn data(&self) -> Option<&Bytes> {
        match &self.payload {
            Payload::InMemory(data) => Some(data),
            Payload::Streamed { .. } => None,
        }
    }

    /// Encoded fields before the payload.
    pub fn header(&self) -> &[u8] {
        &self.header
    }
}

impl fmt::Debug for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataItem")
            .field("id", &self.id)
            .field("signature_type", &self.signature_type)
            .field("tags", &self.tags.len())
            .field("payload", &self.payload)
            .finish()
    }
}

/// Builder for signed data items.
pub struct DataItemBuilder {
    target: Option<[u8; 32]>,
    anchor: Option<Vec<u8>>,
    tags: Vec<Tag>,
    payload: Payload,
}

impl DataItemBuilder {
    /// Start an item with an in-memory payload.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_payload(Payload::InMemory(data.into()))
    }

    /// Start an item whose `size`-byte payload is read from `source` on each
    /// pass.
    pub fn streamed<R: Read + Seek + Send + 'static>(source: R, size: u64) -> Self {
        Self::with_payload(Payload::Streamed {
            source: Box::new(source),
            size,
        })
    }

    fn with_payload(payload: Payload) -> Self {
        Self {
            target: None,
            anchor: None,
            tags: Vec::new(),
            payload,
        }
    }

    pub fn target(mut self, target: [u8; 32]) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the anchor. Must be 32 bytes; checked when signing.
    pub fn anchor(mut self, anchor: impl Into<Vec<u8>>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn tag(mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.tags.push(Tag::new(name, value));
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Sign and encode the item.
    pub fn sign<S: Signer + ?Sized>(mut self, signer: &S) -> Result<DataItem> {
        let signature_type = signer.signature_type();
        let config = signature_type.config();

        let anchor = self.anchor.as_deref().map(anchor_field).transpose()?;

        let owner = signer.public_key();
        if owner.len() != config.public_key_length {
            return Err(ItemError::OwnerLength {
                expected: config.public_key_length,
                actual: owner.len(),
            });
        }

        let tag_bytes = serialize_tags(&self.tags);
        let message = signature_data(
            signature_type,
            &owner,
            self.target.as_ref(),
            anchor.as_ref(),
            &tag_bytes,
            &mut self.payload,
        )?;

        let signature = signer.sign(message.as_bytes())?;
        if signature.len() != config.signature_length {
            return Err(ItemError::SignatureLength {
                expected: config.signature_length,
                actual: signature.len(),
            });
        }

        let header = encode_header(
            signature_type,
            &signature,
            &owner,
            self.target.as_ref(),
            anchor.as_ref(),
            self.tags.len() as u64,
            &tag_bytes,
        );
        let id = ItemId::from_signature(&signature);

        debug!(
            id = %id,
            signature_type = %signature_type,
            streamed = self.payload.is_streamed(),
            size = header.len() as u64 + self.payload.size(),
            "signed data item"
        );

        Ok(DataItem {
            signature_type,
            signature,
            owner,
            target: self.target,
            anchor,
            tags: self.tags,
            payload: self.payload,
            header,
            id,
        })
    }
}

fn read_optional(reader: &mut ByteReader<'_>, field: &str) -> Result<Option<[u8; 32]>> {
    match reader.u8(field).map_err(ItemError::Format)? {
        0 => Ok(None),
        1 => Ok(Some(reader.array32(field).map_err(ItemError::Format)?)),
        flag => Err(ItemError::Format(format!("invalid {field} flag {flag}"))),
    }
}

fn encode_header(
    signature_type: SignatureType,
    signature: &[u8],
    owner: &[u8],
    target: Option<&[u8; 32]>,
    anchor: Option<&[u8; 32]>,
    tag_count: u64,
    tag_bytes: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + signature.len() + owner.len() + 66 + 16 + tag_bytes.len());
    out.extend_from_slice(&signature_type.as_u16().to_le_bytes());
    out.extend_from_slice(signature);
    out.extend_from_slice(owner);
    for field in [target, anchor] {
        match field {
            Some(bytes) => {
                out.push(1);
                out.extend_from_slice(bytes);
            }
            None => out.push(0),
        }
    }
    out.extend_from_slice(&tag_count.to_le_bytes());
    out.extend_from_slice(&(tag_bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(tag_bytes);
    out
}

/// Deep hash of the signed fields. Rewinds a streamed payload first.
fn signature_data(
    signature_type: SignatureType,
    owner: &[u8],
    target: Option<&[u8; 32]>,
    anchor: Option<&[u8; 32]>,
    tag_bytes: &[u8],
    payload: &mut Payload,
) -> Result<Sha384Digest> {
    let type_tag = signature_type.to_string();
    let mut fields: Vec<DeepHashItem<'_>> = vec![
        "dataitem".into(),
        "1".into(),
        type_tag.as_str().into(),
        owner.into(),
        target.map_or(&[][..], |t| &t[..]).into(),
        anchor.map_or(&[][..], |a| &a[..]).into(),
        tag_bytes.into(),
    ];

    match payload {
        Payload::InMemory(data) => {
            fields.push(DeepHashItem::from(&data[..]));
            Ok(deep_hash(&DeepHashItem::List(fields)))
        }
        Payload::Streamed { source, size } => {
            source.seek(SeekFrom::Start(0))?;
            Ok(deep_hash_with_stream(&fields, source.as_mut(), *size)?)
        }
    }
}
