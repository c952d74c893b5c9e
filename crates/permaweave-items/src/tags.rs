//! Tags and their Avro encoding.
//!
//! A tag list is encoded as an Avro `array` of `record { name: bytes,
//! value: bytes }`. Writers emit a single block:
//!
//! ```text
//! count || (len(name) || name || len(value) || value)* || 0
//! ```
//!
//! where every integer is a zig-zag varint. An empty list encodes to no
//! bytes at all.

use permaweave_core::crypto::base64url_serde;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ItemError, Result};

/// A name/value pair attached to a data item or transaction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    #[serde(with = "base64url_serde")]
    pub name: Vec<u8>,
    #[serde(with = "base64url_serde")]
    pub value: Vec<u8>,
}

impl Tag {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tag({:?}: {:?})",
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.value)
        )
    }
}

/// Encode tags in the Avro layout.
pub fn serialize_tags(tags: &[Tag]) -> Vec<u8> {
    if tags.is_empty() {
        return Vec::new();
    }

    let size: usize = tags.iter().map(|t| t.name.len() + t.value.len() + 20).sum();
    let mut out = Vec::with_capacity(size + 11);
    write_long(&mut out, tags.len() as i64);
    for tag in tags {
        write_bytes(&mut out, &tag.name);
        write_bytes(&mut out, &tag.value);
    }
    write_long(&mut out, 0);
    out
}

/// Decode an Avro tag array that spans all of `bytes`.
pub fn deserialize_tags(bytes: &[u8]) -> Result<Vec<Tag>> {
    let (tags, consumed) = deserialize_tags_prefix(bytes)?;
    if consumed != bytes.len() {
        return Err(ItemError::Format(format!(
            "{} bytes after tag array",
            bytes.len() - consumed
        )));
    }
    Ok(tags)
}

/// Decode an Avro tag array from the front of `bytes`.
///
/// Returns the tags and the number of bytes consumed. Empty input is an
/// empty tag list.
pub fn deserialize_tags_prefix(bytes: &[u8]) -> Result<(Vec<Tag>, usize)> {
    if bytes.is_empty() {
        return Ok((Vec::new(), 0));
    }

    let mut reader = AvroReader { bytes, pos: 0 };
    let mut tags = Vec::new();

    loop {
        let mut count = reader.read_long()?;
        if count == 0 {
            break;
        }
        if count < 0 {
            // Negative counts are followed by the block's byte size.
            count = count
                .checked_neg()
                .ok_or_else(|| ItemError::Format("tag block count out of range".into()))?;
            reader.read_long()?;
        }
        for _ in 0..count {
            let name = reader.read_bytes()?.to_vec();
            let value = reader.read_bytes()?.to_vec();
            tags.push(Tag { name, value });
        }
    }

    Ok((tags, reader.pos))
}

fn write_long(out: &mut Vec<u8>, value: i64) {
    let mut n = ((value << 1) ^ (value >> 63)) as u64;
    while n >= 0x80 {
        out.push((n as u8) | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_long(out, bytes.len() as i64);
    out.extend_from_slice(bytes);
}

struct AvroReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AvroReader<'a> {
    fn read_long(&mut self) -> Result<i64> {
        let mut n: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = *self
                .bytes
                .get(self.pos)
                .ok_or_else(|| ItemError::Format("truncated tag varint".into()))?;
            self.pos += 1;
            n |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(((n >> 1) as i64) ^ -((n & 1) as i64));
            }
        }
        Err(ItemError::Format("tag varint too long".into()))
    }

    fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_long()?;
        let len = usize::try_from(len)
            .map_err(|_| ItemError::Format(format!("negative tag field length {len}")))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| ItemError::Format("truncated tag field".into()))?;
        let bytes: &'a [u8] = self.bytes;
        let field = &bytes[self.pos..end];
        self.pos = end;
        Ok(field)
    }
}
