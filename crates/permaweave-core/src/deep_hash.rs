//! Deep hashing: a SHA-384 digest over nested blobs and lists.
//!
//! ```text
//! blob(b)  = H(H("blob" || len(b)) || H(b))
//! list(xs) = fold(H("list" || len(xs)), |acc, x| H(acc || deep(x)))
//! ```
//!
//! Lengths are rendered as ASCII decimal. The digest is the pre-signature
//! message for both data items and transactions.

use sha2::{Digest, Sha384};
use std::borrow::Cow;
use std::io::{self, Read};

use crate::crypto::Sha384Digest;
use crate::error::Result;

/// A deep-hash input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepHashItem<'a> {
    Blob(Cow<'a, [u8]>),
    List(Vec<DeepHashItem<'a>>),
}

impl<'a> DeepHashItem<'a> {
    pub fn blob(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::Blob(bytes.into())
    }

    pub fn list(items: impl IntoIterator<Item = DeepHashItem<'a>>) -> Self {
        Self::List(items.into_iter().collect())
    }
}

impl<'a> From<&'a [u8]> for DeepHashItem<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Blob(Cow::Borrowed(bytes))
    }
}

impl<'a> From<&'a str> for DeepHashItem<'a> {
    fn from(text: &'a str) -> Self {
        Self::Blob(Cow::Borrowed(text.as_bytes()))
    }
}

impl From<Vec<u8>> for DeepHashItem<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(Cow::Owned(bytes))
    }
}

impl From<String> for DeepHashItem<'static> {
    fn from(text: String) -> Self {
        Self::Blob(Cow::Owned(text.into_bytes()))
    }
}

fn tag(kind: &str, len: u64) -> Sha384Digest {
    Sha384Digest::hash(format!("{kind}{len}").as_bytes())
}

fn fold(acc: Sha384Digest, next: &Sha384Digest) -> Sha384Digest {
    Sha384Digest::hash_pair(acc.as_bytes(), next.as_bytes())
}

/// Deep hash of a value.
pub fn deep_hash(item: &DeepHashItem<'_>) -> Sha384Digest {
    match item {
        DeepHashItem::Blob(bytes) => {
            let head = tag("blob", bytes.len() as u64);
            Sha384Digest::hash_pair(head.as_bytes(), Sha384Digest::hash(bytes).as_bytes())
        }
        DeepHashItem::List(items) => items
            .iter()
            .fold(tag("list", items.len() as u64), |acc, item| {
                fold(acc, &deep_hash(item))
            }),
    }
}

/// Deep hash of a blob of `size` bytes read from `reader`.
///
/// The bytes are streamed through the hasher. A reader that yields fewer
/// than `size` bytes is an `UnexpectedEof` error.
pub fn deep_hash_blob_reader<R: Read>(reader: R, size: u64) -> Result<Sha384Digest> {
    let mut hasher = Sha384::new();
    let copied = io::copy(&mut reader.take(size), &mut hasher)?;
    if copied != size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stream ended after {copied} of {size} bytes"),
        )
        .into());
    }

    let head = tag("blob", size);
    Ok(Sha384Digest::hash_pair(
        head.as_bytes(),
        Sha384Digest::from_hasher(hasher).as_bytes(),
    ))
}

/// Deep hash of the list `head ++ [blob from reader]`.
///
/// Equal to [`deep_hash`] over the same list with the streamed bytes held
/// in memory.
pub fn deep_hash_with_stream<R: Read>(
    head: &[DeepHashItem<'_>],
    reader: R,
    size: u64,
) -> Result<Sha384Digest> {
    let acc = head
        .iter()
        .fold(tag("list", head.len() as u64 + 1), |acc, item| {
            fold(acc, &deep_hash(item))
        });
    let tail = deep_hash_blob_reader(reader, size)?;
    Ok(fold(acc, &tail))
}
