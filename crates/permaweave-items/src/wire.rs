//! Fixed-width field helpers shared by the item and bundle codecs.

use std::io::{self, Read, Write};

/// Default buffer size when copying a streamed payload.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Cursor over an encoded record. Every read is bounds-checked.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], String> {
        let bytes: &'a [u8] = self.bytes;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                format!(
                    "{field} needs {len} bytes at offset {}, {} available",
                    self.pos,
                    bytes.len() - self.pos
                )
            })?;
        let out = &bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn u8(&mut self, field: &str) -> Result<u8, String> {
        Ok(self.take(1, field)?[0])
    }

    pub(crate) fn u16_le(&mut self, field: &str) -> Result<u16, String> {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(self.take(2, field)?);
        Ok(u16::from_le_bytes(buf))
    }

    pub(crate) fn u64_le(&mut self, field: &str) -> Result<u64, String> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, field)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub(crate) fn u256_le(&mut self, field: &str) -> Result<u64, String> {
        decode_u256_le(self.take(32, field)?).ok_or_else(|| format!("{field} exceeds 64 bits"))
    }

    pub(crate) fn array32(&mut self, field: &str) -> Result<[u8; 32], String> {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(self.take(32, field)?);
        Ok(buf)
    }
}

/// 32-byte little-endian integer with `value` in the low 8 bytes.
pub(crate) fn encode_u256_le(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..8].copy_from_slice(&value.to_le_bytes());
    out
}

/// Inverse of [`encode_u256_le`]; `None` if the high bytes are set.
pub(crate) fn decode_u256_le(bytes: &[u8]) -> Option<u64> {
    if bytes.len() != 32 || bytes[8..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[..8]);
    Some(u64::from_le_bytes(low))
}

/// Copy exactly `size` bytes from `reader` to `writer`.
pub(crate) fn copy_exact<R, W>(reader: &mut R, writer: &mut W, size: u64, buffer_size: usize) -> io::Result<()>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut remaining = size;
    while remaining > 0 {
        let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let read = match reader.read(&mut buf[..want]) {
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended {remaining} bytes early"),
            ));
        }
        writer.write_all(&buf[..read])?;
        remaining -= read as u64;
    }
    Ok(())
}
