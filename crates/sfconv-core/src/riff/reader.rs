//! Little-endian chunk tokenizer with length-budget tracking.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use super::tags;
use crate::error::{SfError, SfResult};

/// Tag and declared payload length of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Four-character identifier.
    pub tag: [u8; 4],
    /// Declared payload length in bytes.
    pub len: u32,
}

impl ChunkHeader {
    /// Size of the header plus payload.
    pub fn total_len(&self) -> u64 {
        u64::from(self.len) + 8
    }
}

/// Remaining length at one nesting level.
///
/// Every nested chunk is charged against its parent; overdrawing the budget
/// means a child claims more bytes than its parent declared.
#[derive(Debug, Clone)]
pub struct Budget {
    label: String,
    remaining: u64,
}

impl Budget {
    /// Creates a budget for a section of `declared` bytes.
    pub fn new(label: impl Into<String>, declared: u64) -> Self {
        Self {
            label: label.into(),
            remaining: declared,
        }
    }

    /// Charges `amount` bytes against the budget.
    pub fn consume(&mut self, amount: u64) -> SfResult<()> {
        if amount > self.remaining {
            return Err(SfError::structure(format!(
                "{}: chunk of {} bytes overruns remaining {} bytes",
                self.label, amount, self.remaining
            )));
        }
        self.remaining -= amount;
        Ok(())
    }

    /// True once every declared byte has been accounted for.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Bytes not yet accounted for.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

/// Reads primitives and chunk headers from a seekable stream.
pub struct ChunkReader<R> {
    inner: R,
    stream_len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wraps a stream positioned anywhere; reading starts at offset zero.
    pub fn new(mut inner: R) -> SfResult<Self> {
        let stream_len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, stream_len })
    }

    /// Total length of the underlying stream.
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Current absolute position.
    pub fn position(&mut self) -> SfResult<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Reads an unsigned byte.
    pub fn read_u8(&mut self) -> SfResult<u8> {
        self.inner
            .read_u8()
            .map_err(|e| SfError::from_read(e, "byte"))
    }

    /// Reads a signed byte.
    pub fn read_i8(&mut self) -> SfResult<i8> {
        self.inner
            .read_i8()
            .map_err(|e| SfError::from_read(e, "byte"))
    }

    /// Reads an unsigned 16-bit little-endian value.
    pub fn read_u16(&mut self) -> SfResult<u16> {
        self.inner
            .read_u16::<LittleEndian>()
            .map_err(|e| SfError::from_read(e, "word"))
    }

    /// Reads a signed 16-bit little-endian value.
    pub fn read_i16(&mut self) -> SfResult<i16> {
        self.inner
            .read_i16::<LittleEndian>()
            .map_err(|e| SfError::from_read(e, "short"))
    }

    /// Reads an unsigned 32-bit little-endian value.
    pub fn read_u32(&mut self) -> SfResult<u32> {
        self.inner
            .read_u32::<LittleEndian>()
            .map_err(|e| SfError::from_read(e, "dword"))
    }

    /// Reads exactly `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> SfResult<Vec<u8>> {
        self.ensure_available(len as u64, "data block")?;
        let mut buf = vec![0u8; len];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| SfError::from_read(e, "data block"))?;
        Ok(buf)
    }

    /// Reads a four-character tag.
    pub fn read_tag(&mut self) -> SfResult<[u8; 4]> {
        let mut tag = [0u8; 4];
        self.inner
            .read_exact(&mut tag)
            .map_err(|e| SfError::from_read(e, "chunk tag"))?;
        Ok(tag)
    }

    /// Reads a tag and fails unless it equals `expected`.
    pub fn expect_tag(&mut self, expected: &[u8; 4]) -> SfResult<()> {
        let tag = self.read_tag()?;
        if &tag != expected {
            return Err(SfError::format(format!(
                "expected '{}', found '{}'",
                tags::display(expected),
                tags::display(&tag)
            )));
        }
        Ok(())
    }

    /// Reads a chunk tag and its declared length.
    pub fn read_chunk_header(&mut self) -> SfResult<ChunkHeader> {
        let tag = self.read_tag()?;
        let len = self.read_u32()?;
        Ok(ChunkHeader { tag, len })
    }

    /// Reads a chunk header whose tag must equal `expected`; returns its length.
    pub fn expect_chunk(&mut self, expected: &[u8; 4]) -> SfResult<u32> {
        self.expect_tag(expected)?;
        self.read_u32()
    }

    /// Reads a fixed-width text field of `width` bytes.
    ///
    /// At most `width - 1` bytes are kept; the field always ends at the first NUL.
    pub fn read_fixed_text(&mut self, width: usize) -> SfResult<String> {
        if width == 0 {
            return Ok(String::new());
        }
        let mut buf = vec![0u8; width];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| SfError::from_read(e, "text field"))?;
        Ok(text_from_bytes(&buf[..width - 1]))
    }

    /// Reads a variable-length string payload of `len` bytes.
    pub fn read_text(&mut self, len: u32) -> SfResult<String> {
        let buf = self.read_bytes(len as usize)?;
        Ok(text_from_bytes(&buf))
    }

    /// Skips `len` bytes forward.
    pub fn skip(&mut self, len: u64) -> SfResult<()> {
        self.ensure_available(len, "skipped chunk")?;
        self.inner.seek(SeekFrom::Current(len as i64))?;
        Ok(())
    }

    /// Moves to an absolute position inside the stream.
    pub fn seek_to(&mut self, pos: u64) -> SfResult<()> {
        if pos > self.stream_len {
            return Err(SfError::truncated(format!(
                "seek to {} past end of stream ({} bytes)",
                pos, self.stream_len
            )));
        }
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Runs `parse` over a leaf chunk payload and checks it consumed exactly `header.len` bytes.
    pub fn read_leaf<T>(
        &mut self,
        header: &ChunkHeader,
        parse: impl FnOnce(&mut Self) -> SfResult<T>,
    ) -> SfResult<T> {
        let start = self.position()?;
        let value = parse(self)?;
        let consumed = self.position()? - start;
        if consumed != u64::from(header.len) {
            return Err(SfError::structure(format!(
                "chunk '{}' declares {} bytes but {} were consumed",
                tags::display(&header.tag),
                header.len,
                consumed
            )));
        }
        Ok(value)
    }

    fn ensure_available(&mut self, len: u64, what: &str) -> SfResult<()> {
        let pos = self.position()?;
        if pos.saturating_add(len) > self.stream_len {
            return Err(SfError::truncated(format!(
                "{} of {} bytes at offset {} exceeds stream length {}",
                what, len, pos, self.stream_len
            )));
        }
        Ok(())
    }
}

/// Decodes a NUL-terminated byte field.
fn text_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
