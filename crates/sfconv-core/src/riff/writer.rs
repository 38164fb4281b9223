//! Chunk serializer with back-patched lengths.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Seek, SeekFrom, Write};

use super::tags;
use crate::error::{SfError, SfResult};

/// Writes primitives and nested chunks to a seekable sink.
///
/// Chunk lengths are unknown until the payload is complete, so every open
/// chunk remembers where its length field lives and patches it on close.
pub struct ChunkWriter<W> {
    inner: W,
    open: Vec<u64>,
}

impl<W: Write + Seek> ChunkWriter<W> {
    /// Wraps a sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            open: Vec::new(),
        }
    }

    /// Returns the sink; every chunk must be closed first.
    pub fn into_inner(self) -> SfResult<W> {
        if !self.open.is_empty() {
            return Err(SfError::structure(format!(
                "{} chunk(s) left open at end of write",
                self.open.len()
            )));
        }
        Ok(self.inner)
    }

    /// Current absolute position.
    pub fn position(&mut self) -> SfResult<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Writes an unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> SfResult<()> {
        Ok(self.inner.write_u8(value)?)
    }

    /// Writes a signed byte.
    pub fn write_i8(&mut self, value: i8) -> SfResult<()> {
        Ok(self.inner.write_i8(value)?)
    }

    /// Writes an unsigned 16-bit little-endian value.
    pub fn write_u16(&mut self, value: u16) -> SfResult<()> {
        Ok(self.inner.write_u16::<LittleEndian>(value)?)
    }

    /// Writes a signed 16-bit little-endian value.
    pub fn write_i16(&mut self, value: i16) -> SfResult<()> {
        Ok(self.inner.write_i16::<LittleEndian>(value)?)
    }

    /// Writes an unsigned 32-bit little-endian value.
    pub fn write_u32(&mut self, value: u32) -> SfResult<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    /// Writes raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> SfResult<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    /// Writes a four-character tag.
    pub fn write_tag(&mut self, tag: &[u8; 4]) -> SfResult<()> {
        self.write_bytes(tag)
    }

    /// Writes `text` into a zero-padded field of `width` bytes.
    ///
    /// The text is cut to `width - 1` bytes on a character boundary so the
    /// field is always NUL-terminated.
    pub fn write_fixed_text(&mut self, text: &str, width: usize) -> SfResult<()> {
        let mut buf = vec![0u8; width];
        let limit = width.saturating_sub(1);
        let mut cut = text.len().min(limit);
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        buf[..cut].copy_from_slice(&text.as_bytes()[..cut]);
        self.write_bytes(&buf)
    }

    /// Opens a leaf chunk; its length is patched by [`ChunkWriter::end_chunk`].
    pub fn begin_chunk(&mut self, tag: &[u8; 4]) -> SfResult<()> {
        self.write_tag(tag)?;
        let len_pos = self.position()?;
        self.write_u32(0)?;
        self.open.push(len_pos);
        Ok(())
    }

    /// Opens a grouped `LIST` section of the given kind.
    pub fn begin_list(&mut self, kind: &[u8; 4]) -> SfResult<()> {
        self.begin_chunk(tags::LIST)?;
        self.write_tag(kind)
    }

    /// Closes the innermost open chunk and returns its payload length.
    pub fn end_chunk(&mut self) -> SfResult<u32> {
        let len_pos = self
            .open
            .pop()
            .ok_or_else(|| SfError::structure("end_chunk without an open chunk"))?;
        let end = self.position()?;
        let len = u32::try_from(end - len_pos - 4)
            .map_err(|_| SfError::format("chunk exceeds the 4 GiB RIFF limit"))?;
        self.inner.seek(SeekFrom::Start(len_pos))?;
        self.write_u32(len)?;
        self.inner.seek(SeekFrom::Start(end))?;
        Ok(len)
    }

    /// Writes a leaf chunk with a known fixed payload length.
    pub fn write_chunk_header(&mut self, tag: &[u8; 4], len: u32) -> SfResult<()> {
        self.write_tag(tag)?;
        self.write_u32(len)
    }

    /// Writes a NUL-terminated string chunk padded to an even length.
    pub fn write_text_chunk(&mut self, tag: &[u8; 4], text: &str) -> SfResult<()> {
        let terminated = text.len() + 1;
        let padded = terminated.div_ceil(2) * 2;
        let len = u32::try_from(padded)
            .map_err(|_| SfError::format("text chunk exceeds the 4 GiB RIFF limit"))?;
        self.write_chunk_header(tag, len)?;
        self.write_bytes(text.as_bytes())?;
        for _ in text.len()..padded {
            self.write_u8(0)?;
        }
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> SfResult<()> {
        Ok(self.inner.flush()?)
    }
}
