//! Sample addressing between file form and canonical form.
//!
//! Uncompressed containers address samples in frames with absolute loop
//! points. Compressed containers address samples in bytes of the compressed
//! stream and keep loop points relative to the sample start. In memory every
//! sample is canonical: `start = 0`, `end = frames`, loops relative.

use log::warn;

use crate::error::{SfError, SfResult};
use crate::format::Compression;
use crate::model::Sample;

/// Bytes per uncompressed frame.
pub const BYTES_PER_FRAME: u64 = 2;

/// Unit of `start`/`end` in a sample header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Frame offsets, absolute loops.
    Frames,
    /// Byte offsets, relative loops.
    Bytes,
}

impl Addressing {
    /// Addressing used by containers of the given compression.
    pub fn for_compression(compression: Compression) -> Self {
        match compression {
            Compression::Raw => Addressing::Frames,
            Compression::Vorbis | Compression::Flac => Addressing::Bytes,
        }
    }
}

/// Byte range of one sample inside the `smpl` region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRange {
    /// Offset from the start of the `smpl` payload.
    pub offset: u64,
    /// Length in bytes.
    pub len: u64,
}

/// Locates a sample's data in the `smpl` region from its file header.
pub fn source_range(sample: &Sample, addressing: Addressing, region_len: u64) -> SfResult<SourceRange> {
    if sample.end < sample.start {
        return Err(SfError::structure(format!(
            "sample '{}' ends ({}) before it starts ({})",
            sample.name, sample.end, sample.start
        )));
    }
    let unit = match addressing {
        Addressing::Frames => BYTES_PER_FRAME,
        Addressing::Bytes => 1,
    };
    let range = SourceRange {
        offset: u64::from(sample.start) * unit,
        len: u64::from(sample.end - sample.start) * unit,
    };
    if range.offset + range.len > region_len {
        return Err(SfError::structure(format!(
            "sample '{}' spans bytes {}..{} outside the {}-byte sample region",
            sample.name,
            range.offset,
            range.offset + range.len,
            region_len
        )));
    }
    Ok(range)
}

/// Rewrites a freshly decoded sample into canonical addressing.
///
/// Absolute loop points are made relative to the sample start; loop points
/// lying before the start are clamped to zero.
pub fn normalize(sample: &mut Sample, addressing: Addressing) {
    if addressing == Addressing::Frames {
        let start = sample.start;
        if sample.loop_start < start || sample.loop_end < start {
            warn!(
                "Sample '{}' loop {}..{} begins before sample start {}, clamping",
                sample.name, sample.loop_start, sample.loop_end, start
            );
        }
        sample.loop_start = sample.loop_start.saturating_sub(start);
        sample.loop_end = sample.loop_end.saturating_sub(start);
    }
    sample.start = 0;
    sample.end = sample.frame_count();
}

/// Header fields of one sample as written to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileAddress {
    /// First frame or byte.
    pub start: u32,
    /// One past the last frame or byte.
    pub end: u32,
    /// Loop start as stored.
    pub loop_start: u32,
    /// Loop end as stored.
    pub loop_end: u32,
}

/// Assigns cumulative file addresses while sample data is written.
#[derive(Debug)]
pub struct AddressPlanner {
    addressing: Addressing,
    offset: u64,
}

impl AddressPlanner {
    /// Starts at offset zero of the `smpl` region.
    pub fn new(addressing: Addressing) -> Self {
        Self {
            addressing,
            offset: 0,
        }
    }

    /// Bytes placed so far.
    pub fn bytes_placed(&self) -> u64 {
        self.offset
    }

    /// Places the next sample whose encoded data is `written` bytes long.
    ///
    /// Frame addressing promotes the canonical relative loop to absolute;
    /// byte addressing stores it unchanged.
    pub fn place(&mut self, sample: &Sample, written: usize) -> SfResult<FileAddress> {
        let begin = self.offset;
        self.offset += written as u64;
        let address = match self.addressing {
            Addressing::Frames => {
                let start = to_u32(begin / BYTES_PER_FRAME)?;
                let end = to_u32(self.offset / BYTES_PER_FRAME)?;
                FileAddress {
                    start,
                    end,
                    loop_start: to_u32(u64::from(sample.loop_start) + u64::from(start))?,
                    loop_end: to_u32(u64::from(sample.loop_end) + u64::from(start))?,
                }
            }
            Addressing::Bytes => FileAddress {
                start: to_u32(begin)?,
                end: to_u32(self.offset)?,
                loop_start: sample.loop_start,
                loop_end: sample.loop_end,
            },
        };
        Ok(address)
    }
}

fn to_u32(value: u64) -> SfResult<u32> {
    u32::try_from(value)
        .map_err(|_| SfError::format(format!("sample offset {} exceeds the 32-bit limit", value)))
}
