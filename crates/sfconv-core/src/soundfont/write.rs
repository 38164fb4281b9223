//! Container writing: sample encode, re-addressing, chunk emission.

use log::{debug, info};
use serde::Serialize;
use std::io::{Seek, Write};

use super::SoundFont;
use crate::codec::{self, CodecRegistry, Quality};
use crate::error::SfResult;
use crate::format::{Compression, FileFormat};
use crate::hydra;
use crate::ledger;
use crate::model::{BankInfo, Sample};
use crate::remap::{AddressPlanner, Addressing, FileAddress};
use crate::riff::tags::{self, info as info_tags};
use crate::riff::ChunkWriter;

/// Appended to the bank comment when a lossy bank is written in another format.
pub const LOSSY_SOURCE_CAUTION: &str = "CAUTION: Samples in this file were decompressed \
from a lossy format (Ogg Vorbis). If you want to edit this file, you should get the original \
uncompressed SF2 file.";

/// Output format and encoder quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Container variant to produce.
    pub format: FileFormat,
    /// Encoder quality tier; ignored for SF2.
    pub quality: Quality,
}

impl WriteOptions {
    /// Options for `format` at the default quality.
    pub fn new(format: FileFormat) -> Self {
        Self {
            format,
            quality: Quality::default(),
        }
    }

    /// Sets the quality tier.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Container variant written.
    pub format: FileFormat,
    /// Total bytes written.
    pub bytes_written: u64,
    /// Encoded size of each sample, in file order.
    pub sample_bytes: Vec<usize>,
    /// Whether the verification ledger was emitted.
    pub ledger_written: bool,
}

impl WriteSummary {
    /// Output size as a rounded percentage of `source_len`.
    pub fn size_change_percent(&self, source_len: u64) -> Option<u64> {
        if source_len == 0 {
            return None;
        }
        Some(((self.bytes_written as f64 / source_len as f64) * 100.0).round() as u64)
    }
}

impl SoundFont {
    /// Writes the container in the requested format.
    ///
    /// Each sample's compression bits are retagged to the target. File
    /// addresses are computed into a separate table, so the in-memory model
    /// stays canonical and the container can be written again.
    pub fn write<W: Write + Seek>(
        &mut self,
        writer: W,
        options: &WriteOptions,
        codecs: &CodecRegistry,
    ) -> SfResult<WriteSummary> {
        let target = options.format;
        let compression = target.compression();
        info!("Writing {} ({} quality)", target, options.quality);

        let blobs = self
            .samples
            .iter()
            .map(|s| encode_sample(s, compression, options.quality, codecs))
            .collect::<SfResult<Vec<_>>>()?;

        for sample in &mut self.samples {
            sample.sample_type = sample.sample_type.with_compression(compression);
        }

        let mut planner = AddressPlanner::new(Addressing::for_compression(compression));
        let addresses = self
            .samples
            .iter()
            .zip(&blobs)
            .map(|(s, blob)| planner.place(s, blob.len()))
            .collect::<SfResult<Vec<FileAddress>>>()?;

        let mut w = ChunkWriter::new(writer);
        w.begin_chunk(tags::RIFF)?;
        w.write_tag(tags::SFBK)?;

        w.begin_list(tags::list::INFO)?;
        write_info(&mut w, &self.written_info(target))?;
        w.end_chunk()?;

        w.begin_list(tags::list::SDTA)?;
        w.begin_chunk(tags::sdta::SMPL)?;
        for blob in &blobs {
            w.write_bytes(blob)?;
        }
        w.end_chunk()?;
        w.end_chunk()?;

        w.begin_list(tags::list::PDTA)?;
        let preset_zones = || self.presets.iter().flat_map(|p| p.zones.iter());
        let instrument_zones = || self.instruments.iter().flat_map(|i| i.zones.iter());
        hydra::write_phdr(&mut w, &self.presets)?;
        hydra::write_bag(&mut w, tags::pdta::PBAG, preset_zones())?;
        hydra::write_mods(&mut w, tags::pdta::PMOD, preset_zones())?;
        hydra::write_gens(&mut w, tags::pdta::PGEN, preset_zones())?;
        hydra::write_inst(&mut w, &self.instruments)?;
        hydra::write_bag(&mut w, tags::pdta::IBAG, instrument_zones())?;
        hydra::write_mods(&mut w, tags::pdta::IMOD, instrument_zones())?;
        hydra::write_gens(&mut w, tags::pdta::IGEN, instrument_zones())?;
        hydra::write_shdr(&mut w, &self.samples, &addresses)?;
        let ledger_written = if compression.is_compressed() {
            ledger::write_records(&mut w, &self.samples)?
        } else {
            false
        };
        if ledger_written {
            info!(
                "Attaching verification data for {} samples",
                self.samples.len()
            );
        }
        w.end_chunk()?;

        w.end_chunk()?;
        let bytes_written = w.position()?;
        w.flush()?;
        w.into_inner()?;

        let summary = WriteSummary {
            format: target,
            bytes_written,
            sample_bytes: blobs.iter().map(Vec::len).collect(),
            ledger_written,
        };
        if let Some(percent) = summary.size_change_percent(self.source_len) {
            info!("File size change: {}%", percent);
        }
        Ok(summary)
    }

    /// `INFO` values as they will be written for `target`.
    fn written_info(&self, target: FileFormat) -> BankInfo {
        let mut info = self.info.clone();
        match target {
            FileFormat::Sf3 | FileFormat::Sf4 => info.version.major = target.version_major(),
            FileFormat::Sf2 if self.source_format != FileFormat::Sf2 => {
                info.version.major = target.version_major()
            }
            FileFormat::Sf2 => {}
        }
        if self.source_format == FileFormat::Sf3 && target != FileFormat::Sf3 {
            if !info.comment.is_empty() {
                info.comment.push_str("\n\n");
            }
            info.comment.push_str(LOSSY_SOURCE_CAUTION);
        }
        info
    }
}

fn encode_sample(
    sample: &Sample,
    compression: Compression,
    quality: Quality,
    codecs: &CodecRegistry,
) -> SfResult<Vec<u8>> {
    if !compression.is_compressed() {
        return Ok(codec::pcm_to_bytes(&sample.pcm));
    }
    let blob = codecs
        .get(compression)?
        .encode(&sample.pcm, sample.sample_rate, quality)?;
    let raw_len = sample.pcm.len() * 2;
    if raw_len > 0 {
        debug!(
            "Sample '{}': {} frames -> {} bytes ({:.1}% of raw)",
            sample.name,
            sample.frame_count(),
            blob.len(),
            100.0 * blob.len() as f64 / raw_len as f64
        );
    }
    Ok(blob)
}

fn write_info<W: Write + Seek>(w: &mut ChunkWriter<W>, info: &BankInfo) -> SfResult<()> {
    w.write_chunk_header(info_tags::IFIL, 4)?;
    w.write_u16(info.version.major)?;
    w.write_u16(info.version.minor)?;
    let strings = [
        (info_tags::INAM, &info.name),
        (info_tags::ISNG, &info.engine),
        (info_tags::IPRD, &info.product),
        (info_tags::IENG, &info.engineers),
        (info_tags::ISFT, &info.tools),
        (info_tags::ICRD, &info.creation_date),
        (info_tags::ICMT, &info.comment),
        (info_tags::ICOP, &info.copyright),
    ];
    for (tag, text) in strings {
        if !text.is_empty() {
            w.write_text_chunk(tag, text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::VerificationReport;
    use crate::model::Version;

    fn bank(source_format: FileFormat, comment: &str) -> SoundFont {
        SoundFont {
            info: BankInfo {
                version: Version {
                    major: source_format.version_major(),
                    minor: 4,
                },
                comment: comment.to_string(),
                ..Default::default()
            },
            presets: Vec::new(),
            instruments: Vec::new(),
            samples: Vec::new(),
            source_format,
            source_len: 0,
            verification: VerificationReport::default(),
        }
    }

    #[test]
    fn test_version_major_per_target() {
        let sf2 = bank(FileFormat::Sf2, "");
        assert_eq!(sf2.written_info(FileFormat::Sf3).version.major, 3);
        assert_eq!(sf2.written_info(FileFormat::Sf4).version.major, 4);
        assert_eq!(sf2.written_info(FileFormat::Sf2).version.major, 2);
        assert_eq!(sf2.written_info(FileFormat::Sf2).version.minor, 4);

        let sf4 = bank(FileFormat::Sf4, "");
        assert_eq!(sf4.written_info(FileFormat::Sf2).version.major, 2);
    }

    #[test]
    fn test_caution_only_for_lossy_source() {
        let sf3 = bank(FileFormat::Sf3, "Original notes");
        let comment = sf3.written_info(FileFormat::Sf2).comment;
        assert!(comment.starts_with("Original notes\n\n"));
        assert!(comment.ends_with(LOSSY_SOURCE_CAUTION));
        assert_eq!(sf3.written_info(FileFormat::Sf3).comment, "Original notes");
        // the model itself keeps the original comment
        assert_eq!(sf3.info.comment, "Original notes");

        let sf4 = bank(FileFormat::Sf4, "");
        assert!(sf4.written_info(FileFormat::Sf2).comment.is_empty());
    }

    #[test]
    fn test_size_change_percent() {
        let summary = WriteSummary {
            format: FileFormat::Sf3,
            bytes_written: 250,
            sample_bytes: Vec::new(),
            ledger_written: false,
        };
        assert_eq!(summary.size_change_percent(1000), Some(25));
        assert_eq!(summary.size_change_percent(0), None);
    }
}
