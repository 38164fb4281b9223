//! Container reading: chunk walk, graph build, sample decode.

use log::{debug, info, warn};
use std::io::{Read, Seek};

use super::SoundFont;
use crate::codec::{self, CodecRegistry};
use crate::error::{SfError, SfResult};
use crate::format::{Compression, FileFormat};
use crate::hydra::HydraBuilder;
use crate::ledger;
use crate::model::{BankInfo, Sample, VerificationRecord, Version};
use crate::remap::{self, Addressing};
use crate::riff::tags::{self, info as info_tags};
use crate::riff::{Budget, ChunkHeader, ChunkReader};

/// Location of the `smpl` payload.
#[derive(Debug, Clone, Copy)]
struct SampleRegion {
    pos: u64,
    len: u64,
}

/// State accumulated while walking chunks.
#[derive(Default)]
struct ReadState {
    info: BankInfo,
    version_seen: bool,
    region: Option<SampleRegion>,
    hydra: HydraBuilder,
}

impl ReadState {
    fn read_leaf<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.hydra.read_chunk(r, header)? {
            return Ok(());
        }
        let info = &mut self.info;
        let text = match &header.tag {
            info_tags::IFIL => {
                info.version = r.read_leaf(header, |r| {
                    Ok(Version {
                        major: r.read_u16()?,
                        minor: r.read_u16()?,
                    })
                })?;
                self.version_seen = true;
                return Ok(());
            }
            info_tags::INAM => &mut info.name,
            info_tags::ISNG => &mut info.engine,
            info_tags::IPRD => &mut info.product,
            info_tags::IENG => &mut info.engineers,
            info_tags::ISFT => &mut info.tools,
            info_tags::ICRD => &mut info.creation_date,
            info_tags::ICMT => &mut info.comment,
            info_tags::ICOP => &mut info.copyright,
            tags::sdta::SMPL => {
                if self.region.is_some() {
                    return Err(SfError::structure("duplicate 'smpl' chunk"));
                }
                let pos = r.position()?;
                r.skip(u64::from(header.len))?;
                self.region = Some(SampleRegion {
                    pos,
                    len: u64::from(header.len),
                });
                return Ok(());
            }
            info_tags::IROM | info_tags::IVER => {
                debug!("Skipping ROM chunk '{}'", tags::display(&header.tag));
                return r.skip(u64::from(header.len));
            }
            other => {
                return Err(SfError::format(format!(
                    "unknown chunk '{}'",
                    tags::display(other)
                )))
            }
        };
        *text = r.read_text(header.len)?;
        Ok(())
    }
}

impl SoundFont {
    /// Reads a container from a seekable stream.
    ///
    /// Any structural problem aborts the read; no partial container is returned.
    /// Decoding follows the container's format version, not per-sample bits.
    pub fn read<R: Read + Seek>(reader: R, codecs: &CodecRegistry) -> SfResult<Self> {
        let mut r = ChunkReader::new(reader)?;
        let source_len = r.stream_len();

        let riff_len = r.expect_chunk(tags::RIFF)?;
        if u64::from(riff_len) + 8 > source_len {
            return Err(SfError::truncated(format!(
                "RIFF declares {} bytes but the stream holds {}",
                u64::from(riff_len) + 8,
                source_len
            )));
        }
        let mut riff = Budget::new("RIFF", u64::from(riff_len));
        r.expect_tag(tags::SFBK)?;
        riff.consume(4)?;

        let mut state = ReadState::default();
        while !riff.is_exhausted() {
            let list_len = r.expect_chunk(tags::LIST)?;
            riff.consume(u64::from(list_len) + 8)?;
            let kind = r.read_tag()?;
            if ![tags::list::INFO, tags::list::SDTA, tags::list::PDTA].contains(&&kind) {
                return Err(SfError::format(format!(
                    "unknown section 'LIST {}'",
                    tags::display(&kind)
                )));
            }
            let label = format!("LIST {}", tags::display(&kind));
            let mut list = Budget::new(label, u64::from(list_len));
            list.consume(4)?;
            while !list.is_exhausted() {
                let header = r.read_chunk_header()?;
                list.consume(header.total_len())?;
                state.read_leaf(&mut r, &header)?;
            }
        }

        if !state.version_seen {
            warn!(
                "No 'ifil' chunk, assuming version {}.{}",
                state.info.version.major, state.info.version.minor
            );
        }
        let source_format = FileFormat::from_version_major(state.info.version.major);
        let (presets, instruments, mut samples) = state.hydra.finish()?;
        info!(
            "{} bank: {} presets, {} instruments, {} samples",
            source_format,
            presets.len(),
            instruments.len(),
            samples.len()
        );

        let compression = source_format.compression();
        if !samples.is_empty() {
            let region = state
                .region
                .ok_or_else(|| SfError::structure("samples declared without a 'smpl' chunk"))?;
            load_samples(&mut r, region, &mut samples, compression, codecs)?;
        }

        let verification = ledger::verify(&samples);
        if verification.checked > 0 && verification.is_clean() {
            debug!("All {} samples passed verification", verification.checked);
        }

        Ok(SoundFont {
            info: state.info,
            presets,
            instruments,
            samples,
            source_format,
            source_len,
            verification,
        })
    }
}

fn load_samples<R: Read + Seek>(
    r: &mut ChunkReader<R>,
    region: SampleRegion,
    samples: &mut [Sample],
    compression: Compression,
    codecs: &CodecRegistry,
) -> SfResult<()> {
    let addressing = Addressing::for_compression(compression);
    let backend = if compression.is_compressed() {
        Some(codecs.get(compression)?)
    } else {
        None
    };
    for sample in samples.iter_mut() {
        let range = remap::source_range(sample, addressing, region.len)?;
        r.seek_to(region.pos + range.offset)?;
        sample.encoded = r.read_bytes(range.len as usize)?;
        sample.pcm = match backend {
            Some(bridge) => bridge.decode(&sample.encoded)?,
            None => codec::pcm_from_bytes(&sample.encoded)?,
        };
        let encoded_len = std::mem::take(&mut sample.encoded).len();
        remap::normalize(sample, addressing);
        if compression == Compression::Raw {
            sample.verification = Some(VerificationRecord::capture(sample));
        }
        debug!(
            "Sample '{}': {} bytes -> {} frames",
            sample.name,
            encoded_len,
            sample.frame_count()
        );
    }
    Ok(())
}
