//! Ogg Vorbis backend for SF3 banks.
//!
//! Each sample becomes a complete mono Ogg stream. Encoding uses quality-based
//! VBR; the decoder returns exactly the frame count the stream declares, so
//! only lossy sample values differ from the source.

use std::io::Cursor;
use std::num::{NonZeroU32, NonZeroU8};

use log::trace;
use sfconv_core::{CodecBridge, Compression, Quality, SfError, SfResult};
use vorbis_rs::{VorbisBitrateManagementStrategy, VorbisDecoder, VorbisEncoderBuilder};

use crate::pcm;

const NAME: &str = "vorbis";

/// Frames handed to the encoder per analysis block.
const BLOCK_FRAMES: usize = 4096;

/// libvorbis VBR quality target for each tier.
pub fn target_quality(quality: Quality) -> f32 {
    match quality {
        Quality::Low => 0.2,
        Quality::Medium => 0.6,
        Quality::High => 1.0,
    }
}

/// Ogg Vorbis codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct VorbisCodec;

impl CodecBridge for VorbisCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compression(&self) -> Compression {
        Compression::Vorbis
    }

    fn encode(&self, pcm: &[i16], sample_rate: u32, quality: Quality) -> SfResult<Vec<u8>> {
        let rate = NonZeroU32::new(sample_rate)
            .ok_or_else(|| SfError::codec(NAME, "sample rate must be non-zero"))?;
        let mono = NonZeroU8::MIN;

        let samples = pcm::to_float(pcm);
        let mut out = Vec::new();
        {
            let mut builder =
                VorbisEncoderBuilder::new(rate, mono, &mut out).map_err(codec_err)?;
            builder.bitrate_management_strategy(VorbisBitrateManagementStrategy::QualityVbr {
                target_quality: target_quality(quality),
            });
            let mut encoder = builder.build().map_err(codec_err)?;
            for block in samples.chunks(BLOCK_FRAMES) {
                encoder.encode_audio_block([block]).map_err(codec_err)?;
            }
            encoder.finish().map_err(codec_err)?;
        }

        trace!("vorbis: {} frames -> {} bytes", pcm.len(), out.len());
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> SfResult<Vec<i16>> {
        let mut decoder = VorbisDecoder::new(Cursor::new(data)).map_err(codec_err)?;
        let mut out = Vec::new();
        while let Some(block) = decoder.decode_audio_block().map_err(codec_err)? {
            let channels = block.samples();
            let first = channels
                .first()
                .ok_or_else(|| SfError::codec(NAME, "stream has no channels"))?;
            out.extend(pcm::from_float(first));
        }
        Ok(out)
    }
}

fn codec_err(err: impl std::fmt::Display) -> SfError {
    SfError::codec(NAME, err.to_string())
}
