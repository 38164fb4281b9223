//! FLAC backend for SF4 banks.
//!
//! Encoding goes through `flacenc` at 16 bits per sample, decoding through
//! symphonia's native FLAC reader. The encoder pads the final block, so
//! decoded output is cut back to the frame count in STREAMINFO. An empty
//! sample is stored as an empty stream.

use std::io::Cursor;

use flacenc::component::BitRepr;
use flacenc::error::Verify;
use log::trace;
use sfconv_core::{CodecBridge, Compression, Quality, SfError, SfResult};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

const NAME: &str = "flac";
const BITS_PER_SAMPLE: usize = 16;

/// Fixed block size used for each quality tier.
pub fn block_size(quality: Quality) -> usize {
    match quality {
        Quality::Low => 1152,
        Quality::Medium => 2304,
        Quality::High => 4096,
    }
}

/// FLAC codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacCodec;

impl CodecBridge for FlacCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compression(&self) -> Compression {
        Compression::Flac
    }

    fn encode(&self, pcm: &[i16], sample_rate: u32, quality: Quality) -> SfResult<Vec<u8>> {
        if sample_rate == 0 {
            return Err(SfError::codec(NAME, "sample rate must be non-zero"));
        }
        if pcm.is_empty() {
            return Ok(Vec::new());
        }

        let mut config = flacenc::config::Encoder::default();
        config.block_size = block_size(quality);
        let config = config
            .into_verified()
            .map_err(|(_, err)| SfError::codec(NAME, format!("invalid encoder config: {:?}", err)))?;

        let samples: Vec<i32> = pcm.iter().map(|&s| i32::from(s)).collect();
        let source = flacenc::source::MemSource::from_samples(
            &samples,
            1,
            BITS_PER_SAMPLE,
            sample_rate as usize,
        );
        let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
            .map_err(|err| SfError::codec(NAME, format!("encode failed: {:?}", err)))?;

        let mut sink = flacenc::bitsink::ByteSink::new();
        stream
            .write(&mut sink)
            .map_err(|err| SfError::codec(NAME, format!("stream write failed: {:?}", err)))?;

        let out = sink.as_slice().to_vec();
        trace!("flac: {} frames -> {} bytes", pcm.len(), out.len());
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> SfResult<Vec<i16>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let stream = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
        let mut hint = Hint::new();
        hint.with_extension("flac");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| SfError::codec(NAME, format!("unrecognized stream: {}", err)))?;
        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| SfError::codec(NAME, "stream has no audio track"))?;
        let track_id = track.id;
        let declared_frames = track.codec_params.n_frames;
        if declared_frames == Some(0) {
            return Ok(Vec::new());
        }
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| SfError::codec(NAME, format!("failed to create decoder: {}", err)))?;

        let mut out = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(err) => return Err(SfError::codec(NAME, format!("format error: {}", err))),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|err| SfError::codec(NAME, format!("decode error: {}", err)))?;
            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
            buf.copy_interleaved_ref(decoded);
            out.extend(buf.samples().iter().step_by(channels).copied());
        }
        if let Some(frames) = declared_frames {
            out.truncate(frames as usize);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noise(frames: usize) -> Vec<i16> {
        let mut state = 0x1234_5678u32;
        (0..frames)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 16) as i16
            })
            .collect()
    }

    #[test]
    fn test_block_sizes() {
        assert_eq!(block_size(Quality::Low), 1152);
        assert_eq!(block_size(Quality::Medium), 2304);
        assert_eq!(block_size(Quality::High), 4096);
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let codec = FlacCodec;
        for quality in [Quality::Low, Quality::Medium, Quality::High] {
            let pcm = noise(10_000);
            let encoded = codec.encode(&pcm, 22050, quality).unwrap();
            assert!(encoded.starts_with(b"fLaC"));
            assert_eq!(codec.decode(&encoded).unwrap(), pcm);
        }
    }

    #[test]
    fn test_short_sample_roundtrip() {
        let codec = FlacCodec;
        let pcm = vec![i16::MIN, -1, 0, 1, i16::MAX, 300, -300];
        let encoded = codec.encode(&pcm, 44100, Quality::High).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), pcm);
    }

    #[test]
    fn test_padding_block_is_trimmed() {
        let codec = FlacCodec;
        for frames in [17, 4095, 4097, 10_000] {
            let pcm = noise(frames);
            let encoded = codec.encode(&pcm, 44100, Quality::High).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap().len(), frames);
        }
    }

    #[test]
    fn test_empty_sample_roundtrip() {
        let codec = FlacCodec;
        let encoded = codec.encode(&[], 44100, Quality::High).unwrap();
        assert!(encoded.is_empty());
        assert_eq!(codec.decode(&encoded).unwrap(), Vec::<i16>::new());
    }

    #[test]
    fn test_silence_compresses() {
        let pcm = vec![0i16; 8192];
        let encoded = FlacCodec.encode(&pcm, 44100, Quality::High).unwrap();
        assert!(encoded.len() < pcm.len() * 2 / 10);
    }

    #[test]
    fn test_garbage_input_rejected() {
        let err = FlacCodec.decode(b"not a flac stream").unwrap_err();
        assert_eq!(err.code(), "SF_004");
    }
}
