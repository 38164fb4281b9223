//! Samples, sample type bits and verification records.

use std::fmt;

use super::text::Name;
use crate::format::Compression;

/// Sample type bitmask: channel role, compression kind and ROM flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SampleType(pub u16);

impl SampleType {
    /// Mono sample.
    pub const MONO: u16 = 0x0001;
    /// Right channel of a stereo pair.
    pub const RIGHT: u16 = 0x0002;
    /// Left channel of a stereo pair.
    pub const LEFT: u16 = 0x0004;
    /// Linked sample.
    pub const LINKED: u16 = 0x0008;
    /// Ogg Vorbis compressed.
    pub const VORBIS: u16 = 0x0010;
    /// FLAC compressed.
    pub const FLAC: u16 = 0x0020;
    /// Sample lives in ROM.
    pub const ROM: u16 = 0x8000;

    const CHANNEL_MASK: u16 = Self::MONO | Self::RIGHT | Self::LEFT | Self::LINKED;
    const COMPRESSION_MASK: u16 = Self::VORBIS | Self::FLAC;

    /// Raw bit pattern.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// True if any channel-role bit is set.
    pub fn has_channel_role(self) -> bool {
        self.0 & Self::CHANNEL_MASK != 0
    }

    /// Compression kind recorded in the bits.
    pub fn compression(self) -> Compression {
        if self.0 & Self::FLAC != 0 {
            Compression::Flac
        } else if self.0 & Self::VORBIS != 0 {
            Compression::Vorbis
        } else {
            Compression::Raw
        }
    }

    /// Returns a copy with the compression bits replaced.
    pub fn with_compression(self, compression: Compression) -> Self {
        let bits = match compression {
            Compression::Raw => 0,
            Compression::Vorbis => Self::VORBIS,
            Compression::Flac => Self::FLAC,
        };
        Self((self.0 & !Self::COMPRESSION_MASK) | bits)
    }

    /// Returns a copy with the mono bit added.
    pub fn with_mono(self) -> Self {
        Self(self.0 | Self::MONO)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Reference geometry captured before compression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRecord {
    /// Sample name at capture time.
    pub name: Name,
    /// Frame count.
    pub frames: u32,
    /// Loop start, relative to the sample start.
    pub loop_start: u32,
    /// Loop end, relative to the sample start.
    pub loop_end: u32,
}

impl VerificationRecord {
    /// Captures the current geometry of `sample`.
    pub fn capture(sample: &Sample) -> Self {
        Self {
            name: sample.name.clone(),
            frames: sample.frame_count(),
            loop_start: sample.loop_start,
            loop_end: sample.loop_end,
        }
    }

    /// Recorded loop span.
    pub fn loop_span(&self) -> i64 {
        i64::from(self.loop_end) - i64::from(self.loop_start)
    }

    /// True if `sample` has the recorded frame count and loop span.
    pub fn matches(&self, sample: &Sample) -> bool {
        self.frames == sample.frame_count() && self.loop_span() == sample.loop_span()
    }
}

/// One sample header plus its decoded audio.
///
/// After a read every sample is in canonical form: `start == 0`,
/// `end == frame_count()`, and loop points relative to the sample start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    /// Sample name.
    pub name: Name,
    /// First frame.
    pub start: u32,
    /// One past the last frame.
    pub end: u32,
    /// Loop start.
    pub loop_start: u32,
    /// Loop end.
    pub loop_end: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// MIDI key of the recorded pitch.
    pub original_pitch: u8,
    /// Pitch correction in cents.
    pub pitch_correction: i8,
    /// Index of the linked stereo partner.
    pub sample_link: u16,
    /// Type bits.
    pub sample_type: SampleType,
    /// Compressed bytes, present only while passing through a codec.
    pub(crate) encoded: Vec<u8>,
    /// Decoded mono 16-bit PCM.
    pub pcm: Vec<i16>,
    /// Reference geometry, when known.
    pub verification: Option<VerificationRecord>,
}

impl Sample {
    /// Creates a canonical mono sample from PCM.
    pub fn from_pcm(name: &str, pcm: Vec<i16>, sample_rate: u32) -> Self {
        let frames = pcm.len() as u32;
        Self {
            name: Name::new(name),
            start: 0,
            end: frames,
            sample_rate,
            original_pitch: 60,
            sample_type: SampleType(SampleType::MONO),
            pcm,
            ..Default::default()
        }
    }

    /// Number of decoded frames.
    pub fn frame_count(&self) -> u32 {
        self.pcm.len() as u32
    }

    /// Loop end minus loop start.
    pub fn loop_span(&self) -> i64 {
        i64::from(self.loop_end) - i64::from(self.loop_start)
    }
}
