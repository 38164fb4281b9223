//! Container variants and sample compression kinds.

use serde::Serialize;
use std::fmt;

/// Compression applied to every sample of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// 16-bit little-endian PCM.
    Raw,
    /// Ogg Vorbis (lossy).
    Vorbis,
    /// FLAC (lossless).
    Flac,
}

impl Compression {
    /// Short lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Compression::Raw => "raw",
            Compression::Vorbis => "vorbis",
            Compression::Flac => "flac",
        }
    }

    /// True for the compressed kinds.
    pub fn is_compressed(self) -> bool {
        self != Compression::Raw
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SoundFont container variant, identified by the `ifil` major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileFormat {
    /// Uncompressed PCM samples.
    Sf2,
    /// Ogg Vorbis compressed samples.
    Sf3,
    /// FLAC compressed samples.
    Sf4,
}

impl FileFormat {
    /// Classifies a container by its version major. Anything other than 3 or 4 reads as SF2.
    pub fn from_version_major(major: u16) -> Self {
        match major {
            3 => FileFormat::Sf3,
            4 => FileFormat::Sf4,
            _ => FileFormat::Sf2,
        }
    }

    /// Version major written for this variant.
    pub fn version_major(self) -> u16 {
        match self {
            FileFormat::Sf2 => 2,
            FileFormat::Sf3 => 3,
            FileFormat::Sf4 => 4,
        }
    }

    /// Sample compression used by this variant.
    pub fn compression(self) -> Compression {
        match self {
            FileFormat::Sf2 => Compression::Raw,
            FileFormat::Sf3 => Compression::Vorbis,
            FileFormat::Sf4 => Compression::Flac,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Sf2 => write!(f, "SF2"),
            FileFormat::Sf3 => write!(f, "SF3"),
            FileFormat::Sf4 => write!(f, "SF4"),
        }
    }
}
