//! Whole-container read and write.

mod read;
mod write;

pub use write::{WriteOptions, WriteSummary, LOSSY_SOURCE_CAUTION};

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::codec::CodecRegistry;
use crate::error::SfResult;
use crate::format::FileFormat;
use crate::ledger::VerificationReport;
use crate::model::{BankInfo, Instrument, Preset, Sample};

/// A fully loaded SoundFont bank.
///
/// The only way to obtain one is a complete read: every chunk consumed and
/// every sample decoded into canonical PCM.
#[derive(Debug, Clone)]
pub struct SoundFont {
    /// `INFO` metadata as read.
    pub info: BankInfo,
    /// Presets in file order.
    pub presets: Vec<Preset>,
    /// Instruments in file order.
    pub instruments: Vec<Instrument>,
    /// Samples in file order.
    pub samples: Vec<Sample>,
    source_format: FileFormat,
    source_len: u64,
    verification: VerificationReport,
}

impl SoundFont {
    /// Opens and reads a container from disk.
    pub fn open(path: impl AsRef<Path>, codecs: &CodecRegistry) -> SfResult<Self> {
        let path = path.as_ref();
        log::info!("Reading {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file), codecs)
    }

    /// Format the container was read as.
    pub fn source_format(&self) -> FileFormat {
        self.source_format
    }

    /// Size in bytes of the stream the container was read from.
    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Verification outcome of the read.
    pub fn verification(&self) -> &VerificationReport {
        &self.verification
    }

    /// One summary line per preset, in file order.
    pub fn preset_listing(&self) -> Vec<PresetSummary> {
        self.presets
            .iter()
            .enumerate()
            .map(|(index, p)| PresetSummary {
                index,
                bank: p.bank,
                preset: p.preset,
                name: p.name.to_string(),
            })
            .collect()
    }
}

/// Dump line for one preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    /// Position in the preset list.
    pub index: usize,
    /// MIDI bank number.
    pub bank: u16,
    /// MIDI program number.
    pub preset: u16,
    /// Preset name.
    pub name: String,
}

impl fmt::Display for PresetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03} {:04x}-{:02x} {}",
            self.index, self.bank, self.preset, self.name
        )
    }
}
