//! CLI argument definitions and flag resolution.
//!
//! Flags follow the classic single-dash style: `-zf1`, `-xd` and `-zo` are
//! clustered short flags, each character parsed on its own.

use clap::{Parser, ValueEnum};
use sfconv_core::{FileFormat, Quality, WriteOptions};
use std::path::PathBuf;

/// sfconv - SoundFont conversion and compression
#[derive(Parser, Debug)]
#[command(name = "sfconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Expand to uncompressed SF2
    #[arg(short = 'x', long, conflicts_with_all = ["vorbis", "flac", "compress"])]
    pub expand: bool,

    /// Compress (Ogg Vorbis unless -f is also given)
    #[arg(short = 'z', hide = true)]
    pub compress: bool,

    /// Compress with Ogg Vorbis (SF3)
    #[arg(short = 'o', long, conflicts_with = "flac")]
    pub vorbis: bool,

    /// Compress with FLAC (SF4)
    #[arg(short = 'f', long)]
    pub flac: bool,

    /// Dump presets
    #[arg(short = 'd', long)]
    pub dump: bool,

    /// Render the preset dump as JSON
    #[arg(long, requires = "dump")]
    pub json: bool,

    /// Low quality
    #[arg(short = '0', conflicts_with_all = ["medium", "high", "quality"])]
    pub low: bool,

    /// Medium quality
    #[arg(short = '1', conflicts_with_all = ["high", "quality"])]
    pub medium: bool,

    /// High quality (default)
    #[arg(short = '2', conflicts_with = "quality")]
    pub high: bool,

    /// Encoder quality tier
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Source bank
    pub infile: PathBuf,

    /// Destination bank (required for conversions)
    pub outfile: Option<PathBuf>,
}

/// Quality tier as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityArg {
    /// Smallest output
    Low,
    /// Balanced
    Medium,
    /// Best fidelity
    High,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
        }
    }
}

/// What one invocation will do, in order: dump, then convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Dump presets; `true` renders JSON.
    pub dump: Option<bool>,
    /// Conversion target and output path.
    pub convert: Option<(WriteOptions, PathBuf)>,
}

/// Flag combinations clap cannot reject on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// Neither a conversion nor a dump was requested.
    NoAction,
    /// A conversion was requested without an output file.
    MissingOutput,
}

impl Cli {
    /// Conversion target selected by the flags, if any.
    pub fn target(&self) -> Option<FileFormat> {
        if self.expand {
            Some(FileFormat::Sf2)
        } else if self.flac {
            Some(FileFormat::Sf4)
        } else if self.vorbis || self.compress {
            Some(FileFormat::Sf3)
        } else {
            None
        }
    }

    /// Quality tier selected by the flags.
    pub fn quality_tier(&self) -> Quality {
        if let Some(q) = self.quality {
            q.into()
        } else if self.low {
            Quality::Low
        } else if self.medium {
            Quality::Medium
        } else {
            Quality::High
        }
    }

    /// Resolves the flags into a plan.
    pub fn plan(&self) -> Result<Plan, PlanError> {
        let convert = match self.target() {
            Some(format) => {
                let out = self.outfile.clone().ok_or(PlanError::MissingOutput)?;
                let options = WriteOptions::new(format).with_quality(self.quality_tier());
                Some((options, out))
            }
            None => None,
        };
        let dump = self.dump.then_some(self.json);
        if convert.is_none() && dump.is_none() {
            return Err(PlanError::NoAction);
        }
        Ok(Plan { dump, convert })
    }
}
