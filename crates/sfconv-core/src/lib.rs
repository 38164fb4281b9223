//! sfconv core
//!
//! Reader, writer and object model for SoundFont banks in their
//! uncompressed (SF2), Ogg Vorbis (SF3) and FLAC (SF4) variants.
//!
//! # Overview
//!
//! A bank is a RIFF `sfbk` form with three sections:
//!
//! - **INFO** - version and descriptive strings
//! - **sdta** - one shared region holding every sample's audio
//! - **pdta** - presets, instruments, zones, generators, modulators and sample headers
//!
//! Reading walks the chunk tree, builds the preset/instrument/sample graph,
//! decodes every sample to 16-bit PCM and rewrites sample addressing into a
//! single canonical form. Writing encodes each sample for the target format
//! and recomputes file addresses without touching the in-memory model.
//!
//! # Example
//!
//! ```ignore
//! use sfconv_core::{CodecRegistry, FileFormat, SoundFont, WriteOptions};
//!
//! let codecs = CodecRegistry::empty();
//! let mut bank = SoundFont::open("piano.sf2", &codecs)?;
//! for line in bank.preset_listing() {
//!     println!("{}", line);
//! }
//! let out = std::fs::File::create("piano-copy.sf2")?;
//! bank.write(out, &WriteOptions::new(FileFormat::Sf2), &codecs)?;
//! ```
//!
//! # Crate Structure
//!
//! - [`riff`] - chunk tokenizer and serializer
//! - [`model`] - presets, instruments, zones, samples
//! - [`hydra`] - `pdta` graph builder and writer
//! - [`remap`] - sample addressing between file and canonical form
//! - [`ledger`] - `shdX` verification records
//! - [`codec`] - encode/decode contract and backend registry
//! - [`SoundFont`] - whole-container read and write

pub mod codec;
pub mod error;
pub mod format;
pub mod hydra;
pub mod ledger;
pub mod model;
pub mod remap;
pub mod riff;
pub mod soundfont;

// Re-export main types at crate root
pub use codec::{CodecBridge, CodecRegistry, CodecRegistryBuilder, Quality};
pub use error::{ErrorKind, SfError, SfResult};
pub use format::{Compression, FileFormat};
pub use ledger::{VerificationFailure, VerificationReport};
pub use soundfont::{PresetSummary, SoundFont, WriteOptions, WriteSummary};
