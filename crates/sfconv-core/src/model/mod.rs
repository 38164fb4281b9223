//! In-memory bank graph.
//!
//! The container owns presets, instruments and samples in flat arenas.
//! Cross-references (preset zone to instrument, instrument zone to sample)
//! are integer indices carried by generator amounts.

mod generator;
mod info;
mod preset;
mod sample;
mod text;
mod zone;

pub use generator::*;
pub use info::*;
pub use preset::*;
pub use sample::*;
pub use text::*;
pub use zone::*;
