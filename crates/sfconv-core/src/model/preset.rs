//! Presets and instruments.

use super::text::Name;
use super::zone::Zone;

/// A playable preset, addressed by bank and program number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preset {
    /// Preset name.
    pub name: Name,
    /// MIDI program number.
    pub preset: u16,
    /// MIDI bank number.
    pub bank: u16,
    /// Reserved.
    pub library: u32,
    /// Reserved.
    pub genre: u32,
    /// Reserved.
    pub morphology: u32,
    /// Zones in file order.
    pub zones: Vec<Zone>,
}

/// An instrument: a named collection of sample zones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instrument {
    /// Instrument name.
    pub name: Name,
    /// Zones in file order.
    pub zones: Vec<Zone>,
}
