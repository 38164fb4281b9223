//! Zones and modulators.

use super::generator::{gen_id, Generator};

/// One modulator record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modulator {
    /// Source operator.
    pub src: u16,
    /// Destination generator.
    pub dst: u16,
    /// Modulation depth.
    pub amount: i16,
    /// Secondary source scaling the amount.
    pub amount_src: u16,
    /// Transform applied to the source.
    pub transform: u16,
}

/// Generator and modulator overrides scoped to a preset or instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zone {
    /// Generators in file order.
    pub generators: Vec<Generator>,
    /// Modulators in file order.
    pub modulators: Vec<Modulator>,
}

impl Zone {
    /// Index of the referenced instrument (preset zones).
    pub fn instrument_index(&self) -> Option<usize> {
        self.find(gen_id::INSTRUMENT)
            .map(|g| usize::from(g.amount_word()))
    }

    /// Index of the referenced sample (instrument zones).
    pub fn sample_index(&self) -> Option<usize> {
        self.find(gen_id::SAMPLE_ID)
            .map(|g| usize::from(g.amount_word()))
    }

    fn find(&self, id: u16) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }
}
