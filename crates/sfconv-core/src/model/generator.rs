//! Zone generators.

/// Generator identifiers with special handling.
pub mod gen_id {
    /// Preset zone reference to an instrument.
    pub const INSTRUMENT: u16 = 41;
    /// Key range as a low/high byte pair.
    pub const KEY_RANGE: u16 = 43;
    /// Velocity range as a low/high byte pair.
    pub const VEL_RANGE: u16 = 44;
    /// Instrument zone reference to a sample.
    pub const SAMPLE_ID: u16 = 53;
}

/// Generator amount; the representation depends on the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorAmount {
    /// Low/high byte pair (key and velocity ranges).
    Range {
        /// Lower bound.
        lo: u8,
        /// Upper bound.
        hi: u8,
    },
    /// Unsigned word (instrument reference).
    Unsigned(u16),
    /// Signed word (everything else).
    Signed(i16),
}

/// How the amount word of a given identifier is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    /// Two bytes, low then high.
    Range,
    /// Unsigned 16-bit.
    Unsigned,
    /// Signed 16-bit.
    Signed,
}

impl AmountKind {
    /// Layout used by generator `id`.
    pub fn of(id: u16) -> Self {
        match id {
            gen_id::KEY_RANGE | gen_id::VEL_RANGE => AmountKind::Range,
            gen_id::INSTRUMENT => AmountKind::Unsigned,
            _ => AmountKind::Signed,
        }
    }
}

/// One generator record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    /// Generator identifier.
    pub id: u16,
    /// Amount in the layout dictated by `id`.
    pub amount: GeneratorAmount,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            id: 0,
            amount: GeneratorAmount::Signed(0),
        }
    }
}

impl Generator {
    /// Creates a generator with a signed amount.
    pub fn signed(id: u16, value: i16) -> Self {
        Self {
            id,
            amount: GeneratorAmount::Signed(value),
        }
    }

    /// Creates a key or velocity range generator.
    pub fn range(id: u16, lo: u8, hi: u8) -> Self {
        Self {
            id,
            amount: GeneratorAmount::Range { lo, hi },
        }
    }

    /// Creates an instrument reference.
    pub fn instrument(index: u16) -> Self {
        Self {
            id: gen_id::INSTRUMENT,
            amount: GeneratorAmount::Unsigned(index),
        }
    }

    /// Creates a sample reference.
    pub fn sample(index: u16) -> Self {
        Self {
            id: gen_id::SAMPLE_ID,
            amount: GeneratorAmount::Signed(index as i16),
        }
    }

    /// The amount reinterpreted as an unsigned word.
    pub fn amount_word(&self) -> u16 {
        match self.amount {
            GeneratorAmount::Range { lo, hi } => u16::from(lo) | (u16::from(hi) << 8),
            GeneratorAmount::Unsigned(v) => v,
            GeneratorAmount::Signed(v) => v as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_kind_by_id() {
        assert_eq!(AmountKind::of(gen_id::KEY_RANGE), AmountKind::Range);
        assert_eq!(AmountKind::of(gen_id::VEL_RANGE), AmountKind::Range);
        assert_eq!(AmountKind::of(gen_id::INSTRUMENT), AmountKind::Unsigned);
        assert_eq!(AmountKind::of(gen_id::SAMPLE_ID), AmountKind::Signed);
        assert_eq!(AmountKind::of(17), AmountKind::Signed);
    }

    #[test]
    fn test_amount_word() {
        assert_eq!(Generator::range(gen_id::KEY_RANGE, 0x10, 0x7f).amount_word(), 0x7f10);
        assert_eq!(Generator::signed(8, -1).amount_word(), 0xffff);
        assert_eq!(Generator::sample(40000).amount_word(), 40000);
    }
}
