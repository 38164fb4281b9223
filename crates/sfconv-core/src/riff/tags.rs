//! Chunk identifiers and fixed record sizes.

/// RIFF container tag.
pub const RIFF: &[u8; 4] = b"RIFF";

/// SoundFont bank form type.
pub const SFBK: &[u8; 4] = b"sfbk";

/// Grouped section tag.
pub const LIST: &[u8; 4] = b"LIST";

/// Grouped section kinds.
pub mod list {
    /// Supplemental information.
    pub const INFO: &[u8; 4] = b"INFO";
    /// Sample data.
    pub const SDTA: &[u8; 4] = b"sdta";
    /// Preset, instrument and sample header data ("hydra").
    pub const PDTA: &[u8; 4] = b"pdta";
}

/// `INFO` leaf tags.
pub mod info {
    /// Format version.
    pub const IFIL: &[u8; 4] = b"ifil";
    /// Target sound engine.
    pub const ISNG: &[u8; 4] = b"isng";
    /// Bank name.
    pub const INAM: &[u8; 4] = b"INAM";
    /// Sound ROM name.
    pub const IROM: &[u8; 4] = b"irom";
    /// Sound ROM version.
    pub const IVER: &[u8; 4] = b"iver";
    /// Creation date.
    pub const ICRD: &[u8; 4] = b"ICRD";
    /// Sound designers and engineers.
    pub const IENG: &[u8; 4] = b"IENG";
    /// Intended product.
    pub const IPRD: &[u8; 4] = b"IPRD";
    /// Copyright message.
    pub const ICOP: &[u8; 4] = b"ICOP";
    /// Comments.
    pub const ICMT: &[u8; 4] = b"ICMT";
    /// Tools used to create and alter the bank.
    pub const ISFT: &[u8; 4] = b"ISFT";
}

/// `sdta` leaf tags.
pub mod sdta {
    /// Sample data region.
    pub const SMPL: &[u8; 4] = b"smpl";
}

/// `pdta` leaf tags.
pub mod pdta {
    /// Preset headers.
    pub const PHDR: &[u8; 4] = b"phdr";
    /// Preset zone index list.
    pub const PBAG: &[u8; 4] = b"pbag";
    /// Preset modulator list.
    pub const PMOD: &[u8; 4] = b"pmod";
    /// Preset generator list.
    pub const PGEN: &[u8; 4] = b"pgen";
    /// Instrument headers.
    pub const INST: &[u8; 4] = b"inst";
    /// Instrument zone index list.
    pub const IBAG: &[u8; 4] = b"ibag";
    /// Instrument modulator list.
    pub const IMOD: &[u8; 4] = b"imod";
    /// Instrument generator list.
    pub const IGEN: &[u8; 4] = b"igen";
    /// Sample headers.
    pub const SHDR: &[u8; 4] = b"shdr";
    /// Sample verification ledger (non-standard extension).
    pub const SHDX: &[u8; 4] = b"shdX";
}

/// Fixed record sizes in bytes.
pub mod record {
    /// Preset header.
    pub const PHDR: u32 = 38;
    /// Zone index pair.
    pub const BAG: u32 = 4;
    /// Modulator.
    pub const MOD: u32 = 10;
    /// Generator.
    pub const GEN: u32 = 4;
    /// Instrument header.
    pub const INST: u32 = 22;
    /// Sample header.
    pub const SHDR: u32 = 46;
    /// Verification ledger entry.
    pub const SHDX: u32 = 32;
}

/// Width of every fixed name field.
pub const NAME_LEN: usize = 20;

/// Renders a tag for messages, escaping non-printable bytes.
pub fn display(tag: &[u8; 4]) -> String {
    tag.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                (b as char).to_string()
            } else {
                format!("\\x{:02x}", b)
            }
        })
        .collect()
}
