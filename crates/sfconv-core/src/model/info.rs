//! Bank-level `INFO` metadata.

/// Format version pair from the `ifil` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// Major version; selects the container variant.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 2, minor: 1 }
    }
}

/// Supplemental bank information.
///
/// Strings are kept as read; empty strings are omitted on write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankInfo {
    /// Format version.
    pub version: Version,
    /// Bank name (`INAM`).
    pub name: String,
    /// Target sound engine (`isng`).
    pub engine: String,
    /// Intended product (`IPRD`).
    pub product: String,
    /// Sound designers and engineers (`IENG`).
    pub engineers: String,
    /// Creation and editing tools (`ISFT`).
    pub tools: String,
    /// Creation date (`ICRD`).
    pub creation_date: String,
    /// Comments (`ICMT`).
    pub comment: String,
    /// Copyright message (`ICOP`).
    pub copyright: String,
}
