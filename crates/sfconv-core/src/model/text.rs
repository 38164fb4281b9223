//! Bounded-length text for fixed-width name fields.

use serde::Serialize;
use std::fmt;

/// Immutable UTF-8 text that fits a NUL-terminated field of `N` bytes.
///
/// Construction truncates to at most `N - 1` bytes on a character boundary;
/// padding to the full width happens only when the field is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FixedText<const N: usize>(String);

/// Twenty-byte name used by presets, instruments and samples.
pub type Name = FixedText<20>;

impl<const N: usize> FixedText<N> {
    /// Creates a value, truncating to the field width.
    pub fn new(text: &str) -> Self {
        let mut cut = text.len().min(N.saturating_sub(1));
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        Self(text[..cut].to_string())
    }

    /// Borrows the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<&str> for FixedText<N> {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<const N: usize> From<String> for FixedText<N> {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl<const N: usize> fmt::Display for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> PartialEq<str> for FixedText<N> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedText<N> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
