//! Encode/decode contract for compressed sample data.
//!
//! Backends live outside this crate. A [`CodecRegistry`] is built once,
//! then passed by reference into reads and writes.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{SfError, SfResult};
use crate::format::Compression;

/// Encoder quality tier. Mapping to codec parameters is up to each backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Smallest output.
    Low,
    /// Balanced.
    Medium,
    /// Best fidelity.
    #[default]
    High,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}

/// A mono 16-bit PCM codec.
pub trait CodecBridge: Send + Sync {
    /// Backend name used in messages.
    fn name(&self) -> &'static str;

    /// Compression kind this backend implements.
    fn compression(&self) -> Compression;

    /// Encodes a complete sample. Returns only after the stream is finalized.
    fn encode(&self, pcm: &[i16], sample_rate: u32, quality: Quality) -> SfResult<Vec<u8>>;

    /// Decodes a complete stream produced by [`CodecBridge::encode`].
    fn decode(&self, data: &[u8]) -> SfResult<Vec<i16>>;
}

/// Immutable table of codec backends, one per compression kind.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    backends: HashMap<Compression, Arc<dyn CodecBridge>>,
}

impl CodecRegistry {
    /// Starts building a registry.
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// A registry with no backends; enough for uncompressed containers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up the backend for `compression`.
    pub fn get(&self, compression: Compression) -> SfResult<&dyn CodecBridge> {
        self.backends
            .get(&compression)
            .map(|b| b.as_ref())
            .ok_or_else(|| {
                SfError::codec(compression.name(), "no backend registered")
            })
    }

    /// True if a backend is registered for `compression`.
    pub fn supports(&self, compression: Compression) -> bool {
        self.backends.contains_key(&compression)
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.backends.values().map(|b| b.name()).collect();
        names.sort_unstable();
        f.debug_struct("CodecRegistry")
            .field("backends", &names)
            .finish()
    }
}

/// Collects backends for a [`CodecRegistry`].
#[derive(Default)]
pub struct CodecRegistryBuilder {
    backends: HashMap<Compression, Arc<dyn CodecBridge>>,
}

impl CodecRegistryBuilder {
    /// Registers a backend. The first backend for a compression kind wins.
    pub fn register(mut self, backend: impl CodecBridge + 'static) -> Self {
        let kind = backend.compression();
        if let Some(existing) = self.backends.get(&kind) {
            debug!(
                "Codec '{}' already registered for {}, ignoring '{}'",
                existing.name(),
                kind,
                backend.name()
            );
            return self;
        }
        self.backends.insert(kind, Arc::new(backend));
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> CodecRegistry {
        CodecRegistry {
            backends: self.backends,
        }
    }
}

/// Serializes PCM as little-endian 16-bit words.
pub fn pcm_to_bytes(pcm: &[i16]) -> Vec<u8> {
    let mut out = vec![0u8; pcm.len() * 2];
    LittleEndian::write_i16_into(pcm, &mut out);
    out
}

/// Parses little-endian 16-bit words. A trailing odd byte is an error.
pub fn pcm_from_bytes(data: &[u8]) -> SfResult<Vec<i16>> {
    if data.len() % 2 != 0 {
        return Err(SfError::structure(format!(
            "uncompressed sample data has odd length {}",
            data.len()
        )));
    }
    let mut pcm = vec![0i16; data.len() / 2];
    LittleEndian::read_i16_into(data, &mut pcm);
    Ok(pcm)
}
