//! sfconv codec backends
//!
//! Concrete [`CodecBridge`] implementations for compressed SoundFont banks:
//!
//! - [`VorbisCodec`] - Ogg Vorbis (SF3), lossy, via libvorbis
//! - [`FlacCodec`] - FLAC (SF4), lossless, `flacenc` encoder and `symphonia` decoder
//!
//! # Example
//!
//! ```ignore
//! use sfconv_backend_codec::default_registry;
//! use sfconv_core::{FileFormat, SoundFont, WriteOptions};
//!
//! let codecs = default_registry();
//! let mut bank = SoundFont::open("piano.sf2", codecs)?;
//! let out = std::fs::File::create("piano.sf3")?;
//! bank.write(out, &WriteOptions::new(FileFormat::Sf3), codecs)?;
//! ```

pub mod flac;
mod pcm;
pub mod vorbis;

use std::sync::OnceLock;

use sfconv_core::CodecRegistry;

pub use flac::FlacCodec;
pub use vorbis::VorbisCodec;

#[doc(no_inline)]
pub use sfconv_core::CodecBridge;

/// Builds a fresh registry holding every backend in this crate.
pub fn registry() -> CodecRegistry {
    CodecRegistry::builder()
        .register(VorbisCodec)
        .register(FlacCodec)
        .build()
}

/// Process-wide registry, built on first use.
pub fn default_registry() -> &'static CodecRegistry {
    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfconv_core::Compression;

    #[test]
    fn test_default_registry_covers_compressed_formats() {
        let codecs = default_registry();
        assert!(codecs.supports(Compression::Vorbis));
        assert!(codecs.supports(Compression::Flac));
        assert!(!codecs.supports(Compression::Raw));
        assert_eq!(codecs.get(Compression::Vorbis).unwrap().name(), "vorbis");
        assert_eq!(codecs.get(Compression::Flac).unwrap().name(), "flac");
    }

    #[test]
    fn test_default_registry_is_shared() {
        assert!(std::ptr::eq(default_registry(), default_registry()));
    }
}
