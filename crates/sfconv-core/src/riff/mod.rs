//! RIFF chunk tokenizer and serializer.
//!
//! A SoundFont is a `RIFF sfbk` form holding three `LIST` sections (`INFO`,
//! `sdta`, `pdta`), each a flat sequence of tag + length + payload leaf
//! chunks. All integers are little-endian.

mod reader;
pub mod tags;
mod writer;

pub use reader::{Budget, ChunkHeader, ChunkReader};
pub use writer::ChunkWriter;
