//! Preset, instrument and sample header data (`pdta`).
//!
//! Header arrays end with a terminal record whose only meaningful field is
//! the next zone-start index. Bags map zones to generator and modulator
//! ranges and must follow their headers; generator and modulator lists must
//! follow their bag.

mod read;
mod write;

pub use read::HydraBuilder;
pub use write::{write_bag, write_gens, write_inst, write_mods, write_phdr, write_shdr};
