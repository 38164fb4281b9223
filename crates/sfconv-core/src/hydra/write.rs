//! Serializes the bank graph into `pdta` leaf chunks.

use std::io::{Seek, Write};

use crate::error::{SfError, SfResult};
use crate::model::{
    AmountKind, Generator, GeneratorAmount, Instrument, Modulator, Preset, Sample, Zone,
};
use crate::remap::FileAddress;
use crate::riff::tags::{self, record, NAME_LEN};
use crate::riff::ChunkWriter;

fn index_u16(value: usize, what: &str) -> SfResult<u16> {
    u16::try_from(value).map_err(|_| {
        SfError::format(format!("{} index {} exceeds the 16-bit limit", what, value))
    })
}

/// Writes `phdr` with running zone-start indices and a terminal record.
pub fn write_phdr<W: Write + Seek>(w: &mut ChunkWriter<W>, presets: &[Preset]) -> SfResult<()> {
    w.begin_chunk(tags::pdta::PHDR)?;
    let mut zone_index = 0usize;
    for preset in presets {
        write_preset(w, preset, index_u16(zone_index, "preset zone")?)?;
        zone_index += preset.zones.len();
    }
    write_preset(w, &Preset::default(), index_u16(zone_index, "preset zone")?)?;
    w.end_chunk()?;
    Ok(())
}

fn write_preset<W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    preset: &Preset,
    zone_index: u16,
) -> SfResult<()> {
    w.write_fixed_text(preset.name.as_str(), NAME_LEN)?;
    w.write_u16(preset.preset)?;
    w.write_u16(preset.bank)?;
    w.write_u16(zone_index)?;
    w.write_u32(preset.library)?;
    w.write_u32(preset.genre)?;
    w.write_u32(preset.morphology)
}

/// Writes `inst` with running zone-start indices and a terminal record.
pub fn write_inst<W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    instruments: &[Instrument],
) -> SfResult<()> {
    w.begin_chunk(tags::pdta::INST)?;
    let mut zone_index = 0usize;
    for instrument in instruments {
        w.write_fixed_text(instrument.name.as_str(), NAME_LEN)?;
        w.write_u16(index_u16(zone_index, "instrument zone")?)?;
        zone_index += instrument.zones.len();
    }
    w.write_fixed_text("", NAME_LEN)?;
    w.write_u16(index_u16(zone_index, "instrument zone")?)?;
    w.end_chunk()?;
    Ok(())
}

/// Writes a bag of running (generator, modulator) index pairs plus the terminal pair.
pub fn write_bag<'a, W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    tag: &[u8; 4],
    zones: impl Iterator<Item = &'a Zone>,
) -> SfResult<()> {
    w.begin_chunk(tag)?;
    let mut gen_index = 0usize;
    let mut mod_index = 0usize;
    for zone in zones {
        w.write_u16(index_u16(gen_index, "generator")?)?;
        w.write_u16(index_u16(mod_index, "modulator")?)?;
        gen_index += zone.generators.len();
        mod_index += zone.modulators.len();
    }
    w.write_u16(index_u16(gen_index, "generator")?)?;
    w.write_u16(index_u16(mod_index, "modulator")?)?;
    w.end_chunk()?;
    Ok(())
}

/// Writes every zone's modulators plus a zeroed terminator.
pub fn write_mods<'a, W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    tag: &[u8; 4],
    zones: impl Iterator<Item = &'a Zone>,
) -> SfResult<()> {
    w.begin_chunk(tag)?;
    for modulator in zones.flat_map(|z| z.modulators.iter()) {
        write_modulator(w, modulator)?;
    }
    write_modulator(w, &Modulator::default())?;
    w.end_chunk()?;
    Ok(())
}

fn write_modulator<W: Write + Seek>(w: &mut ChunkWriter<W>, m: &Modulator) -> SfResult<()> {
    w.write_u16(m.src)?;
    w.write_u16(m.dst)?;
    w.write_i16(m.amount)?;
    w.write_u16(m.amount_src)?;
    w.write_u16(m.transform)
}

/// Writes every zone's generators plus a zeroed terminator.
pub fn write_gens<'a, W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    tag: &[u8; 4],
    zones: impl Iterator<Item = &'a Zone>,
) -> SfResult<()> {
    w.begin_chunk(tag)?;
    for generator in zones.flat_map(|z| z.generators.iter()) {
        write_generator(w, generator)?;
    }
    write_generator(w, &Generator::default())?;
    w.end_chunk()?;
    Ok(())
}

fn write_generator<W: Write + Seek>(w: &mut ChunkWriter<W>, g: &Generator) -> SfResult<()> {
    w.write_u16(g.id)?;
    // the layout follows the identifier even if the amount was built otherwise
    match (AmountKind::of(g.id), g.amount) {
        (AmountKind::Range, GeneratorAmount::Range { lo, hi }) => {
            w.write_u8(lo)?;
            w.write_u8(hi)
        }
        (AmountKind::Signed, GeneratorAmount::Signed(v)) => w.write_i16(v),
        _ => w.write_u16(g.amount_word()),
    }
}

/// Writes `shdr` using the per-sample file addresses and a zeroed terminal record.
pub fn write_shdr<W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    samples: &[Sample],
    addresses: &[FileAddress],
) -> SfResult<()> {
    if samples.len() != addresses.len() {
        return Err(SfError::structure(format!(
            "{} samples but {} file addresses",
            samples.len(),
            addresses.len()
        )));
    }
    w.begin_chunk(tags::pdta::SHDR)?;
    for (sample, address) in samples.iter().zip(addresses) {
        w.write_fixed_text(sample.name.as_str(), NAME_LEN)?;
        w.write_u32(address.start)?;
        w.write_u32(address.end)?;
        w.write_u32(address.loop_start)?;
        w.write_u32(address.loop_end)?;
        w.write_u32(sample.sample_rate)?;
        w.write_u8(sample.original_pitch)?;
        w.write_i8(sample.pitch_correction)?;
        w.write_u16(sample.sample_link)?;
        w.write_u16(sample.sample_type.bits())?;
    }
    w.write_bytes(&[0u8; record::SHDR as usize])?;
    w.end_chunk()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gen_id;
    use std::io::Cursor;

    fn written(f: impl FnOnce(&mut ChunkWriter<Cursor<Vec<u8>>>) -> SfResult<()>) -> Vec<u8> {
        let mut w = ChunkWriter::new(Cursor::new(Vec::new()));
        f(&mut w).unwrap();
        w.into_inner().unwrap().into_inner()
    }

    fn zone(gens: usize, mods: usize) -> Zone {
        Zone {
            generators: vec![Generator::signed(8, 100); gens],
            modulators: vec![Modulator::default(); mods],
        }
    }

    #[test]
    fn test_bag_running_indices() {
        let zones = vec![zone(2, 1), zone(0, 0), zone(3, 2)];
        let bytes = written(|w| write_bag(w, tags::pdta::IBAG, zones.iter()));
        assert_eq!(&bytes[4..8], &16u32.to_le_bytes());
        let words: Vec<u16> = bytes[8..]
            .chunks(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(words, vec![0, 0, 2, 1, 2, 1, 5, 3]);
    }

    #[test]
    fn test_phdr_sentinel_carries_final_index() {
        let presets = vec![
            Preset {
                name: "Piano".into(),
                zones: vec![Zone::default(); 2],
                ..Default::default()
            },
            Preset {
                name: "Organ".into(),
                preset: 16,
                zones: vec![Zone::default(); 3],
                ..Default::default()
            },
        ];
        let bytes = written(|w| write_phdr(w, &presets));
        assert_eq!(bytes.len(), 8 + 3 * 38);
        let bag_index = |record: usize| {
            let at = 8 + record * 38 + 24;
            u16::from_le_bytes([bytes[at], bytes[at + 1]])
        };
        assert_eq!(bag_index(0), 0);
        assert_eq!(bag_index(1), 2);
        assert_eq!(bag_index(2), 5);
    }

    #[test]
    fn test_generator_layouts() {
        let zones = vec![Zone {
            generators: vec![
                Generator::range(gen_id::VEL_RANGE, 1, 127),
                Generator::instrument(300),
            ],
            modulators: Vec::new(),
        }];
        let bytes = written(|w| write_gens(w, tags::pdta::PGEN, zones.iter()));
        assert_eq!(
            &bytes[8..],
            &[44, 0, 1, 127, 41, 0, 0x2c, 0x01, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_shdr_address_count_must_match() {
        let samples = vec![Sample::from_pcm("A", vec![0; 4], 44100)];
        let mut w = ChunkWriter::new(Cursor::new(Vec::new()));
        assert!(write_shdr(&mut w, &samples, &[]).is_err());
    }
}
