//! Builds the bank graph from `pdta` leaf chunks.

use log::warn;
use std::io::{Read, Seek};

use crate::error::{SfError, SfResult};
use crate::model::{
    AmountKind, Generator, GeneratorAmount, Instrument, Modulator, Preset, Sample, SampleType,
    Zone,
};
use crate::riff::tags::{self, record, NAME_LEN};
use crate::riff::{ChunkHeader, ChunkReader};

/// Generator and modulator counts of one zone, taken from its bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ZoneSpan {
    generators: usize,
    modulators: usize,
}

/// Which of a header/bag/mod/gen group have been seen.
#[derive(Debug, Default)]
struct ZoneListState {
    headers: bool,
    spans: Option<Vec<ZoneSpan>>,
    modulators: bool,
    generators: bool,
}

impl ZoneListState {
    fn require_headers(&self, chunk: &[u8; 4], prerequisite: &[u8; 4]) -> SfResult<()> {
        if !self.headers {
            return Err(out_of_order(chunk, prerequisite));
        }
        Ok(())
    }

    fn spans(&self, chunk: &[u8; 4], prerequisite: &[u8; 4]) -> SfResult<Vec<ZoneSpan>> {
        self.spans
            .clone()
            .ok_or_else(|| out_of_order(chunk, prerequisite))
    }

    fn check_complete(&self, group: &str) -> SfResult<()> {
        if self.headers && !(self.spans.is_some() && self.modulators && self.generators) {
            return Err(SfError::structure(format!(
                "{} headers present without their bag, modulator and generator lists",
                group
            )));
        }
        Ok(())
    }
}

fn out_of_order(chunk: &[u8; 4], prerequisite: &[u8; 4]) -> SfError {
    SfError::structure(format!(
        "'{}' must follow '{}'",
        tags::display(chunk),
        tags::display(prerequisite)
    ))
}

fn duplicate(chunk: &[u8; 4]) -> SfError {
    SfError::structure(format!("duplicate '{}' chunk", tags::display(chunk)))
}

/// Number of fixed-size records in a chunk, sentinel included.
fn record_count(header: &ChunkHeader, size: u32) -> SfResult<usize> {
    if header.len % size != 0 {
        return Err(SfError::structure(format!(
            "'{}' length {} is not a multiple of {}",
            tags::display(&header.tag),
            header.len,
            size
        )));
    }
    let count = (header.len / size) as usize;
    if count == 0 {
        return Err(SfError::structure(format!(
            "'{}' has no terminal record",
            tags::display(&header.tag)
        )));
    }
    Ok(count)
}

/// Materializes zones from raw zone-start indices, sentinel last.
///
/// Each owner gets `starts[i + 1] - starts[i]` zones; a decrease is a
/// structural error.
fn zone_counts(starts: &[u16], what: &str) -> SfResult<Vec<usize>> {
    let mut counts = Vec::with_capacity(starts.len().saturating_sub(1));
    for pair in starts.windows(2) {
        if pair[1] < pair[0] {
            return Err(SfError::structure(format!(
                "{} header indices not monotonic",
                what
            )));
        }
        counts.push(usize::from(pair[1] - pair[0]));
    }
    Ok(counts)
}

/// Incrementally assembled bank graph.
#[derive(Debug, Default)]
pub struct HydraBuilder {
    /// Presets, complete once `pgen` has been read.
    pub presets: Vec<Preset>,
    /// Instruments, complete once `igen` has been read.
    pub instruments: Vec<Instrument>,
    /// Sample headers without audio.
    pub samples: Vec<Sample>,
    preset_lists: ZoneListState,
    instrument_lists: ZoneListState,
    samples_read: bool,
    ledger_read: bool,
}

impl HydraBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one `pdta` leaf chunk. Returns `false` for tags this module does not own.
    pub fn read_chunk<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<bool> {
        match &header.tag {
            tags::pdta::PHDR => r.read_leaf(header, |r| self.read_phdr(r, header))?,
            tags::pdta::PBAG => r.read_leaf(header, |r| self.read_preset_bag(r, header))?,
            tags::pdta::PMOD => r.read_leaf(header, |r| self.read_preset_mods(r, header))?,
            tags::pdta::PGEN => r.read_leaf(header, |r| self.read_preset_gens(r, header))?,
            tags::pdta::INST => r.read_leaf(header, |r| self.read_inst(r, header))?,
            tags::pdta::IBAG => r.read_leaf(header, |r| self.read_instrument_bag(r, header))?,
            tags::pdta::IMOD => r.read_leaf(header, |r| self.read_instrument_mods(r, header))?,
            tags::pdta::IGEN => r.read_leaf(header, |r| self.read_instrument_gens(r, header))?,
            tags::pdta::SHDR => r.read_leaf(header, |r| self.read_shdr(r, header))?,
            tags::pdta::SHDX => r.read_leaf(header, |r| self.read_shdx(r, header))?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Checks every started header group was completed and returns the graph.
    pub fn finish(self) -> SfResult<(Vec<Preset>, Vec<Instrument>, Vec<Sample>)> {
        self.preset_lists.check_complete("preset")?;
        self.instrument_lists.check_complete("instrument")?;
        self.check_references();
        Ok((self.presets, self.instruments, self.samples))
    }

    fn check_references(&self) {
        for preset in &self.presets {
            for zone in &preset.zones {
                if let Some(index) = zone.instrument_index() {
                    if index >= self.instruments.len() {
                        warn!(
                            "Preset '{}' references missing instrument {}",
                            preset.name, index
                        );
                    }
                }
            }
        }
        for instrument in &self.instruments {
            for zone in &instrument.zones {
                if let Some(index) = zone.sample_index() {
                    if index >= self.samples.len() {
                        warn!(
                            "Instrument '{}' references missing sample {}",
                            instrument.name, index
                        );
                    }
                }
            }
        }
    }

    // ========================================================================
    // Headers
    // ========================================================================

    fn read_phdr<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.preset_lists.headers {
            return Err(duplicate(&header.tag));
        }
        let count = record_count(header, record::PHDR)?;
        let mut presets = Vec::with_capacity(count);
        let mut starts = Vec::with_capacity(count);
        for _ in 0..count {
            let name = r.read_fixed_text(NAME_LEN)?;
            let preset = r.read_u16()?;
            let bank = r.read_u16()?;
            starts.push(r.read_u16()?);
            let library = r.read_u32()?;
            let genre = r.read_u32()?;
            let morphology = r.read_u32()?;
            presets.push(Preset {
                name: name.as_str().into(),
                preset,
                bank,
                library,
                genre,
                morphology,
                zones: Vec::new(),
            });
        }
        let counts = zone_counts(&starts, "preset")?;
        presets.pop();
        for (preset, zones) in presets.iter_mut().zip(counts) {
            preset.zones = vec![Zone::default(); zones];
        }
        self.presets = presets;
        self.preset_lists.headers = true;
        Ok(())
    }

    fn read_inst<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.instrument_lists.headers {
            return Err(duplicate(&header.tag));
        }
        let count = record_count(header, record::INST)?;
        let mut instruments = Vec::with_capacity(count);
        let mut starts = Vec::with_capacity(count);
        for _ in 0..count {
            let name = r.read_fixed_text(NAME_LEN)?;
            starts.push(r.read_u16()?);
            instruments.push(Instrument {
                name: name.as_str().into(),
                zones: Vec::new(),
            });
        }
        let counts = zone_counts(&starts, "instrument")?;
        instruments.pop();
        for (instrument, zones) in instruments.iter_mut().zip(counts) {
            instrument.zones = vec![Zone::default(); zones];
        }
        self.instruments = instruments;
        self.instrument_lists.headers = true;
        Ok(())
    }

    fn read_shdr<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.samples_read {
            return Err(duplicate(&header.tag));
        }
        let count = record_count(header, record::SHDR)?;
        let mut samples = Vec::with_capacity(count - 1);
        for i in 0..count {
            let name = r.read_fixed_text(NAME_LEN)?;
            let start = r.read_u32()?;
            let end = r.read_u32()?;
            let loop_start = r.read_u32()?;
            let loop_end = r.read_u32()?;
            let sample_rate = r.read_u32()?;
            let original_pitch = r.read_u8()?;
            let pitch_correction = r.read_i8()?;
            let sample_link = r.read_u16()?;
            let mut sample_type = SampleType(r.read_u16()?);
            if i + 1 == count {
                break;
            }
            if !sample_type.has_channel_role() {
                warn!(
                    "Sample '{}' has no channel type ({}), treating as mono",
                    name, sample_type
                );
                sample_type = sample_type.with_mono();
            }
            samples.push(Sample {
                name: name.as_str().into(),
                start,
                end,
                loop_start,
                loop_end,
                sample_rate,
                original_pitch,
                pitch_correction,
                sample_link,
                sample_type,
                ..Default::default()
            });
        }
        self.samples = samples;
        self.samples_read = true;
        Ok(())
    }

    fn read_shdx<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if !self.samples_read {
            return Err(out_of_order(&header.tag, tags::pdta::SHDR));
        }
        if self.ledger_read {
            return Err(duplicate(&header.tag));
        }
        crate::ledger::read_records(r, header, &mut self.samples)?;
        self.ledger_read = true;
        Ok(())
    }

    // ========================================================================
    // Bags
    // ========================================================================

    fn read_preset_bag<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        self.preset_lists
            .require_headers(&header.tag, tags::pdta::PHDR)?;
        if self.preset_lists.spans.is_some() {
            return Err(duplicate(&header.tag));
        }
        let zones = self.presets.iter().map(|p| p.zones.len()).sum();
        self.preset_lists.spans = Some(read_bag(r, header, zones)?);
        Ok(())
    }

    fn read_instrument_bag<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        self.instrument_lists
            .require_headers(&header.tag, tags::pdta::INST)?;
        if self.instrument_lists.spans.is_some() {
            return Err(duplicate(&header.tag));
        }
        let zones = self.instruments.iter().map(|i| i.zones.len()).sum();
        self.instrument_lists.spans = Some(read_bag(r, header, zones)?);
        Ok(())
    }

    // ========================================================================
    // Modulators and generators
    // ========================================================================

    fn read_preset_mods<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.preset_lists.modulators {
            return Err(duplicate(&header.tag));
        }
        let spans = self.preset_lists.spans(&header.tag, tags::pdta::PBAG)?;
        let zones = self.presets.iter_mut().flat_map(|p| p.zones.iter_mut());
        read_modulators(r, header, zones, &spans)?;
        self.preset_lists.modulators = true;
        Ok(())
    }

    fn read_instrument_mods<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.instrument_lists.modulators {
            return Err(duplicate(&header.tag));
        }
        let spans = self.instrument_lists.spans(&header.tag, tags::pdta::IBAG)?;
        let zones = self.instruments.iter_mut().flat_map(|i| i.zones.iter_mut());
        read_modulators(r, header, zones, &spans)?;
        self.instrument_lists.modulators = true;
        Ok(())
    }

    fn read_preset_gens<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.preset_lists.generators {
            return Err(duplicate(&header.tag));
        }
        let spans = self.preset_lists.spans(&header.tag, tags::pdta::PBAG)?;
        let zones = self.presets.iter_mut().flat_map(|p| p.zones.iter_mut());
        read_generators(r, header, zones, &spans)?;
        self.preset_lists.generators = true;
        Ok(())
    }

    fn read_instrument_gens<R: Read + Seek>(
        &mut self,
        r: &mut ChunkReader<R>,
        header: &ChunkHeader,
    ) -> SfResult<()> {
        if self.instrument_lists.generators {
            return Err(duplicate(&header.tag));
        }
        let spans = self.instrument_lists.spans(&header.tag, tags::pdta::IBAG)?;
        let zones = self.instruments.iter_mut().flat_map(|i| i.zones.iter_mut());
        read_generators(r, header, zones, &spans)?;
        self.instrument_lists.generators = true;
        Ok(())
    }
}

/// Reads a bag: an initial index pair, then one pair per zone.
fn read_bag<R: Read + Seek>(
    r: &mut ChunkReader<R>,
    header: &ChunkHeader,
    zones: usize,
) -> SfResult<Vec<ZoneSpan>> {
    let count = record_count(header, record::BAG)?;
    if count != zones + 1 {
        return Err(SfError::structure(format!(
            "'{}' holds {} records, expected {} for {} zones",
            tags::display(&header.tag),
            count,
            zones + 1,
            zones
        )));
    }
    let mut gen_index = r.read_u16()?;
    let mut mod_index = r.read_u16()?;
    let mut spans = Vec::with_capacity(zones);
    for _ in 0..zones {
        let next_gen = r.read_u16()?;
        let next_mod = r.read_u16()?;
        if next_gen < gen_index {
            return Err(SfError::structure("generator indices not monotonic"));
        }
        if next_mod < mod_index {
            return Err(SfError::structure("modulator indices not monotonic"));
        }
        spans.push(ZoneSpan {
            generators: usize::from(next_gen - gen_index),
            modulators: usize::from(next_mod - mod_index),
        });
        gen_index = next_gen;
        mod_index = next_mod;
    }
    Ok(spans)
}

/// Checks a list chunk holds exactly the bag-declared records plus a terminator.
fn check_list_len(header: &ChunkHeader, size: u32, declared: usize) -> SfResult<()> {
    let count = record_count(header, size)?;
    if count != declared + 1 {
        return Err(SfError::structure(format!(
            "'{}' holds {} records, bag declares {} plus terminator",
            tags::display(&header.tag),
            count,
            declared
        )));
    }
    Ok(())
}

fn read_modulators<'a, R: Read + Seek>(
    r: &mut ChunkReader<R>,
    header: &ChunkHeader,
    zones: impl Iterator<Item = &'a mut Zone>,
    spans: &[ZoneSpan],
) -> SfResult<()> {
    let total = spans.iter().map(|s| s.modulators).sum();
    check_list_len(header, record::MOD, total)?;
    for (zone, span) in zones.zip(spans) {
        zone.modulators.reserve(span.modulators);
        for _ in 0..span.modulators {
            zone.modulators.push(Modulator {
                src: r.read_u16()?,
                dst: r.read_u16()?,
                amount: r.read_i16()?,
                amount_src: r.read_u16()?,
                transform: r.read_u16()?,
            });
        }
    }
    r.skip(u64::from(record::MOD))
}

fn read_generators<'a, R: Read + Seek>(
    r: &mut ChunkReader<R>,
    header: &ChunkHeader,
    zones: impl Iterator<Item = &'a mut Zone>,
    spans: &[ZoneSpan],
) -> SfResult<()> {
    let total = spans.iter().map(|s| s.generators).sum();
    check_list_len(header, record::GEN, total)?;
    for (zone, span) in zones.zip(spans) {
        zone.generators.reserve(span.generators);
        for _ in 0..span.generators {
            zone.generators.push(read_generator(r)?);
        }
    }
    r.skip(u64::from(record::GEN))
}

fn read_generator<R: Read + Seek>(r: &mut ChunkReader<R>) -> SfResult<Generator> {
    let id = r.read_u16()?;
    let amount = match AmountKind::of(id) {
        AmountKind::Range => {
            let lo = r.read_u8()?;
            let hi = r.read_u8()?;
            GeneratorAmount::Range { lo, hi }
        }
        AmountKind::Unsigned => GeneratorAmount::Unsigned(r.read_u16()?),
        AmountKind::Signed => GeneratorAmount::Signed(r.read_i16()?),
    };
    Ok(Generator { id, amount })
}
