//! Shared fixtures: a byte-level bank builder and deterministic mock codecs.

#![allow(dead_code)]

use sfconv_core::codec::{pcm_from_bytes, pcm_to_bytes};
use sfconv_core::{CodecBridge, CodecRegistry, Compression, Quality, SfError, SfResult};

// =============================================================================
// Byte helpers
// =============================================================================

/// Builds a leaf chunk.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Builds a `LIST` section from already-encoded leaf chunks.
pub fn list(kind: &[u8; 4], leaves: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = kind.to_vec();
    for leaf in leaves {
        payload.extend_from_slice(leaf);
    }
    chunk(b"LIST", &payload)
}

/// Wraps sections into a `RIFF sfbk` form.
pub fn riff(sections: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = b"sfbk".to_vec();
    for section in sections {
        payload.extend_from_slice(section);
    }
    chunk(b"RIFF", &payload)
}

/// A zero-padded 20-byte name field.
pub fn name20(name: &str) -> Vec<u8> {
    let mut out = vec![0u8; 20];
    let len = name.len().min(19);
    out[..len].copy_from_slice(&name.as_bytes()[..len]);
    out
}

pub fn phdr_record(name: &str, preset: u16, bank: u16, bag: u16) -> Vec<u8> {
    let mut out = name20(name);
    out.extend_from_slice(&preset.to_le_bytes());
    out.extend_from_slice(&bank.to_le_bytes());
    out.extend_from_slice(&bag.to_le_bytes());
    out.extend_from_slice(&[0u8; 12]);
    out
}

pub fn inst_record(name: &str, bag: u16) -> Vec<u8> {
    let mut out = name20(name);
    out.extend_from_slice(&bag.to_le_bytes());
    out
}

pub fn bag_records(pairs: &[(u16, u16)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (g, m) in pairs {
        out.extend_from_slice(&g.to_le_bytes());
        out.extend_from_slice(&m.to_le_bytes());
    }
    out
}

pub fn gen_record(id: u16, amount: [u8; 2]) -> Vec<u8> {
    let mut out = id.to_le_bytes().to_vec();
    out.extend_from_slice(&amount);
    out
}

#[allow(clippy::too_many_arguments)]
pub fn shdr_record(
    name: &str,
    start: u32,
    end: u32,
    loop_start: u32,
    loop_end: u32,
    rate: u32,
    sample_type: u16,
) -> Vec<u8> {
    let mut out = name20(name);
    for v in [start, end, loop_start, loop_end, rate] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.push(60);
    out.push(0);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&sample_type.to_le_bytes());
    out
}

pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Byte offset of the first occurrence of `tag` in `data`.
pub fn find_tag(data: &[u8], tag: &[u8; 4]) -> Option<usize> {
    data.windows(4).position(|w| w == tag)
}

/// Deterministic test waveform.
pub fn ramp(frames: usize, seed: i16) -> Vec<i16> {
    (0..frames)
        .map(|i| ((i as i32 * 331 + i32::from(seed) * 97) % 20000 - 10000) as i16)
        .collect()
}

// =============================================================================
// Bank fixture
// =============================================================================

/// One sample in a [`BankFixture`], loop relative to the sample start.
#[derive(Debug, Clone)]
pub struct FixtureSample {
    pub name: String,
    pub pcm: Vec<i16>,
    pub loop_start: u32,
    pub loop_end: u32,
}

/// An uncompressed bank: one preset per sample, each routed through its own instrument.
///
/// Individual leaf payloads can be overridden to produce malformed input.
#[derive(Debug, Clone)]
pub struct BankFixture {
    pub version: (u16, u16),
    pub name: String,
    pub comment: String,
    pub samples: Vec<FixtureSample>,
    pub overrides: Vec<([u8; 4], Vec<u8>)>,
    pub extra_info: Vec<Vec<u8>>,
    pub extra_pdta: Vec<Vec<u8>>,
    pub pdta_order: Option<Vec<[u8; 4]>>,
}

impl BankFixture {
    /// One preset, one instrument, one sample of `frames` frames with the given loop.
    pub fn minimal(frames: usize, loop_start: u32, loop_end: u32) -> Self {
        Self::with_samples(vec![FixtureSample {
            name: "Piano C4".to_string(),
            pcm: ramp(frames, 1),
            loop_start,
            loop_end,
        }])
    }

    pub fn with_samples(samples: Vec<FixtureSample>) -> Self {
        Self {
            version: (2, 1),
            name: "Test Bank".to_string(),
            comment: String::new(),
            samples,
            overrides: Vec::new(),
            extra_info: Vec::new(),
            extra_pdta: Vec::new(),
            pdta_order: None,
        }
    }

    /// Replaces the payload of one leaf chunk.
    pub fn override_chunk(mut self, tag: &[u8; 4], payload: Vec<u8>) -> Self {
        self.overrides.push((*tag, payload));
        self
    }

    fn leaf(&self, tag: &[u8; 4], default: Vec<u8>) -> Vec<u8> {
        let payload = self
            .overrides
            .iter()
            .rev()
            .find(|(t, _)| t == tag)
            .map(|(_, p)| p.clone())
            .unwrap_or(default);
        chunk(tag, &payload)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.samples.len() as u16;

        let mut info = vec![
            self.leaf(b"ifil", [self.version.0.to_le_bytes(), self.version.1.to_le_bytes()].concat()),
            self.leaf(b"isng", b"EMU8000\0".to_vec()),
            self.leaf(b"INAM", padded_text(&self.name)),
        ];
        if !self.comment.is_empty() {
            info.push(self.leaf(b"ICMT", padded_text(&self.comment)));
        }
        info.extend(self.extra_info.iter().cloned());

        let mut smpl = Vec::new();
        let mut shdr = Vec::new();
        let mut frame = 0u32;
        for s in &self.samples {
            let frames = s.pcm.len() as u32;
            shdr.extend(shdr_record(
                &s.name,
                frame,
                frame + frames,
                frame + s.loop_start,
                frame + s.loop_end,
                44100,
                1,
            ));
            for v in &s.pcm {
                smpl.extend_from_slice(&v.to_le_bytes());
            }
            frame += frames;
        }
        shdr.extend(vec![0u8; 46]);

        let mut phdr = Vec::new();
        let mut inst = Vec::new();
        let mut pgen = Vec::new();
        let mut igen = Vec::new();
        for i in 0..n {
            phdr.extend(phdr_record(&format!("Preset {}", i), i, 0, i));
            inst.extend(inst_record(&format!("Inst {}", i), i));
            pgen.extend(gen_record(41, i.to_le_bytes()));
            igen.extend(gen_record(43, [0, 127]));
            igen.extend(gen_record(53, i.to_le_bytes()));
        }
        phdr.extend(phdr_record("EOP", 0, 0, n));
        inst.extend(inst_record("EOI", n));
        pgen.extend([0u8; 4]);
        igen.extend([0u8; 4]);
        let pbag_pairs: Vec<(u16, u16)> = (0..=n).map(|i| (i, 0)).collect();
        let ibag_pairs: Vec<(u16, u16)> = (0..=n).map(|i| (i * 2, 0)).collect();

        let defaults: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"phdr", phdr),
            (*b"pbag", bag_records(&pbag_pairs)),
            (*b"pmod", vec![0u8; 10]),
            (*b"pgen", pgen),
            (*b"inst", inst),
            (*b"ibag", bag_records(&ibag_pairs)),
            (*b"imod", vec![0u8; 10]),
            (*b"igen", igen),
            (*b"shdr", shdr),
        ];
        let order: Vec<[u8; 4]> = self
            .pdta_order
            .clone()
            .unwrap_or_else(|| defaults.iter().map(|(t, _)| *t).collect());
        let mut pdta: Vec<Vec<u8>> = order
            .iter()
            .filter_map(|tag| {
                defaults
                    .iter()
                    .find(|(t, _)| t == tag)
                    .map(|(t, p)| self.leaf(t, p.clone()))
            })
            .collect();
        pdta.extend(self.extra_pdta.iter().cloned());

        riff(&[
            list(b"INFO", &info),
            list(b"sdta", &[self.leaf(b"smpl", smpl)]),
            list(b"pdta", &pdta),
        ])
    }
}

/// NUL-terminated text padded to an even length.
pub fn padded_text(text: &str) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.push(0);
    if out.len() % 2 != 0 {
        out.push(0);
    }
    out
}

// =============================================================================
// Mock codecs
// =============================================================================

const MOCK_MAGIC: &[u8; 4] = b"MOCK";

/// Lossless stand-in: a magic header followed by raw PCM.
pub struct IdentityCodec(pub Compression);

impl CodecBridge for IdentityCodec {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn compression(&self) -> Compression {
        self.0
    }

    fn encode(&self, pcm: &[i16], _sample_rate: u32, _quality: Quality) -> SfResult<Vec<u8>> {
        let mut out = MOCK_MAGIC.to_vec();
        out.extend(pcm_to_bytes(pcm));
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> SfResult<Vec<i16>> {
        match data.strip_prefix(MOCK_MAGIC.as_slice()) {
            Some(body) => pcm_from_bytes(body),
            None => Err(SfError::codec("identity", "missing stream header")),
        }
    }
}

/// Loses the final frame on decode, so verification must flag it.
pub struct DroppingCodec(pub Compression);

impl CodecBridge for DroppingCodec {
    fn name(&self) -> &'static str {
        "dropping"
    }

    fn compression(&self) -> Compression {
        self.0
    }

    fn encode(&self, pcm: &[i16], sample_rate: u32, quality: Quality) -> SfResult<Vec<u8>> {
        IdentityCodec(self.0).encode(pcm, sample_rate, quality)
    }

    fn decode(&self, data: &[u8]) -> SfResult<Vec<i16>> {
        let mut pcm = IdentityCodec(self.0).decode(data)?;
        pcm.pop();
        Ok(pcm)
    }
}

/// Rejects every input.
pub struct FailingCodec(pub Compression);

impl CodecBridge for FailingCodec {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn compression(&self) -> Compression {
        self.0
    }

    fn encode(&self, _pcm: &[i16], _sample_rate: u32, _quality: Quality) -> SfResult<Vec<u8>> {
        Err(SfError::codec("failing", "encoder rejected input"))
    }

    fn decode(&self, _data: &[u8]) -> SfResult<Vec<i16>> {
        Err(SfError::codec("failing", "decoder rejected input"))
    }
}

/// Identity codecs for both compressed kinds.
pub fn mock_registry() -> CodecRegistry {
    CodecRegistry::builder()
        .register(IdentityCodec(Compression::Vorbis))
        .register(IdentityCodec(Compression::Flac))
        .build()
}
