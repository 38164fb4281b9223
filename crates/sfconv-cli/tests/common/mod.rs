//! One-sample bank builder for end-to-end runs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn list(kind: &[u8; 4], leaves: &[Vec<u8>]) -> Vec<u8> {
    chunk(b"LIST", &[kind.to_vec(), leaves.concat()].concat())
}

fn name20(name: &str) -> Vec<u8> {
    let mut out = vec![0u8; 20];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out
}

fn le16(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn le32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Bag pairs used by the single instrument zone.
pub const GOOD_IBAG: &[u16] = &[0, 0, 1, 0];

/// Descending generator indices.
pub const DESCENDING_IBAG: &[u16] = &[0, 1, 0, 0];

/// One preset, one instrument, one unlooped sample of `frames` frames.
pub fn minimal_sf2(frames: usize, ibag: &[u16]) -> Vec<u8> {
    let pcm: Vec<u8> = (0..frames)
        .flat_map(|i| (((i as f32 * 0.07).sin() * 9000.0) as i16).to_le_bytes())
        .collect();

    let info = list(
        b"INFO",
        &[
            chunk(b"ifil", &le16(&[2, 1])),
            chunk(b"isng", b"EMU8000\0"),
            chunk(b"INAM", b"CLI Bank\0\0"),
        ],
    );
    let sdta = list(b"sdta", &[chunk(b"smpl", &pcm)]);

    let phdr = [
        name20("Grand Piano"),
        le16(&[0, 0, 0]),
        vec![0u8; 12],
        name20(""),
        le16(&[0, 0, 1]),
        vec![0u8; 12],
    ]
    .concat();
    let inst = [name20("Piano"), le16(&[0]), name20(""), le16(&[1])].concat();
    let shdr = [
        name20("Piano C4"),
        le32(&[0, frames as u32, 0, 0, 44100]),
        vec![60, 0],
        le16(&[0, 1]),
        vec![0u8; 46],
    ]
    .concat();

    let pdta = list(
        b"pdta",
        &[
            chunk(b"phdr", &phdr),
            chunk(b"pbag", &le16(&[0, 0, 1, 0])),
            chunk(b"pmod", &[0u8; 10]),
            chunk(b"pgen", &[le16(&[41, 0]), vec![0u8; 4]].concat()),
            chunk(b"inst", &inst),
            chunk(b"ibag", &le16(ibag)),
            chunk(b"imod", &[0u8; 10]),
            chunk(b"igen", &[le16(&[53, 0]), vec![0u8; 4]].concat()),
            chunk(b"shdr", &shdr),
        ],
    );

    chunk(b"RIFF", &[b"sfbk".to_vec(), info, sdta, pdta].concat())
}

/// Writes `bytes` to `dir/name` and returns the path.
pub fn write_bank(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
