//! Minimal uncompressed bank builder.

#![allow(dead_code)]

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

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn halves(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A swept tone, loud enough that lossy coding has something to do.
pub fn tone(frames: usize) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            let t = i as f32 / 44100.0;
            ((t * 440.0 * (1.0 + t)).sin() * 16000.0) as i16
        })
        .collect()
}

/// One preset, one instrument and one looped sample per entry of `samples`.
pub fn sf2_bank(samples: &[(&str, Vec<i16>, u32, u32)]) -> Vec<u8> {
    let n = samples.len() as u16;

    let info = list(
        b"INFO",
        &[
            chunk(b"ifil", &halves(&[2, 1])),
            chunk(b"isng", b"EMU8000\0"),
            chunk(b"INAM", b"Codec Bank\0\0"),
        ],
    );

    let mut smpl = Vec::new();
    let mut shdr = Vec::new();
    let mut frame = 0u32;
    for (name, pcm, loop_start, loop_end) in samples {
        let len = pcm.len() as u32;
        shdr.extend(name20(name));
        shdr.extend(words(&[frame, frame + len, frame + loop_start, frame + loop_end, 44100]));
        shdr.extend([60, 0]);
        shdr.extend(halves(&[0, 1]));
        smpl.extend(pcm.iter().flat_map(|s| s.to_le_bytes()));
        frame += len;
    }
    shdr.extend(vec![0u8; 46]);

    let mut phdr = Vec::new();
    let mut inst = Vec::new();
    let mut pgen = Vec::new();
    let mut igen = Vec::new();
    for i in 0..n {
        phdr.extend(name20(&format!("Preset {}", i)));
        phdr.extend(halves(&[i, 0, i]));
        phdr.extend([0u8; 12]);
        inst.extend(name20(&format!("Inst {}", i)));
        inst.extend(halves(&[i]));
        pgen.extend(halves(&[41, i]));
        igen.extend(halves(&[53, i]));
    }
    phdr.extend(name20(""));
    phdr.extend(halves(&[0, 0, n]));
    phdr.extend([0u8; 12]);
    inst.extend(vec![0u8; 20]);
    inst.extend(halves(&[n]));
    pgen.extend([0u8; 4]);
    igen.extend([0u8; 4]);
    let bag: Vec<u16> = (0..=n).flat_map(|i| [i, 0]).collect();

    let pdta = list(
        b"pdta",
        &[
            chunk(b"phdr", &phdr),
            chunk(b"pbag", &halves(&bag)),
            chunk(b"pmod", &[0u8; 10]),
            chunk(b"pgen", &pgen),
            chunk(b"inst", &inst),
            chunk(b"ibag", &halves(&bag)),
            chunk(b"imod", &[0u8; 10]),
            chunk(b"igen", &igen),
            chunk(b"shdr", &shdr),
        ],
    );

    let sdta = list(b"sdta", &[chunk(b"smpl", &smpl)]);
    chunk(b"RIFF", &[b"sfbk".to_vec(), info, sdta, pdta].concat())
}
