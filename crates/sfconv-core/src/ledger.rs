//! Sample verification ledger (`shdX`).
//!
//! The ledger records each sample's pre-compression frame count and loop
//! points so a decoder can confirm the round trip kept sample-accurate
//! geometry. Entries are matched to samples by position; the stored name is
//! only a sanity check.

use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Seek, Write};

use crate::error::{SfError, SfResult};
use crate::model::{Sample, VerificationRecord};
use crate::riff::tags::{self, record, NAME_LEN};
use crate::riff::{ChunkHeader, ChunkReader, ChunkWriter};

/// Reads ledger entries and attaches them to `samples` positionally.
pub(crate) fn read_records<R: Read + Seek>(
    r: &mut ChunkReader<R>,
    header: &ChunkHeader,
    samples: &mut [Sample],
) -> SfResult<()> {
    if header.len % record::SHDX != 0 {
        return Err(SfError::structure(format!(
            "'shdX' length {} is not a multiple of {}",
            header.len,
            record::SHDX
        )));
    }
    let count = (header.len / record::SHDX) as usize;
    if count != samples.len() + 1 {
        return Err(SfError::structure(format!(
            "'shdX' holds {} records, expected {} samples plus terminator",
            count,
            samples.len()
        )));
    }
    debug!("Reading verification data for {} samples", samples.len());
    for sample in samples.iter_mut() {
        let name = r.read_fixed_text(NAME_LEN)?;
        let frames = r.read_u32()?;
        let loop_start = r.read_u32()?;
        let loop_end = r.read_u32()?;
        if sample.name != name.as_str() {
            warn!(
                "Verification entry '{}' does not match sample '{}'",
                name, sample.name
            );
        }
        sample.verification = Some(VerificationRecord {
            name: name.as_str().into(),
            frames,
            loop_start,
            loop_end,
        });
    }
    r.skip(u64::from(record::SHDX))
}

/// True if every sample carries a verification record.
pub fn is_complete(samples: &[Sample]) -> bool {
    samples.iter().all(|s| s.verification.is_some())
}

/// Writes the ledger if every sample carries a record. Returns whether it was written.
pub(crate) fn write_records<W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    samples: &[Sample],
) -> SfResult<bool> {
    if !is_complete(samples) {
        debug!("Skipping verification data, not every sample has a record");
        return Ok(false);
    }

    w.begin_chunk(tags::pdta::SHDX)?;
    for entry in samples.iter().filter_map(|s| s.verification.as_ref()) {
        write_entry(w, entry)?;
    }
    write_entry(w, &VerificationRecord::default())?;
    w.end_chunk()?;
    Ok(true)
}

fn write_entry<W: Write + Seek>(
    w: &mut ChunkWriter<W>,
    entry: &VerificationRecord,
) -> SfResult<()> {
    w.write_fixed_text(entry.name.as_str(), NAME_LEN)?;
    w.write_u32(entry.frames)?;
    w.write_u32(entry.loop_start)?;
    w.write_u32(entry.loop_end)
}

/// A sample whose decoded geometry disagrees with its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationFailure {
    /// Sample index.
    pub index: usize,
    /// Sample name.
    pub name: String,
    /// Recorded frame count.
    pub expected_frames: u32,
    /// Decoded frame count.
    pub actual_frames: u32,
    /// Recorded loop span.
    pub expected_loop_span: i64,
    /// Decoded loop span.
    pub actual_loop_span: i64,
}

/// Outcome of checking every sample against its record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Samples that carried a record.
    pub checked: usize,
    /// Samples that carried no record.
    pub unchecked: usize,
    /// Mismatches.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// True if no checked sample failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Checks each sample against its record, logging failures as warnings.
pub fn verify(samples: &[Sample]) -> VerificationReport {
    let mut report = VerificationReport::default();
    for (index, sample) in samples.iter().enumerate() {
        let Some(record) = &sample.verification else {
            report.unchecked += 1;
            continue;
        };
        report.checked += 1;
        if record.matches(sample) {
            continue;
        }
        warn!(
            "Sample '{}' failed verification: {} frames (expected {}), loop span {} (expected {})",
            sample.name,
            sample.frame_count(),
            record.frames,
            sample.loop_span(),
            record.loop_span()
        );
        report.failures.push(VerificationFailure {
            index,
            name: sample.name.to_string(),
            expected_frames: record.frames,
            actual_frames: sample.frame_count(),
            expected_loop_span: record.loop_span(),
            actual_loop_span: sample.loop_span(),
        });
    }
    report
}
