//! Convert command implementation
//!
//! Writes the bank in the target format. Output is staged in a temporary
//! file beside the destination and only renamed into place once complete.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use sfconv_core::{CodecRegistry, SoundFont, WriteOptions, WriteSummary};
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;

/// Run the convert command
///
/// # Arguments
/// * `bank` - Bank read from the input file
/// * `options` - Target format and quality
/// * `out_path` - Destination file
/// * `codecs` - Codec backends for compressed targets
pub fn run(
    bank: &mut SoundFont,
    options: &WriteOptions,
    out_path: &Path,
    codecs: &CodecRegistry,
) -> Result<WriteSummary> {
    let dir = match out_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    info!("Writing {}", out_path.display());
    let summary = bank
        .write(BufWriter::new(staged.as_file_mut()), options, codecs)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    staged
        .persist(out_path)
        .with_context(|| format!("Failed to save {}", out_path.display()))?;

    println!(
        "{} {} ({}, {} bytes)",
        "Wrote".green().bold(),
        out_path.display(),
        summary.format,
        summary.bytes_written
    );
    Ok(summary)
}
