//! Dump command implementation
//!
//! Lists every preset as `index bank-program name`, or as a JSON array.

use anyhow::{Context, Result};
use sfconv_core::SoundFont;
use std::io::{self, Write};

/// Render the preset listing.
pub fn render(bank: &SoundFont, json: bool) -> Result<String> {
    let listing = bank.preset_listing();
    let mut out = String::new();
    if json {
        out = serde_json::to_string_pretty(&listing).context("Failed to serialize preset dump")?;
        out.push('\n');
    } else {
        for line in &listing {
            out.push_str(&line.to_string());
            out.push('\n');
        }
    }
    Ok(out)
}

/// Print the preset listing to stdout.
pub fn run(bank: &SoundFont, json: bool) -> Result<()> {
    let text = render(bank, json)?;
    io::stdout()
        .lock()
        .write_all(text.as_bytes())
        .context("Failed to write preset dump")
}
