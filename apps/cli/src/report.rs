//! Per-file fingerprinting and JSON Lines output

use std::io::Write;
use std::path::Path;

use anchorprint_fingerprint::{Fingerprinter, Signal, Token};
use anyhow::Context;
use serde::Serialize;

use crate::decode::decode_file;

/// Outcome of fingerprinting one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub summary: FileSummary,
    pub tokens: Vec<Token>,
}

/// Counts reported with `--summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub source_id: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub frames: usize,
    pub peaks: usize,
    pub tokens: usize,
}

/// Decode `path` and fingerprint it
pub fn fingerprint_file(fingerprinter: &Fingerprinter, path: &Path) -> anyhow::Result<FileReport> {
    let signal =
        decode_file(path).with_context(|| format!("failed to decode {}", path.display()))?;
    let fingerprint = fingerprinter
        .fingerprint(&signal)
        .with_context(|| format!("failed to fingerprint {}", path.display()))?;

    Ok(FileReport {
        summary: FileSummary {
            source_id: signal.source_id().to_string(),
            sample_rate: signal.sample_rate(),
            duration_secs: signal.duration_secs(),
            frames: fingerprint.series.len(),
            peaks: fingerprint.series.peak_count(),
            tokens: fingerprint.tokens.len(),
        },
        tokens: fingerprint.tokens,
    })
}

/// Write one JSON object per token
pub fn write_tokens<W: Write>(out: &mut W, tokens: &[Token]) -> anyhow::Result<()> {
    for token in tokens {
        serde_json::to_writer(&mut *out, token)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Write a single JSON summary line
pub fn write_summary<W: Write>(out: &mut W, summary: &FileSummary) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, summary)?;
    out.write_all(b"\n")?;
    Ok(())
}
