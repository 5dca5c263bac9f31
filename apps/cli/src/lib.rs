//! Command-line front end for anchorprint
//!
//! Decodes audio files, runs the fingerprint pipeline on each, and writes the
//! resulting tokens (or per-file summaries) as JSON Lines.

pub mod decode;
pub mod error;
pub mod report;

pub use decode::{decode_bytes, decode_file};
pub use error::{DecodeError, DecodeResult};
pub use report::{fingerprint_file, write_summary, write_tokens, FileReport, FileSummary};
