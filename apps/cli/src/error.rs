//! Error types for audio decoding

use thiserror::Error;

/// Errors raised while turning an audio file into a signal
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No demuxer or codec recognised the file
    #[error("unsupported audio: {0}")]
    Unsupported(String),

    /// The container holds no decodable track
    #[error("no audio track found")]
    NoTrack,

    /// The track does not declare its sample rate
    #[error("track has no sample rate")]
    MissingSampleRate,

    /// Demuxing or decoding failed mid-stream
    #[error("decode failed: {0}")]
    Codec(#[from] symphonia::core::errors::Error),
}

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;
