//! Shared test utilities for the anchorprint workspace
//!
//! Deterministic synthetic signals for exercising the fingerprint pipeline
//! without audio files on disk, plus a minimal WAV writer for decoder tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use anchorprint_test_utils::{SignalBuilder, PCM_AMPLITUDE};
//!
//! let signal = SignalBuilder::new(44100)
//!     .tone_at_bin(100, 1024, PCM_AMPLITUDE)
//!     .frames(1024, 8)
//!     .build("tone");
//! ```

mod signals;
mod wav;

pub use signals::{
    bin_centred_tone, generate_noise, generate_sine, silence, SignalBuilder, PCM_AMPLITUDE,
};
pub use wav::generate_wav_bytes;
