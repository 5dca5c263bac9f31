//! Input signal abstraction
//!
//! The pipeline only needs read access to a fully decoded mono buffer, its
//! sample rate, and a label identifying where it came from. Decoding lives
//! outside this crate.

/// A fully buffered mono signal
///
/// Samples are expected at 16-bit PCM amplitude scale (roughly
/// `-32768.0..=32767.0`); the default peak bias is calibrated for it.
pub trait Signal {
    /// Ordered samples
    fn samples(&self) -> &[f32];

    /// Samples per second
    fn sample_rate(&self) -> u32;

    /// Identifier carried into every token built from this signal
    fn source_id(&self) -> &str;
}

/// Owned in-memory signal
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
    source_id: String,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32, source_id: impl Into<String>) -> Self {
        Self {
            samples,
            sample_rate,
            source_id: source_id.into(),
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl Signal for AudioSignal {
    fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl<S: Signal + ?Sized> Signal for &S {
    fn samples(&self) -> &[f32] {
        (**self).samples()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn source_id(&self) -> &str {
        (**self).source_id()
    }
}
