//! Acoustic fingerprint extraction
//!
//! Converts a buffered mono signal into anchor-pair hash tokens:
//!
//! 1. [`SpectrogramComputer`] frames the signal and folds FFT magnitudes into
//!    bands (frames in parallel).
//! 2. [`series_from_grid`] walks the frames in order, subtracting a
//!    [`SuppressionTracker`] mask and a fixed bias before [`extract_peaks`].
//! 3. [`AnchorTokenGenerator`] pairs every peak with nearby peaks in the next
//!    few frames (anchors in parallel).
//!
//! [`Fingerprinter`] wires the stages together from one validated
//! [`FingerprintConfig`].
//!
//! # Example
//!
//! ```rust,ignore
//! use anchorprint_fingerprint::{AudioSignal, Fingerprinter};
//!
//! let signal = AudioSignal::new(samples, 44100, "track.wav");
//! let fingerprinter = Fingerprinter::new(Default::default())?;
//! for token in fingerprinter.tokens(&signal)? {
//!     println!("{:?} @ {:.2}s", token.key(), token.anchor_time_seconds);
//! }
//! ```

mod error;
mod peaks;
mod series;
mod signal;
mod spectrogram;
mod suppression;
mod token;

pub use anchorprint_shared_config::{
    AnchorConfig, FingerprintConfig, PeakConfig, SpectrogramConfig,
};
pub use error::{FingerprintError, FingerprintResult};
pub use peaks::{extract_peaks, PeakList};
pub use series::{series_from_grid, FingerprintSeries, FingerprintSeriesBuilder, FramePeaks};
pub use signal::{AudioSignal, Signal};
pub use spectrogram::{compute_spectrogram, fold_bands, SpectrogramComputer, SpectrogramGrid};
pub use suppression::{gaussian_kernel, gaussian_smooth, SuppressionTracker};
pub use token::{AnchorTokenGenerator, Token, TokenKey};

use tracing::info;

/// Full extraction pipeline for one configuration
pub struct Fingerprinter {
    series: FingerprintSeriesBuilder,
    tokens: AnchorTokenGenerator,
    config: FingerprintConfig,
}

impl Fingerprinter {
    /// Validate `config` and plan the FFT
    pub fn new(config: FingerprintConfig) -> FingerprintResult<Self> {
        config.validate()?;
        Ok(Self {
            series: FingerprintSeriesBuilder::new(config.spectrogram, config.peaks)?,
            tokens: AnchorTokenGenerator::new(config.anchors)?,
            config,
        })
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Band magnitudes of every complete frame
    pub fn spectrogram(&self, signal: &impl Signal) -> FingerprintResult<SpectrogramGrid> {
        self.series.computer().compute(signal)
    }

    /// Per-frame peaks after suppression
    pub fn fingerprints(&self, signal: &impl Signal) -> FingerprintResult<FingerprintSeries> {
        self.series.build(signal)
    }

    /// Peak series and hash tokens for `signal`
    pub fn fingerprint(&self, signal: &impl Signal) -> FingerprintResult<Fingerprint> {
        let series = self.fingerprints(signal)?;
        let tokens = self.tokens.generate(
            &series,
            self.config.spectrogram.window_size,
            signal.sample_rate(),
            signal.source_id(),
        )?;

        info!(
            "Fingerprinted {}: {} frames, {} peaks, {} tokens",
            signal.source_id(),
            series.len(),
            series.peak_count(),
            tokens.len()
        );
        Ok(Fingerprint { series, tokens })
    }

    /// Hash tokens for `signal`, ordered by anchor time
    pub fn tokens(&self, signal: &impl Signal) -> FingerprintResult<Vec<Token>> {
        Ok(self.fingerprint(signal)?.tokens)
    }
}

/// Everything extracted from one signal
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub series: FingerprintSeries,
    pub tokens: Vec<Token>,
}
