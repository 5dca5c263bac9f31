//! Magnitude spectrogram over non-overlapping frames
//!
//! Each frame of `window_size` samples is transformed with a real-input FFT,
//! then adjacent coefficient magnitudes are summed into `bin_size`-wide bands.
//! Bands are stored highest frequency first.
//!
//! The frame window is rectangular. No taper is applied, so energy from
//! off-bin tones leaks into neighbouring bands; peak picking and token
//! layout depend on this exact behaviour.

use std::sync::Arc;

use anchorprint_shared_config::SpectrogramConfig;
use rayon::prelude::*;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use tracing::debug;

use crate::error::{FingerprintError, FingerprintResult};
use crate::signal::Signal;

/// Dense `frames × bands` grid of band magnitudes, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramGrid {
    frames: usize,
    bands: usize,
    data: Vec<f64>,
}

impl SpectrogramGrid {
    /// Build a grid from per-frame rows of equal length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> FingerprintResult<Self> {
        let frames = rows.len();
        let bands = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != bands) {
            return Err(FingerprintError::InvalidParameters(format!(
                "row {} has {} bands, expected {}",
                bad,
                rows[bad].len(),
                bands
            )));
        }

        Ok(Self {
            frames,
            bands,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    /// `(frames, bands)`
    pub fn shape(&self) -> (usize, usize) {
        (self.frames, self.bands)
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Band magnitudes of one frame
    ///
    /// # Panics
    ///
    /// Panics if `frame >= self.frames()`.
    pub fn frame(&self, frame: usize) -> &[f64] {
        let start = frame * self.bands;
        &self.data[start..start + self.bands]
    }

    /// Iterate frames in time order
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics; a zero-band grid has no rows to yield anyway
        self.data.chunks_exact(self.bands.max(1))
    }

    pub fn get(&self, frame: usize, band: usize) -> Option<f64> {
        if frame >= self.frames || band >= self.bands {
            return None;
        }
        Some(self.data[frame * self.bands + band])
    }
}

/// Spectrogram builder with a pre-planned FFT
pub struct SpectrogramComputer {
    /// Real-to-complex FFT plan, shared by all worker threads
    fft: Arc<dyn RealToComplex<f64>>,
    /// Per-sample window weights (all ones)
    window: Vec<f64>,
    config: SpectrogramConfig,
}

impl SpectrogramComputer {
    /// Plan the FFT for `config`, rejecting sizes that leave no bands
    pub fn new(config: SpectrogramConfig) -> FingerprintResult<Self> {
        config.validate()?;

        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(config.window_size);

        Ok(Self {
            fft,
            window: rectangular_window(config.window_size),
            config,
        })
    }

    pub fn config(&self) -> &SpectrogramConfig {
        &self.config
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    pub fn bands(&self) -> usize {
        self.config.bands()
    }

    /// Compute the grid for a signal
    pub fn compute(&self, signal: &impl Signal) -> FingerprintResult<SpectrogramGrid> {
        self.compute_samples(signal.samples())
    }

    /// Compute the grid for a raw sample buffer
    ///
    /// Frames are independent, so they are transformed in parallel. Samples
    /// past the last complete frame are ignored.
    pub fn compute_samples(&self, samples: &[f32]) -> FingerprintResult<SpectrogramGrid> {
        let window_size = self.config.window_size;
        let bin_size = self.config.bin_size;
        let bands = self.config.bands();
        let frames = self.config.frames_for(samples.len());

        if frames == 0 {
            return Err(FingerprintError::EmptySignal {
                samples: samples.len(),
                window_size,
            });
        }

        let mut data = vec![0.0f64; frames * bands];

        samples[..frames * window_size]
            .par_chunks_exact(window_size)
            .zip(data.par_chunks_mut(bands))
            .try_for_each_init(
                || {
                    (
                        self.fft.make_input_vec(),
                        self.fft.make_output_vec(),
                        self.fft.make_scratch_vec(),
                    )
                },
                |(input, spectrum, scratch), (chunk, row)| -> FingerprintResult<()> {
                    for ((slot, &sample), &weight) in
                        input.iter_mut().zip(chunk.iter()).zip(self.window.iter())
                    {
                        *slot = sample as f64 * weight;
                    }

                    self.fft.process_with_scratch(input, spectrum, scratch)?;
                    fold_bands(spectrum, bin_size, row);
                    Ok(())
                },
            )?;

        debug!(
            "Computed spectrogram: {} frames x {} bands ({} trailing samples dropped)",
            frames,
            bands,
            samples.len() - frames * window_size
        );

        Ok(SpectrogramGrid {
            frames,
            bands,
            data,
        })
    }
}

/// Compute the spectrogram of `signal` with a one-off FFT plan
pub fn compute_spectrogram(
    signal: &impl Signal,
    config: &SpectrogramConfig,
) -> FingerprintResult<SpectrogramGrid> {
    SpectrogramComputer::new(*config)?.compute(signal)
}

/// Sum `bin_size` coefficient magnitudes per band into `row`, reversed so
/// that `row[0]` holds the highest band
pub fn fold_bands(spectrum: &[Complex<f64>], bin_size: usize, row: &mut [f64]) {
    let bands = row.len();
    for (band, coefficients) in spectrum.chunks_exact(bin_size).take(bands).enumerate() {
        row[bands - band - 1] = coefficients.iter().map(|c| c.norm()).sum();
    }
}

fn rectangular_window(size: usize) -> Vec<f64> {
    vec![1.0; size]
}
