//! Cross-frame peak suppression
//!
//! After a frame is analysed, the raw magnitudes around its peaks are smoothed
//! into a mask that is subtracted from the next frame only. Sustained tones
//! therefore score lower in the frames that follow their onset.

use anchorprint_shared_config::PeakConfig;

use crate::peaks::{extract_peaks, PeakList};

/// Gaussian support extends this many standard deviations each side
const TRUNCATE_SIGMAS: f64 = 4.0;

/// Carried suppression state between consecutive frames
#[derive(Debug, Clone)]
pub struct SuppressionTracker {
    mask: Vec<f64>,
    bias: f64,
    kernel: Vec<f64>,
}

impl SuppressionTracker {
    /// Start with an all-zero mask over `bands` bands
    pub fn new(bands: usize, config: &PeakConfig) -> Self {
        Self {
            mask: vec![0.0; bands],
            bias: config.bias,
            kernel: gaussian_kernel(config.smoothing_sigma),
        }
    }

    /// Mask that will be subtracted from the next frame
    pub fn mask(&self) -> &[f64] {
        &self.mask
    }

    /// `raw - mask - bias`, elementwise
    pub fn biased(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter()
            .zip(self.mask.iter())
            .map(|(&value, &suppressed)| value - suppressed - self.bias)
            .collect()
    }

    /// Analyse one frame and roll the mask forward for the next one
    pub fn process_frame(&mut self, raw: &[f64]) -> PeakList {
        let peaks = extract_peaks(&self.biased(raw));
        self.advance(raw, &peaks);
        peaks
    }

    /// Replace the mask with the smoothed raw magnitudes at `peaks`
    ///
    /// Each peak contributes the two raw samples at `peak - 1` and `peak`.
    pub fn advance(&mut self, raw: &[f64], peaks: &PeakList) {
        let bands = self.mask.len().min(raw.len());
        let mut seeded = vec![0.0; self.mask.len()];

        for &peak in peaks {
            if peak == 0 {
                continue;
            }
            let start = peak - 1;
            let end = (peak + 1).min(bands);
            if start < end {
                seeded[start..end].copy_from_slice(&raw[start..end]);
            }
        }

        self.mask = gaussian_smooth(&seeded, &self.kernel);
    }
}

/// Normalised Gaussian weights covering `±round(4σ)` samples
///
/// A non-positive sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 1e-15 {
        return vec![1.0];
    }

    let radius = (TRUNCATE_SIGMAS * sigma + 0.5) as i64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let total: f64 = weights.iter().sum();

    weights.into_iter().map(|w| w / total).collect()
}

/// Correlate `values` with a symmetric `kernel`, mirroring at the edges
///
/// Out-of-range positions reflect about the array edge including the edge
/// sample (`d c b a | a b c d | d c b a`).
pub fn gaussian_smooth(values: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = values.len() as i64;
    if n == 0 {
        return Vec::new();
    }
    let radius = (kernel.len() / 2) as i64;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| w * values[reflect_index(i + k as i64 - radius, n)])
                .sum()
        })
        .collect()
}

fn reflect_index(index: i64, len: i64) -> usize {
    let period = 2 * len;
    let folded = index.rem_euclid(period);
    if folded >= len {
        (period - 1 - folded) as usize
    } else {
        folded as usize
    }
}
