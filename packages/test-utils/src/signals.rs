//! Synthetic signal generators

use std::f64::consts::PI;

use anchorprint_fingerprint::AudioSignal;

/// Comfortable 16-bit PCM amplitude, well above the default peak bias
pub const PCM_AMPLITUDE: f64 = 10_000.0;

/// Generate a sine wave at a given frequency
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize, amplitude: f64) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (amplitude * (2.0 * PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// Cosine completing exactly `bin` periods in every `window_size` samples
///
/// The tone falls exactly on FFT coefficient `bin`, so each frame's energy
/// sits in a single band.
pub fn bin_centred_tone(bin: usize, window_size: usize, num_samples: usize, amplitude: f64) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let phase = 2.0 * PI * bin as f64 * (i % window_size) as f64 / window_size as f64;
            (amplitude * phase.cos()) as f32
        })
        .collect()
}

/// Generate white noise using a PCG-style generator
pub fn generate_noise(num_samples: usize, seed: u64, amplitude: f64) -> Vec<f32> {
    let mut state = seed.wrapping_add(1442695040888963407);
    (0..num_samples)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
            let rot = (state >> 59) as u32;
            let unit = xorshifted.rotate_right(rot) as f64 / u32::MAX as f64;
            ((unit * 2.0 - 1.0) * amplitude) as f32
        })
        .collect()
}

pub fn silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Builder that mixes tones and noise into an [`AudioSignal`]
#[derive(Debug, Clone)]
pub struct SignalBuilder {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl SignalBuilder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    /// Resize to exactly `frames` windows of `window_size` samples
    pub fn frames(mut self, window_size: usize, frames: usize) -> Self {
        self.samples.resize(window_size * frames, 0.0);
        self
    }

    /// Resize to an exact sample count
    pub fn length(mut self, num_samples: usize) -> Self {
        self.samples.resize(num_samples, 0.0);
        self
    }

    /// Add a bin-centred tone over the whole buffer
    pub fn tone_at_bin(self, bin: usize, window_size: usize, amplitude: f64) -> Self {
        let len = self.samples.len();
        self.tone_at_bin_in(bin, window_size, amplitude, 0..len)
    }

    /// Add a bin-centred tone over a sample range
    pub fn tone_at_bin_in(
        mut self,
        bin: usize,
        window_size: usize,
        amplitude: f64,
        range: std::ops::Range<usize>,
    ) -> Self {
        let end = range.end.min(self.samples.len());
        let tone = bin_centred_tone(bin, window_size, end, amplitude);
        for i in range.start..end {
            self.samples[i] += tone[i];
        }
        self
    }

    /// Add noise over the whole buffer
    pub fn noise(mut self, seed: u64, amplitude: f64) -> Self {
        let noise = generate_noise(self.samples.len(), seed, amplitude);
        for (sample, n) in self.samples.iter_mut().zip(noise) {
            *sample += n;
        }
        self
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn build(self, source_id: &str) -> AudioSignal {
        AudioSignal::new(self.samples, self.sample_rate, source_id)
    }
}

#[cfg(test)]
mod tests {
    use anchorprint_fingerprint::Signal;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        assert_eq!(generate_noise(64, 7, 1.0), generate_noise(64, 7, 1.0));
        assert_ne!(generate_noise(64, 7, 1.0), generate_noise(64, 8, 1.0));
    }

    #[rstest]
    #[case(1.0)]
    #[case(PCM_AMPLITUDE)]
    fn test_noise_respects_amplitude(#[case] amplitude: f64) {
        let noise = generate_noise(1000, 3, amplitude);
        assert!(noise.iter().all(|&n| (n.abs() as f64) <= amplitude * 1.0001));
    }

    #[test]
    fn test_bin_centred_tone_repeats_each_window() {
        let tone = bin_centred_tone(5, 64, 192, 1.0);
        assert_eq!(&tone[..64], &tone[64..128]);
        assert_eq!(&tone[..64], &tone[128..]);
    }

    #[test]
    fn test_builder_lengths_and_ranges() {
        let signal = SignalBuilder::new(8000)
            .frames(256, 4)
            .tone_at_bin_in(10, 256, 100.0, 256..512)
            .build("range");
        assert_eq!(signal.samples().len(), 1024);
        assert!(signal.samples()[..256].iter().all(|&s| s == 0.0));
        assert!(signal.samples()[256..512].iter().any(|&s| s != 0.0));
        assert!(signal.samples()[512..].iter().all(|&s| s == 0.0));
        assert_eq!(signal.source_id(), "range");
    }

    #[test]
    fn test_sine_starts_at_zero() {
        let sine = generate_sine(440.0, 44100, 10, 1.0);
        assert_eq!(sine[0], 0.0);
    }
}
