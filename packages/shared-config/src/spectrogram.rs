//! Spectrogram framing parameters

use serde::{Deserialize, Serialize};

use crate::{parse_env, ConfigError, ConfigResult};

/// Default samples per analysis frame
pub const DEFAULT_WINDOW_SIZE: usize = 1024;

/// Default number of FFT coefficients summed into one band
pub const DEFAULT_BIN_SIZE: usize = 2;

/// Framing and band aggregation for the magnitude grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    /// Samples per non-overlapping frame (positive, even)
    pub window_size: usize,

    /// Adjacent FFT coefficients summed into each band
    pub bin_size: usize,
}

impl SpectrogramConfig {
    /// Create a configuration with explicit sizes
    pub fn new(window_size: usize, bin_size: usize) -> Self {
        Self {
            window_size,
            bin_size,
        }
    }

    /// Load spectrogram configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            window_size: parse_env("ANCHORPRINT_WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?,
            bin_size: parse_env("ANCHORPRINT_BIN_SIZE", DEFAULT_BIN_SIZE)?,
        })
    }

    /// Number of bands per frame, `window_size / (2 * bin_size)`
    ///
    /// Returns 0 when `bin_size` is zero.
    pub fn bands(&self) -> usize {
        if self.bin_size == 0 {
            return 0;
        }
        self.window_size / 2 / self.bin_size
    }

    /// Number of complete frames that fit into `sample_count` samples
    pub fn frames_for(&self, sample_count: usize) -> usize {
        if self.window_size == 0 {
            return 0;
        }
        sample_count / self.window_size
    }

    /// Check that the sizes describe at least one band
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window_size == 0 || self.window_size % 2 != 0 {
            return Err(ConfigError::ValidationError(format!(
                "window_size must be a positive even integer, got {}",
                self.window_size
            )));
        }
        if self.bin_size == 0 {
            return Err(ConfigError::ValidationError(
                "bin_size must be positive".to_string(),
            ));
        }
        if self.bands() == 0 {
            return Err(ConfigError::ValidationError(format!(
                "bin_size {} leaves no bands for window_size {}",
                self.bin_size, self.window_size
            )));
        }
        Ok(())
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            bin_size: DEFAULT_BIN_SIZE,
        }
    }
}
