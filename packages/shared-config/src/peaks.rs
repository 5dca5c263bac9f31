//! Peak picking and suppression parameters

use serde::{Deserialize, Serialize};

use crate::{parse_env, ConfigError, ConfigResult};

/// Upper bound on peaks reported for a single frame
pub const MAX_PEAKS_PER_FRAME: usize = 5;

/// A candidate must exceed this fraction of the frame's strongest candidate
pub const PEAK_ACCEPTANCE_RATIO: f64 = 0.5;

/// Default constant subtracted from every band before peak search
pub const DEFAULT_BIAS: f64 = 25.0;

/// Default standard deviation (in bands) of the suppression smoothing
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 2.0;

/// Thresholds for per-frame peak detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Additive threshold removed from every band magnitude
    pub bias: f64,

    /// Gaussian sigma used to spread the suppression mask across bands
    pub smoothing_sigma: f64,
}

impl PeakConfig {
    /// Load peak configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            bias: parse_env("ANCHORPRINT_BIAS", DEFAULT_BIAS)?,
            smoothing_sigma: parse_env("ANCHORPRINT_SMOOTHING_SIGMA", DEFAULT_SMOOTHING_SIGMA)?,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.bias.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "bias must be finite, got {}",
                self.bias
            )));
        }
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "smoothing_sigma must be finite and non-negative, got {}",
                self.smoothing_sigma
            )));
        }
        Ok(())
    }
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            bias: DEFAULT_BIAS,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
        }
    }
}
