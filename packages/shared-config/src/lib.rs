//! Shared configuration types for anchorprint
//!
//! This crate holds the tunable parameters of the fingerprinting pipeline,
//! their defaults, and their validation rules. Both the core library and the
//! command-line tool read their settings through these types.

mod anchors;
mod error;
mod peaks;
mod spectrogram;

pub use anchors::{AnchorConfig, DEFAULT_HEIGHT, DEFAULT_LEFT_OFFSET, DEFAULT_WIDTH};
pub use error::{ConfigError, ConfigResult};
pub use peaks::{
    PeakConfig, DEFAULT_BIAS, DEFAULT_SMOOTHING_SIGMA, MAX_PEAKS_PER_FRAME, PEAK_ACCEPTANCE_RATIO,
};
pub use spectrogram::{SpectrogramConfig, DEFAULT_BIN_SIZE, DEFAULT_WINDOW_SIZE};

use serde::{Deserialize, Serialize};
use std::env;

/// Every parameter of the extraction pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Framing and band aggregation
    pub spectrogram: SpectrogramConfig,

    /// Peak thresholds and suppression smoothing
    pub peaks: PeakConfig,

    /// Anchor/target pairing window
    pub anchors: AnchorConfig,
}

impl FingerprintConfig {
    /// Load the pipeline configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            spectrogram: SpectrogramConfig::from_env()?,
            peaks: PeakConfig::from_env()?,
            anchors: AnchorConfig::from_env()?,
        })
    }

    /// Validate all sections, reporting the first failure
    pub fn validate(&self) -> ConfigResult<()> {
        self.spectrogram.validate()?;
        self.peaks.validate()?;
        self.anchors.validate()
    }
}

/// Configuration shared by every binary in the workspace
#[derive(Debug, Clone)]
pub struct CommonConfig {
    /// Pipeline parameters
    pub fingerprint: FingerprintConfig,

    /// Log level (from RUST_LOG or LOG_LEVEL)
    pub log_level: String,
}

impl CommonConfig {
    /// Load common configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            fingerprint: FingerprintConfig::from_env()?,
            log_level: Self::log_level_from_env(),
        })
    }

    /// Log level alone, readable before the pipeline parameters are parsed
    pub fn log_level_from_env() -> String {
        env::var("RUST_LOG")
            .or_else(|_| env::var("LOG_LEVEL"))
            .unwrap_or_else(|_| "info".to_string())
    }
}

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to parse an environment variable into a specific type
pub fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
