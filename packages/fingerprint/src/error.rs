//! Error types for fingerprint extraction

use anchorprint_shared_config::ConfigError;
use thiserror::Error;

/// Errors that stop the pipeline before any token is produced
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// Window, band or search parameters cannot describe a valid pipeline
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The signal does not fill a single analysis window
    #[error("signal of {samples} samples is shorter than one {window_size}-sample window")]
    EmptySignal { samples: usize, window_size: usize },

    /// The FFT backend rejected its buffers
    #[error("FFT error: {0}")]
    Fft(String),
}

impl FingerprintError {
    /// Whether this error comes from configuration rather than the input signal
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(self, FingerprintError::InvalidParameters(_))
    }
}

impl From<ConfigError> for FingerprintError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(msg) => FingerprintError::InvalidParameters(msg),
            other => FingerprintError::InvalidParameters(other.to_string()),
        }
    }
}

impl From<realfft::FftError> for FingerprintError {
    fn from(err: realfft::FftError) -> Self {
        FingerprintError::Fft(err.to_string())
    }
}

/// Result type for fingerprint operations
pub type FingerprintResult<T> = Result<T, FingerprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_becomes_invalid_parameters() {
        let err: FingerprintError =
            ConfigError::ValidationError("width must be at least 1".to_string()).into();
        assert!(err.is_fatal_configuration());
        assert_eq!(err.to_string(), "invalid parameters: width must be at least 1");
    }

    #[test]
    fn test_empty_signal_is_not_configuration() {
        let err = FingerprintError::EmptySignal {
            samples: 10,
            window_size: 1024,
        };
        assert!(!err.is_fatal_configuration());
        assert!(err.to_string().contains("10 samples"));
    }
}
