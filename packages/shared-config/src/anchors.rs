//! Anchor/target search window parameters

use serde::{Deserialize, Serialize};

use crate::{parse_env, ConfigError, ConfigResult};

pub const DEFAULT_LEFT_OFFSET: usize = 1;
pub const DEFAULT_WIDTH: usize = 4;
pub const DEFAULT_HEIGHT: usize = 16;

/// Target zone searched for each anchor peak
///
/// Targets are taken from frames `t + left_offset .. t + left_offset + width`
/// and from bands within `height / 2` of the anchor band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Frames skipped between the anchor and the first searched frame
    pub left_offset: usize,

    /// Number of consecutive frames searched
    pub width: usize,

    /// Total band span of the target zone, centred on the anchor
    pub height: usize,
}

impl AnchorConfig {
    /// Load anchor configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            left_offset: parse_env("ANCHORPRINT_LEFT_OFFSET", DEFAULT_LEFT_OFFSET)?,
            width: parse_env("ANCHORPRINT_WIDTH", DEFAULT_WIDTH)?,
            height: parse_env("ANCHORPRINT_HEIGHT", DEFAULT_HEIGHT)?,
        })
    }

    /// Largest allowed band distance between anchor and target
    pub fn half_height(&self) -> usize {
        self.height / 2
    }

    /// Inclusive range of frame deltas a token can carry
    pub fn frame_delta_range(&self) -> std::ops::RangeInclusive<usize> {
        self.left_offset..=self.left_offset.saturating_add(self.width.saturating_sub(1))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.left_offset == 0 {
            return Err(ConfigError::ValidationError(
                "left_offset must be at least 1".to_string(),
            ));
        }
        if self.width == 0 {
            return Err(ConfigError::ValidationError(
                "width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            left_offset: DEFAULT_LEFT_OFFSET,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}
