//! Anchor-pair hash tokens
//!
//! Every peak is used as an anchor and paired with the peaks of a few
//! following frames that sit close to it in band index. The triple
//! `(anchor band, target band, frame delta)` does not depend on where the
//! pair occurs in the recording, which is what makes it usable as a lookup
//! key for excerpts.

use anchorprint_shared_config::AnchorConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FingerprintError, FingerprintResult};
use crate::series::{FingerprintSeries, FramePeaks};

/// Time-shift-invariant part of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenKey {
    pub anchor_band: usize,
    pub target_band: usize,
    pub frame_delta: usize,
}

/// One anchor/target pairing with its match metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub anchor_band: usize,
    pub target_band: usize,
    /// Frames between anchor and target, always at least 1
    pub frame_delta: usize,
    /// Start of the anchor frame in seconds
    pub anchor_time_seconds: f64,
    pub source_id: String,
}

impl Token {
    pub fn key(&self) -> TokenKey {
        TokenKey {
            anchor_band: self.anchor_band,
            target_band: self.target_band,
            frame_delta: self.frame_delta,
        }
    }
}

/// Pairs anchors with targets inside a fixed time/band zone
#[derive(Debug, Clone, Copy)]
pub struct AnchorTokenGenerator {
    config: AnchorConfig,
}

impl AnchorTokenGenerator {
    pub fn new(config: AnchorConfig) -> FingerprintResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Emit every token of `series`
    ///
    /// Anchor frames are processed in parallel; the result is ordered by
    /// anchor frame, anchor rank, target frame, then target rank.
    pub fn generate(
        &self,
        series: &FingerprintSeries,
        window_size: usize,
        sample_rate: u32,
        source_id: &str,
    ) -> FingerprintResult<Vec<Token>> {
        if window_size == 0 {
            return Err(FingerprintError::InvalidParameters(
                "window_size must be positive".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(FingerprintError::InvalidParameters(
                "sample_rate must be positive".to_string(),
            ));
        }

        let frames = series.frames();

        let tokens: Vec<Token> = frames
            .par_iter()
            .enumerate()
            .flat_map_iter(|(time, anchors)| {
                let anchor_time_seconds = time as f64 * window_size as f64 / sample_rate as f64;
                self.pair_frame(frames, time, anchors)
                    .map(move |key| Token {
                        anchor_band: key.anchor_band,
                        target_band: key.target_band,
                        frame_delta: key.frame_delta,
                        anchor_time_seconds,
                        source_id: source_id.to_string(),
                    })
            })
            .collect();

        debug!(
            "Generated {} tokens from {} frames for {}",
            tokens.len(),
            frames.len(),
            source_id
        );
        Ok(tokens)
    }

    /// Keys for all anchors of the frame at `time`
    fn pair_frame<'a>(
        &'a self,
        frames: &'a [FramePeaks],
        time: usize,
        anchors: &'a FramePeaks,
    ) -> impl Iterator<Item = TokenKey> + 'a {
        let half = self.config.half_height();
        let first = time.saturating_add(self.config.left_offset);
        let last = first.saturating_add(self.config.width).min(frames.len());

        anchors.peaks.iter().flat_map(move |&anchor| {
            let low = anchor.saturating_sub(half);
            let high = anchor.saturating_add(half);

            frames
                .get(first..last)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .flat_map(move |(offset, targets)| {
                    targets
                        .peaks
                        .iter()
                        .filter(move |&&target| low <= target && target <= high)
                        .map(move |&target| TokenKey {
                            anchor_band: anchor,
                            target_band: target,
                            frame_delta: self.config.left_offset + offset,
                        })
                })
        })
    }
}
