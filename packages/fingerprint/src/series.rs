//! Sequential peak series over a spectrogram
//!
//! Frames must be visited in time order: the suppression mask applied to
//! frame `t` is derived from the peaks found at frame `t - 1`.

use anchorprint_shared_config::{PeakConfig, SpectrogramConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::FingerprintResult;
use crate::peaks::PeakList;
use crate::signal::Signal;
use crate::spectrogram::{SpectrogramComputer, SpectrogramGrid};
use crate::suppression::SuppressionTracker;

/// Peaks detected in one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePeaks {
    /// Zero-based frame index
    pub frame: usize,
    /// Band indices, strongest first
    pub peaks: PeakList,
}

/// Ordered per-frame peaks for a whole signal
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintSeries {
    frames: Vec<FramePeaks>,
}

impl FingerprintSeries {
    /// Number frames consecutively from zero
    pub fn from_peak_lists(lists: impl IntoIterator<Item = PeakList>) -> Self {
        Self {
            frames: lists
                .into_iter()
                .enumerate()
                .map(|(frame, peaks)| FramePeaks { frame, peaks })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<&FramePeaks> {
        self.frames.get(frame)
    }

    pub fn frames(&self) -> &[FramePeaks] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FramePeaks> {
        self.frames.iter()
    }

    /// Total number of peaks across all frames
    pub fn peak_count(&self) -> usize {
        self.frames.iter().map(|f| f.peaks.len()).sum()
    }

    /// Flatten into `(frame, band)` points
    pub fn points(&self) -> Vec<(usize, usize)> {
        self.frames
            .iter()
            .flat_map(|f| f.peaks.iter().map(move |&band| (f.frame, band)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FingerprintSeries {
    type Item = &'a FramePeaks;
    type IntoIter = std::slice::Iter<'a, FramePeaks>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Runs spectrogram computation followed by the sequential peak pass
pub struct FingerprintSeriesBuilder {
    computer: SpectrogramComputer,
    peaks: PeakConfig,
}

impl FingerprintSeriesBuilder {
    pub fn new(spectrogram: SpectrogramConfig, peaks: PeakConfig) -> FingerprintResult<Self> {
        peaks.validate()?;
        Ok(Self {
            computer: SpectrogramComputer::new(spectrogram)?,
            peaks,
        })
    }

    pub fn computer(&self) -> &SpectrogramComputer {
        &self.computer
    }

    /// Compute the spectrogram of `signal` and extract its peak series
    pub fn build(&self, signal: &impl Signal) -> FingerprintResult<FingerprintSeries> {
        let grid = self.computer.compute(signal)?;
        Ok(series_from_grid(&grid, &self.peaks))
    }
}

/// Extract peaks frame by frame, threading the suppression mask through
pub fn series_from_grid(grid: &SpectrogramGrid, config: &PeakConfig) -> FingerprintSeries {
    let tracker = SuppressionTracker::new(grid.bands(), config);

    let frames: Vec<FramePeaks> = grid
        .rows()
        .enumerate()
        .scan(tracker, |tracker, (frame, raw)| {
            let peaks = tracker.process_frame(raw);
            trace!("Frame {}: peaks {:?}", frame, peaks.as_slice());
            Some(FramePeaks { frame, peaks })
        })
        .collect();

    let series = FingerprintSeries { frames };
    debug!(
        "Extracted {} peaks over {} frames",
        series.peak_count(),
        series.len()
    );
    series
}
