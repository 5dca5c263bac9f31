//! Per-frame peak picking
//!
//! A frame's peaks are its strongest strict local maxima, capped at
//! [`MAX_PEAKS_PER_FRAME`] and filtered against the frame's top candidate.

use anchorprint_shared_config::{MAX_PEAKS_PER_FRAME, PEAK_ACCEPTANCE_RATIO};
use serde::{Deserialize, Serialize};

/// Band indices of one frame's peaks, strongest first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakList(Vec<usize>);

impl PeakList {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn contains(&self, band: usize) -> bool {
        self.0.contains(&band)
    }
}

impl From<Vec<usize>> for PeakList {
    fn from(bands: Vec<usize>) -> Self {
        Self(bands)
    }
}

impl<'a> IntoIterator for &'a PeakList {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Pick the significant peaks of a biased magnitude vector
///
/// Candidates are indices strictly greater than both neighbours, so the first
/// and last index never qualify. Candidates are ranked by value (ties keep
/// index order); of the first five, those above zero and above half the top
/// value are kept.
pub fn extract_peaks(values: &[f64]) -> PeakList {
    let mut candidates: Vec<(usize, f64)> = values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, w)| (i + 1, w[1]))
        .collect();

    if candidates.is_empty() {
        return PeakList::default();
    }

    // Stable sort keeps equal values in ascending index order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top = candidates[0].1;

    candidates
        .into_iter()
        .take(MAX_PEAKS_PER_FRAME)
        .filter(|&(_, value)| value > 0.0 && value > PEAK_ACCEPTANCE_RATIO * top)
        .map(|(index, _)| index)
        .collect::<Vec<_>>()
        .into()
}
