//! Strict local-maximum peak detection.

use specpick_core::detection::{PeakConfig, PeakDetection};
use specpick_core::signal::FrameSignal;

/// Returns indices `i` where `intensities[i] >= min_height` and
/// `intensities[i]` is strictly greater than both neighbours.
///
/// The first and last samples are never peaks, and neither is any sample on
/// a plateau. Indices come back strictly increasing.
#[must_use]
pub fn find_peaks(intensities: &[f64], min_height: f64) -> Vec<usize> {
    intensities
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2] && w[1] >= min_height)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Detector that reports strict interior local maxima.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalMaximaDetector;

impl LocalMaximaDetector {
    /// Creates the detector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PeakDetection for LocalMaximaDetector {
    fn detect(&self, signal: &FrameSignal, config: &PeakConfig) -> Vec<usize> {
        find_peaks(signal.intensities(), config.min_height)
    }

    fn name(&self) -> &'static str {
        "local-maxima"
    }
}
