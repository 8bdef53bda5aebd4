//! Dataset-wide candidate survey.

use rayon::prelude::*;
use specpick_core::detection::{PeakConfig, PeakDetection};
use specpick_core::signal::{FrameSignal, SignalStore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-frame summary of a store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSurvey {
    /// Frame id.
    pub frame_id: u32,
    /// Number of samples in the frame.
    pub samples: usize,
    /// Number of detected peak candidates.
    pub candidates: usize,
    /// Wavelength range `(min, max)`, or `None` for an empty frame.
    pub wavelength_range: Option<(f64, f64)>,
}

/// Runs `detector` over every frame that has samples, in parallel.
///
/// Results are returned in frame id order. Gap frames are not reported.
pub fn survey_frames<D: PeakDetection + ?Sized>(
    store: &SignalStore,
    detector: &D,
    config: &PeakConfig,
) -> Vec<FrameSurvey> {
    let frames: Vec<&FrameSignal> = store.frames().collect();
    frames
        .par_iter()
        .map(|signal| {
            let wavelengths = signal.wavelengths();
            FrameSurvey {
                frame_id: signal.frame_id(),
                samples: signal.len(),
                candidates: detector.detect(signal, config).len(),
                wavelength_range: wavelengths
                    .first()
                    .zip(wavelengths.last())
                    .map(|(lo, hi)| (*lo, *hi)),
            }
        })
        .collect()
}
