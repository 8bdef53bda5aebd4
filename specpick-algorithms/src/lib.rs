//! specpick-algorithms: Peak detection for frame signals.
//!
//! This crate provides:
//! - **Local maxima** - strict interior maxima above a height threshold
//! - **Survey** - candidate counts for every frame of a store, in parallel
//!
#![warn(missing_docs)]

mod local_maxima;
mod survey;

pub use local_maxima::{find_peaks, LocalMaximaDetector};
pub use survey::{survey_frames, FrameSurvey};

// Re-export core detection traits
pub use specpick_core::detection::{PeakConfig, PeakDetection};
