//! Peak detection traits and configuration.

use crate::signal::FrameSignal;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for peak detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakConfig {
    /// Minimum intensity a sample needs to count as a peak.
    pub min_height: f64,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self { min_height: 0.0 }
    }
}

impl PeakConfig {
    /// Creates a peak configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum peak height.
    #[must_use]
    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `min_height` is NaN.
    pub fn validate(&self) -> Result<()> {
        if self.min_height.is_nan() {
            return Err(Error::ConfigError("min_height must not be NaN".to_string()));
        }
        Ok(())
    }
}

/// Trait for peak detection algorithms.
///
/// Implementations are pure: the same signal and configuration always
/// produce the same indices.
pub trait PeakDetection: Send + Sync {
    /// Returns sample indices of the peaks in `signal`, strictly increasing.
    fn detect(&self, signal: &FrameSignal, config: &PeakConfig) -> Vec<usize>;

    /// Returns the name of the algorithm.
    fn name(&self) -> &'static str;
}

impl<D: PeakDetection + ?Sized> PeakDetection for &D {
    fn detect(&self, signal: &FrameSignal, config: &PeakConfig) -> Vec<usize> {
        (**self).detect(signal, config)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<D: PeakDetection + ?Sized> PeakDetection for Box<D> {
    fn detect(&self, signal: &FrameSignal, config: &PeakConfig) -> Vec<usize> {
        (**self).detect(signal, config)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
