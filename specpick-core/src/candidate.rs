//! Peak candidates and the cursor that walks them.

use crate::detection::{PeakConfig, PeakDetection};
use crate::signal::FrameSignal;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A detected peak eligible for confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// Peak wavelength.
    pub wavelength: f64,
    /// Peak intensity.
    pub intensity: f64,
}

impl Candidate {
    /// Creates a candidate.
    #[must_use]
    pub fn new(wavelength: f64, intensity: f64) -> Self {
        Self {
            wavelength,
            intensity,
        }
    }
}

/// Candidate list for the active frame plus a cursor into it.
///
/// The cursor is always inside `[0, len - 1]` while the list is non-empty.
#[derive(Debug, Clone, Default)]
pub struct CandidateNavigator {
    frame_id: u32,
    positions: Vec<Candidate>,
    cursor: usize,
}

impl CandidateNavigator {
    /// Creates a navigator over `positions` (ascending wavelength), cursor at 0.
    #[must_use]
    pub fn new(frame_id: u32, positions: Vec<Candidate>) -> Self {
        Self {
            frame_id,
            positions,
            cursor: 0,
        }
    }

    /// Runs `detector` over `signal` and wraps the resulting peaks.
    pub fn detect<D: PeakDetection + ?Sized>(
        detector: &D,
        signal: &FrameSignal,
        config: &PeakConfig,
    ) -> Self {
        let positions = detector
            .detect(signal, config)
            .into_iter()
            .filter_map(|index| signal.sample(index))
            .map(|(wavelength, intensity)| Candidate::new(wavelength, intensity))
            .collect();
        Self::new(signal.frame_id(), positions)
    }

    /// Returns the frame these candidates belong to.
    #[must_use]
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Returns all candidates in ascending wavelength order.
    #[must_use]
    pub fn positions(&self) -> &[Candidate] {
        &self.positions
    }

    /// Returns the cursor, or `None` if there are no candidates.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        (!self.positions.is_empty()).then_some(self.cursor)
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the frame has no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn ensure_non_empty(&self) -> Result<()> {
        if self.positions.is_empty() {
            return Err(Error::EmptyCandidateSet {
                frame_id: self.frame_id,
            });
        }
        Ok(())
    }

    /// Moves the cursor to the candidate closest to `target` and returns its index.
    ///
    /// Ties go to the lower index.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if there are no candidates.
    pub fn seek_nearest(&mut self, target: f64) -> Result<usize> {
        self.ensure_non_empty()?;

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, candidate) in self.positions.iter().enumerate() {
            let distance = (candidate.wavelength - target).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        self.cursor = best;
        Ok(best)
    }

    /// Shifts the cursor by `delta`, clamped to the candidate range.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if there are no candidates.
    pub fn move_by(&mut self, delta: isize) -> Result<usize> {
        self.ensure_non_empty()?;

        let last = self.positions.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        Ok(self.cursor)
    }

    /// Returns the highlighted candidate.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if there are no candidates.
    pub fn current(&self) -> Result<Candidate> {
        self.ensure_non_empty()?;
        Ok(self.positions[self.cursor])
    }
}
