//! Frame signals and the read-only signal store.

use std::collections::BTreeMap;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One frame's intensity signal over an ascending wavelength axis.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSignal {
    frame_id: u32,
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl FrameSignal {
    /// Builds a signal from parallel arrays.
    ///
    /// Samples are sorted by wavelength; they do not need to arrive in order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSignal`] if the arrays differ in length, if the
    /// frame id is zero, or if any wavelength is non-finite or repeated.
    pub fn new(frame_id: u32, wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self> {
        if frame_id == 0 {
            return Err(Error::InvalidSignal("frame ids start at 1".to_string()));
        }
        if wavelengths.len() != intensities.len() {
            return Err(Error::InvalidSignal(format!(
                "frame {frame_id}: {} wavelengths but {} intensities",
                wavelengths.len(),
                intensities.len()
            )));
        }
        if let Some(bad) = wavelengths.iter().find(|w| !w.is_finite()) {
            return Err(Error::InvalidSignal(format!(
                "frame {frame_id}: non-finite wavelength {bad}"
            )));
        }

        let mut samples: Vec<(f64, f64)> = wavelengths.into_iter().zip(intensities).collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(pair) = samples.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(Error::InvalidSignal(format!(
                "frame {frame_id}: duplicate wavelength {}",
                pair[1].0
            )));
        }

        let (wavelengths, intensities) = samples.into_iter().unzip();
        Ok(Self {
            frame_id,
            wavelengths,
            intensities,
        })
    }

    /// Creates a frame with no samples.
    #[must_use]
    pub fn empty(frame_id: u32) -> Self {
        Self {
            frame_id,
            wavelengths: Vec::new(),
            intensities: Vec::new(),
        }
    }

    /// Returns the frame identifier.
    #[must_use]
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Wavelengths, strictly increasing.
    #[must_use]
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Intensities, index-aligned with [`Self::wavelengths`].
    #[must_use]
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Returns true if the frame has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Returns the `(wavelength, intensity)` sample at `index`.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.wavelengths.get(index)?, *self.intensities.get(index)?))
    }
}

/// Read-only dataset of frames, indexed `1..=frame_count`.
///
/// Frame ids are contiguous. A frame id that never appeared in the input but
/// lies below the largest id loads as an empty signal. Only frames with data
/// are stored.
#[derive(Debug, Clone, Default)]
pub struct SignalStore {
    frames: BTreeMap<u32, FrameSignal>,
}

impl SignalStore {
    /// Builds a store from already-validated frames.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSignal`] if two frames share an id or a frame
    /// has id 0.
    pub fn from_frames<I>(frames: I) -> Result<Self>
    where
        I: IntoIterator<Item = FrameSignal>,
    {
        let mut by_id = BTreeMap::new();
        for frame in frames {
            let id = frame.frame_id();
            if id == 0 {
                return Err(Error::InvalidSignal("frame ids start at 1".to_string()));
            }
            if by_id.insert(id, frame).is_some() {
                return Err(Error::InvalidSignal(format!("frame {id} appears twice")));
            }
        }
        Ok(Self { frames: by_id })
    }

    /// Builds a store from unordered `(frame, wavelength, intensity)` rows.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSignal`] if a frame's samples fail validation.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, f64, f64)>,
    {
        let mut grouped: BTreeMap<u32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for (frame_id, wavelength, intensity) in rows {
            let entry = grouped.entry(frame_id).or_default();
            entry.0.push(wavelength);
            entry.1.push(intensity);
        }

        let mut frames = BTreeMap::new();
        for (frame_id, (wavelengths, intensities)) in grouped {
            frames.insert(frame_id, FrameSignal::new(frame_id, wavelengths, intensities)?);
        }
        Ok(Self { frames })
    }

    /// Returns the number of frames, which is the largest frame id.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frames.keys().next_back().copied().unwrap_or(0)
    }

    /// Loads the signal for `frame_id`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `frame_id` is outside `[1, frame_count()]`.
    pub fn load(&self, frame_id: u32) -> Result<FrameSignal> {
        let frame_count = self.frame_count();
        if frame_id == 0 || frame_id > frame_count {
            return Err(Error::NotFound {
                frame_id,
                frame_count,
            });
        }
        Ok(self
            .frames
            .get(&frame_id)
            .cloned()
            .unwrap_or_else(|| FrameSignal::empty(frame_id)))
    }

    /// Iterates over the frames that have samples, in id order.
    ///
    /// Gap frames are skipped.
    pub fn frames(&self) -> impl Iterator<Item = &FrameSignal> {
        self.frames.values()
    }

    /// Returns the number of frames that have samples.
    #[must_use]
    pub fn stored_frames(&self) -> usize {
        self.frames.len()
    }

    /// Returns the total number of samples across all frames.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.frames.values().map(FrameSignal::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signal_sorted_by_wavelength() {
        let signal = FrameSignal::new(1, vec![520.0, 500.0, 510.0], vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(signal.wavelengths(), &[500.0, 510.0, 520.0]);
        assert_eq!(signal.intensities(), &[1.0, 2.0, 3.0]);
        let (w, i) = signal.sample(2).unwrap();
        assert_relative_eq!(w, 520.0);
        assert_relative_eq!(i, 3.0);
    }

    #[test]
    fn test_signal_rejects_mismatched_lengths() {
        let err = FrameSignal::new(1, vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidSignal(_)));
    }

    #[test]
    fn test_signal_rejects_duplicate_wavelength() {
        let err = FrameSignal::new(1, vec![1.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidSignal(_)));
    }

    #[test]
    fn test_signal_rejects_frame_zero() {
        assert!(FrameSignal::new(0, vec![], vec![]).is_err());
    }

    #[test]
    fn test_store_from_rows_groups_frames() {
        let rows = vec![
            (2, 505.0, 1.0),
            (1, 510.0, 4.0),
            (1, 500.0, 2.0),
            (2, 500.0, 0.5),
        ];
        let store = SignalStore::from_rows(rows).unwrap();
        assert_eq!(store.frame_count(), 2);
        assert_eq!(store.sample_count(), 4);

        let frame = store.load(1).unwrap();
        assert_eq!(frame.frame_id(), 1);
        assert_eq!(frame.wavelengths(), &[500.0, 510.0]);
    }

    #[test]
    fn test_store_load_out_of_range() {
        let store = SignalStore::from_rows(vec![(1, 500.0, 1.0)]).unwrap();
        assert!(matches!(
            store.load(0),
            Err(Error::NotFound { frame_id: 0, frame_count: 1 })
        ));
        assert!(matches!(
            store.load(2),
            Err(Error::NotFound { frame_id: 2, frame_count: 1 })
        ));
    }

    #[test]
    fn test_store_fills_missing_frames() {
        let store = SignalStore::from_rows(vec![(1, 500.0, 1.0), (3, 500.0, 1.0)]).unwrap();
        assert_eq!(store.frame_count(), 3);
        let gap = store.load(2).unwrap();
        assert!(gap.is_empty());
        assert_eq!(gap.frame_id(), 2);
    }

    #[test]
    fn test_store_rejects_repeated_frame() {
        let frames = vec![FrameSignal::empty(1), FrameSignal::empty(1)];
        assert!(SignalStore::from_frames(frames).is_err());
    }

    #[test]
    fn test_store_rejects_frame_zero() {
        let result = SignalStore::from_frames(vec![FrameSignal::empty(0)]);
        assert!(matches!(result, Err(Error::InvalidSignal(_))));
    }

    #[test]
    fn test_store_sparse_frame_ids() {
        let rows = vec![(1, 500.0, 1.0), (4_000_000_000, 500.0, 1.0)];
        let store = SignalStore::from_rows(rows).unwrap();
        assert_eq!(store.frame_count(), 4_000_000_000);
        assert_eq!(store.stored_frames(), 2);
        assert!(store.load(3_999_999_999).unwrap().is_empty());
        assert_eq!(store.load(4_000_000_000).unwrap().len(), 1);
        assert!(store.load(4_000_000_001).is_err());
    }

    #[test]
    fn test_empty_store() {
        let store = SignalStore::default();
        assert_eq!(store.frame_count(), 0);
        assert!(store.load(1).is_err());
    }
}
