//! Confirmed selections: the per-frame working set and the cross-frame aggregate.

use crate::candidate::Candidate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One confirmed peak.
///
/// Records are identified by their position in a ledger, so the same
/// wavelength may be confirmed more than once.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRecord {
    /// Frame the peak was confirmed in.
    pub frame_id: u32,
    /// Confirmed wavelength.
    pub wavelength: f64,
    /// Intensity at the confirmed wavelength. Not persisted.
    pub intensity: f64,
}

impl SelectionRecord {
    /// Creates a record for `candidate` in `frame_id`.
    #[must_use]
    pub fn new(frame_id: u32, candidate: Candidate) -> Self {
        Self {
            frame_id,
            wavelength: candidate.wavelength,
            intensity: candidate.intensity,
        }
    }
}

/// Confirmations for the active frame, in confirmation order.
#[derive(Debug, Clone, Default)]
pub struct WorkingSelection {
    records: Vec<SelectionRecord>,
}

impl WorkingSelection {
    /// Creates an empty working selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a confirmation of `candidate` in `frame_id`.
    pub fn confirm(&mut self, frame_id: u32, candidate: Candidate) -> SelectionRecord {
        let record = SelectionRecord::new(frame_id, candidate);
        self.records.push(record);
        record
    }

    /// Removes and returns the most recent confirmation, if any.
    pub fn undo_last(&mut self) -> Option<SelectionRecord> {
        self.records.pop()
    }

    /// Read-only view of the confirmations.
    #[must_use]
    pub fn snapshot(&self) -> &[SelectionRecord] {
        &self.records
    }

    /// Moves all confirmations out, leaving the selection empty.
    pub fn take(&mut self) -> Vec<SelectionRecord> {
        std::mem::take(&mut self.records)
    }

    /// Returns the number of confirmations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is confirmed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Append-only record of every committed confirmation across frames.
#[derive(Debug, Clone, Default)]
pub struct AggregateLedger {
    records: Vec<SelectionRecord>,
}

impl AggregateLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `records` in order.
    pub fn commit<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = SelectionRecord>,
    {
        self.records.extend(records);
    }

    /// Returns every committed record in insertion order.
    ///
    /// This order is the order of lines in the persisted file.
    #[must_use]
    pub fn export(&self) -> &[SelectionRecord] {
        &self.records
    }

    /// Returns the number of committed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
