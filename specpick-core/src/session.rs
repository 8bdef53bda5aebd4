//! Annotation session: the command surface over navigator, ledgers and store.
//!
//! Commands run one at a time to completion. Each one either succeeds or
//! returns an error with the session unchanged.

use crate::candidate::{Candidate, CandidateNavigator};
use crate::detection::{PeakConfig, PeakDetection};
use crate::ledger::{AggregateLedger, SelectionRecord, WorkingSelection};
use crate::output::SelectionSink;
use crate::signal::{FrameSignal, SignalStore};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for an annotation session.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// Peak detection settings applied to every frame.
    pub peaks: PeakConfig,
}

impl SessionConfig {
    /// Creates a session configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the peak detection settings.
    #[must_use]
    pub fn with_peaks(mut self, peaks: PeakConfig) -> Self {
        self.peaks = peaks;
        self
    }
}

/// A command from the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Highlight the candidate nearest to a wavelength.
    PickNearest(f64),
    /// Shift the highlight by a number of candidates.
    MoveCandidate(isize),
    /// Confirm the highlighted candidate.
    Confirm,
    /// Drop the most recent confirmation in this frame.
    Undo,
    /// Commit this frame and move to the next one.
    AdvanceFrame,
    /// Commit pending confirmations and write everything to the sink.
    Flush,
}

/// Result of [`Session::advance_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The session moved to a new frame.
    Moved { from: u32, to: u32, committed: usize },
    /// Already on the last frame. Pending confirmations were still committed.
    NoMoreFrames { frame_id: u32, committed: usize },
}

/// Successful outcome of a dispatched [`Command`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The highlight now rests on `candidate` at `index`.
    Highlighted { index: usize, candidate: Candidate },
    /// A confirmation was appended.
    Confirmed(SelectionRecord),
    /// The last confirmation was removed, or nothing was there to remove.
    Undone(Option<SelectionRecord>),
    /// A frame advance happened or hit the last frame.
    Advanced(Advance),
    /// The sink received `records` lines.
    Flushed { records: usize },
}

/// Read-only state for a rendering layer.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// Active frame id.
    pub frame_id: u32,
    /// Number of frames in the dataset.
    pub frame_count: u32,
    /// Active frame signal.
    pub signal: &'a FrameSignal,
    /// Candidates in ascending wavelength order.
    pub candidates: &'a [Candidate],
    /// Highlighted candidate, if any.
    pub cursor: Option<usize>,
    /// Confirmations in the active frame.
    pub working: &'a [SelectionRecord],
    /// Number of records already committed across frames.
    pub committed: usize,
}

/// Single-analyst annotation session over a [`SignalStore`].
pub struct Session<D, S> {
    store: SignalStore,
    detector: D,
    sink: S,
    config: SessionConfig,
    signal: FrameSignal,
    navigator: CandidateNavigator,
    working: WorkingSelection,
    aggregate: AggregateLedger,
}

impl<D: PeakDetection, S: SelectionSink> Session<D, S> {
    /// Starts a session on frame 1.
    ///
    /// # Errors
    /// Returns [`Error::EmptyDataset`] if the store has no frames, or
    /// [`Error::ConfigError`] if the configuration is invalid.
    pub fn new(store: SignalStore, detector: D, sink: S, config: SessionConfig) -> Result<Self> {
        config.peaks.validate()?;
        if store.frame_count() == 0 {
            return Err(Error::EmptyDataset);
        }

        let signal = store.load(1)?;
        let navigator = CandidateNavigator::detect(&detector, &signal, &config.peaks);
        log::info!(
            "session started: {} frames, detector {}, frame 1 has {} candidates",
            store.frame_count(),
            detector.name(),
            navigator.len()
        );

        Ok(Self {
            store,
            detector,
            sink,
            config,
            signal,
            navigator,
            working: WorkingSelection::new(),
            aggregate: AggregateLedger::new(),
        })
    }

    /// Runs one command.
    ///
    /// # Errors
    /// Propagates the error of the underlying operation.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::PickNearest(wavelength) => {
                let index = self.pick_nearest(wavelength)?;
                Ok(Outcome::Highlighted {
                    index,
                    candidate: self.navigator.current()?,
                })
            }
            Command::MoveCandidate(delta) => {
                let index = self.move_candidate(delta)?;
                Ok(Outcome::Highlighted {
                    index,
                    candidate: self.navigator.current()?,
                })
            }
            Command::Confirm => self.confirm().map(Outcome::Confirmed),
            Command::Undo => Ok(Outcome::Undone(self.undo())),
            Command::AdvanceFrame => self.advance_frame().map(Outcome::Advanced),
            Command::Flush => self.flush().map(|records| Outcome::Flushed { records }),
        }
    }

    /// Highlights the candidate nearest to `wavelength`.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if the frame has no candidates.
    pub fn pick_nearest(&mut self, wavelength: f64) -> Result<usize> {
        self.navigator.seek_nearest(wavelength)
    }

    /// Moves the highlight by `delta`, clamped to the candidate range.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if the frame has no candidates.
    pub fn move_candidate(&mut self, delta: isize) -> Result<usize> {
        self.navigator.move_by(delta)
    }

    /// Confirms the highlighted candidate into the working selection.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCandidateSet`] if the frame has no candidates.
    pub fn confirm(&mut self) -> Result<SelectionRecord> {
        let candidate = self.navigator.current()?;
        let record = self.working.confirm(self.signal.frame_id(), candidate);
        log::debug!(
            "frame {}: confirmed {} ({} pending)",
            record.frame_id,
            record.wavelength,
            self.working.len()
        );
        Ok(record)
    }

    /// Removes the most recent confirmation. Does nothing if there is none.
    pub fn undo(&mut self) -> Option<SelectionRecord> {
        let removed = self.working.undo_last();
        if let Some(record) = removed {
            log::debug!("frame {}: undid {}", record.frame_id, record.wavelength);
        }
        removed
    }

    /// Commits the working selection and moves to the next frame.
    ///
    /// On the last frame the selection is still committed and
    /// [`Advance::NoMoreFrames`] is returned.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the next frame cannot be loaded; nothing
    /// is committed in that case.
    pub fn advance_frame(&mut self) -> Result<Advance> {
        let from = self.signal.frame_id();
        let next = if from < self.store.frame_count() {
            let signal = self.store.load(from + 1)?;
            let navigator = CandidateNavigator::detect(&self.detector, &signal, &self.config.peaks);
            Some((signal, navigator))
        } else {
            None
        };

        let pending = self.working.take();
        let committed = pending.len();
        self.aggregate.commit(pending);

        match next {
            Some((signal, navigator)) => {
                let to = signal.frame_id();
                self.signal = signal;
                self.navigator = navigator;
                log::info!(
                    "frame {from} -> {to}: committed {committed}, {} candidates",
                    self.navigator.len()
                );
                Ok(Advance::Moved {
                    from,
                    to,
                    committed,
                })
            }
            None => {
                log::warn!("frame {from} is the last frame; committed {committed}");
                Ok(Advance::NoMoreFrames {
                    frame_id: from,
                    committed,
                })
            }
        }
    }

    /// Commits pending confirmations and writes the whole ledger to the sink.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the sink fails. Neither ledger changes then,
    /// so the flush can be retried.
    pub fn flush(&mut self) -> Result<usize> {
        let mut records = Vec::with_capacity(self.aggregate.len() + self.working.len());
        records.extend_from_slice(self.aggregate.export());
        records.extend_from_slice(self.working.snapshot());

        self.sink.write_records(&records)?;

        self.aggregate.commit(self.working.take());
        log::info!("flushed {} records", records.len());
        Ok(records.len())
    }

    /// Returns a read-only view for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            frame_id: self.signal.frame_id(),
            frame_count: self.store.frame_count(),
            signal: &self.signal,
            candidates: self.navigator.positions(),
            cursor: self.navigator.cursor(),
            working: self.working.snapshot(),
            committed: self.aggregate.len(),
        }
    }

    /// Returns the active frame id.
    #[must_use]
    pub fn frame_id(&self) -> u32 {
        self.signal.frame_id()
    }

    /// Returns the active frame signal.
    #[must_use]
    pub fn signal(&self) -> &FrameSignal {
        &self.signal
    }

    /// Returns the candidate navigator for the active frame.
    #[must_use]
    pub fn navigator(&self) -> &CandidateNavigator {
        &self.navigator
    }

    /// Returns the working selection.
    #[must_use]
    pub fn working(&self) -> &WorkingSelection {
        &self.working
    }

    /// Returns the committed ledger.
    #[must_use]
    pub fn aggregate(&self) -> &AggregateLedger {
        &self.aggregate
    }

    /// Returns the signal store.
    #[must_use]
    pub fn store(&self) -> &SignalStore {
        &self.store
    }

    /// Returns the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
