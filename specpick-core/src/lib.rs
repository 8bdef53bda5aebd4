//! specpick-core: Core types for frame-by-frame peak annotation.
//!
//! This crate provides the signal store, the peak detection trait, the
//! candidate navigator, the selection ledgers and the session state machine
//! that ties them together.
//!

pub mod candidate;
pub mod detection;
pub mod error;
pub mod ledger;
pub mod output;
pub mod session;
pub mod signal;

pub use candidate::{Candidate, CandidateNavigator};
pub use detection::{PeakConfig, PeakDetection};
pub use error::{Error, Result};
pub use ledger::{AggregateLedger, SelectionRecord, WorkingSelection};
pub use output::{format_wavelength, write_records, MemorySink, SelectionSink};
pub use session::{Advance, Command, Outcome, Session, SessionConfig, SessionView};
pub use signal::{FrameSignal, SignalStore};
