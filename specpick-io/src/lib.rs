//! specpick-io: Dataset loading and selection output for specpick.
//!
//! Datasets are read through memory-mapped files via memmap2 and parsed
//! into a [`specpick_core::SignalStore`]. Confirmed selections are written
//! back as plain text, one record per line.
//!

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::{parse_dataset, DatasetReader, MappedFileReader};
pub use writer::{default_output_path, SelectionFileWriter};
