//! Persisted record format and the sink trait that stores it.
//!
//! Each record is one line, `"<frame_id> <wavelength>"`, in ledger order.

use std::io::{self, Write};

use crate::ledger::SelectionRecord;

/// Destination for flushed selections.
///
/// Every call replaces whatever the previous call stored.
pub trait SelectionSink {
    /// Stores `records`, replacing earlier contents.
    ///
    /// # Errors
    /// Returns any I/O error raised by the destination.
    fn write_records(&mut self, records: &[SelectionRecord]) -> io::Result<()>;
}

impl<S: SelectionSink + ?Sized> SelectionSink for &mut S {
    fn write_records(&mut self, records: &[SelectionRecord]) -> io::Result<()> {
        (**self).write_records(records)
    }
}

/// Keeps the most recent flush in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    contents: String,
    writes: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text of the last flush.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Returns how many flushes reached this sink.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SelectionSink for MemorySink {
    fn write_records(&mut self, records: &[SelectionRecord]) -> io::Result<()> {
        let mut buf = Vec::new();
        write_records(&mut buf, records)?;
        self.contents =
            String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.writes += 1;
        Ok(())
    }
}

/// Formats a wavelength so it always reads back as a float (`520.0`, `532.1`).
#[must_use]
pub fn format_wavelength(wavelength: f64) -> String {
    // Debug gives the shortest round-trip form and keeps the trailing `.0`
    format!("{wavelength:?}")
}

/// Writes `records` as `"<frame_id> <wavelength>"` lines.
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_records<W: Write>(out: &mut W, records: &[SelectionRecord]) -> io::Result<()> {
    for record in records {
        writeln!(
            out,
            "{} {}",
            record.frame_id,
            format_wavelength(record.wavelength)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    #[test]
    fn test_format_wavelength() {
        assert_eq!(format_wavelength(520.0), "520.0");
        assert_eq!(format_wavelength(532.1), "532.1");
        assert_eq!(format_wavelength(0.5), "0.5");
    }

    #[test]
    fn test_write_records_lines() {
        let records = vec![
            SelectionRecord::new(1, Candidate::new(520.0, 9.0)),
            SelectionRecord::new(2, Candidate::new(505.0, 4.0)),
        ];
        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1 520.0\n2 505.0\n");
    }

    #[test]
    fn test_memory_sink_overwrites() {
        let mut sink = MemorySink::new();
        let first = vec![SelectionRecord::new(1, Candidate::new(500.0, 1.0))];
        sink.write_records(&first).unwrap();
        sink.write_records(&[]).unwrap();
        assert_eq!(sink.contents(), "");
        assert_eq!(sink.writes(), 2);
    }
}
