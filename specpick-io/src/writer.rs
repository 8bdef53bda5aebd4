//! Selection file output.

use specpick_core::ledger::SelectionRecord;
use specpick_core::output::{write_records, SelectionSink};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes flushed selections to a plain-text file.
///
/// Every write replaces the whole file. Records go to a temporary file in
/// the same directory, which is then renamed over the target, so a failed
/// write leaves the previous file in place.
#[derive(Debug, Clone)]
pub struct SelectionFileWriter {
    path: PathBuf,
}

impl SelectionFileWriter {
    /// Creates a writer targeting `path`. The file is not touched until the
    /// first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Creates a writer at the default output path for `input`.
    #[must_use]
    pub fn for_input(input: &Path) -> Self {
        Self::new(default_output_path(input))
    }

    /// Returns the output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionSink for SelectionFileWriter {
    fn write_records(&mut self, records: &[SelectionRecord]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
        write_records(&mut writer, records)?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        log::info!("wrote {} selections to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Returns `<stem>_selected.dat` beside `input`.
///
/// `scans/run1.csv` becomes `scans/run1_selected.dat`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "selections".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_selected.dat"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpick_core::candidate::Candidate;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("scans/run1.csv")),
            PathBuf::from("scans/run1_selected.dat")
        );
        assert_eq!(
            default_output_path(Path::new("data")),
            PathBuf::from("data_selected.dat")
        );
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.dat");
        let mut writer = SelectionFileWriter::new(&path);

        let records = vec![
            SelectionRecord::new(1, Candidate::new(520.0, 1.0)),
            SelectionRecord::new(2, Candidate::new(505.0, 1.0)),
        ];
        writer.write_records(&records).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1 520.0\n2 505.0\n");

        writer.write_records(&records[..1]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1 520.0\n");
    }

    #[test]
    fn test_failed_write_keeps_previous_contents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.dat");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "previous").unwrap();

        let mut writer = SelectionFileWriter::new(&target);
        let records = vec![SelectionRecord::new(1, Candidate::new(520.0, 1.0))];
        assert!(writer.write_records(&records).is_err());

        assert_eq!(
            std::fs::read_to_string(target.join("keep.txt")).unwrap(),
            "previous"
        );
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file left behind");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut writer = SelectionFileWriter::new(dir.path().join("missing").join("out.dat"));
        assert!(writer.write_records(&[]).is_err());
    }
}
