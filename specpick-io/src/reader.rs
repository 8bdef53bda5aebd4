//! Memory-mapped dataset readers.
//!
//! The input is comma-separated text with a header row naming at least the
//! `Frame`, `Wavelength` and `Intensity` columns, in any order.

use crate::{Error, Result};
use memmap2::Mmap;
use specpick_core::signal::SignalStore;
use std::fs::File;
use std::path::{Path, PathBuf};

const FRAME_COLUMN: &str = "Frame";
const WAVELENGTH_COLUMN: &str = "Wavelength";
const INTENSITY_COLUMN: &str = "Intensity";

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying them into a buffer.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| Error::MmapError(format!("{}: {e}", path.as_ref().display())))?;
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Returns the path this reader was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A dataset file reader with memory-mapped I/O.
pub struct DatasetReader {
    reader: MappedFileReader,
}

impl DatasetReader {
    /// Opens a dataset file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Returns the path of the dataset.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    /// Parses the whole file into a signal store.
    ///
    /// # Errors
    /// Returns an error if the file is not UTF-8, lacks a required column,
    /// contains an unparsable value, or yields an invalid frame.
    pub fn read_store(&self) -> Result<SignalStore> {
        let text =
            std::str::from_utf8(self.reader.as_bytes()).map_err(|e| Error::InvalidFormat {
                line: 0,
                message: format!("not valid UTF-8: {e}"),
            })?;
        let store = parse_dataset(text)?;
        log::info!(
            "loaded {}: {} frames, {} samples",
            self.path().display(),
            store.frame_count(),
            store.sample_count()
        );
        Ok(store)
    }
}

struct ColumnLayout {
    frame: usize,
    wavelength: usize,
    intensity: usize,
}

impl ColumnLayout {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split(',').map(clean_field).collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|column| *column == name)
                .ok_or(Error::MissingColumn(name))
        };
        Ok(Self {
            frame: find(FRAME_COLUMN)?,
            wavelength: find(WAVELENGTH_COLUMN)?,
            intensity: find(INTENSITY_COLUMN)?,
        })
    }
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

fn parse_float(fields: &[&str], index: usize, column: &str, line: usize) -> Result<f64> {
    let raw = fields.get(index).copied().unwrap_or_default();
    raw.parse::<f64>().map_err(|_| Error::InvalidFormat {
        line,
        message: format!("{column} value {raw:?} is not a number"),
    })
}

fn parse_frame(fields: &[&str], index: usize, line: usize) -> Result<u32> {
    let raw = fields.get(index).copied().unwrap_or_default();
    if let Ok(frame) = raw.parse::<u32>() {
        return Ok(frame);
    }
    // frame columns written as floats ("3.0") are accepted when integral
    match raw.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(value) if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) => {
            Ok(value as u32)
        }
        _ => Err(Error::InvalidFormat {
            line,
            message: format!("{FRAME_COLUMN} value {raw:?} is not a frame number"),
        }),
    }
}

/// Parses comma-separated dataset text into a signal store.
///
/// A leading byte-order mark is ignored, as are blank lines and extra
/// columns. Line numbers in errors are 1-based.
///
/// # Errors
/// Returns an error if the header lacks a required column, a value does not
/// parse, or a frame fails validation.
pub fn parse_dataset(text: &str) -> Result<SignalStore> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(Error::InvalidFormat {
            line: 1,
            message: "missing header row".to_string(),
        });
    };
    let layout = ColumnLayout::from_header(header)?;

    let mut rows = Vec::new();
    for (line, content) in lines {
        let fields: Vec<&str> = content.split(',').map(clean_field).collect();
        let frame = parse_frame(&fields, layout.frame, line)?;
        if frame == 0 {
            return Err(Error::InvalidFormat {
                line,
                message: "frame numbers start at 1".to_string(),
            });
        }
        let wavelength = parse_float(&fields, layout.wavelength, WAVELENGTH_COLUMN, line)?;
        let intensity = parse_float(&fields, layout.intensity, INTENSITY_COLUMN, line)?;
        rows.push((frame, wavelength, intensity));
    }

    log::debug!("parsed {} rows", rows.len());
    Ok(SignalStore::from_rows(rows)?)
}
