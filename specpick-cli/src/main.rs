//! specpick command-line interface.
//!
//! `specpick annotate` drives an annotation session from keyboard-style
//! commands on stdin (or a script file); `specpick info` surveys a dataset.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

mod input;

use clap::{Parser, Subcommand};
use input::{parse_line, Input, HELP};
use specpick_algorithms::{survey_frames, LocalMaximaDetector};
use specpick_core::{
    Advance, Outcome, PeakConfig, PeakDetection, SelectionSink, Session, SessionConfig,
};
use specpick_io::{DatasetReader, SelectionFileWriter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    SpecpickIo(#[from] specpick_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] specpick_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Frame-by-frame spectral peak annotation.
#[derive(Parser)]
#[command(name = "specpick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step through frames and confirm peaks
    Annotate {
        /// Input CSV with Frame, Wavelength and Intensity columns
        input: PathBuf,

        /// Output file (default: <input>_selected.dat)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum peak intensity
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        min_height: f64,

        /// Read commands from a file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,
    },

    /// Show frame and candidate counts for a dataset
    Info {
        /// Input CSV with Frame, Wavelength and Intensity columns
        input: PathBuf,

        /// Minimum peak intensity
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        min_height: f64,

        /// Print the survey as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            input,
            output,
            min_height,
            script,
        } => {
            let store = DatasetReader::open(&input)?.read_store()?;
            let writer = output.map_or_else(
                || SelectionFileWriter::for_input(&input),
                SelectionFileWriter::new,
            );
            println!("Output: {}", writer.path().display());

            let config =
                SessionConfig::new().with_peaks(PeakConfig::new().with_min_height(min_height));
            let mut session = Session::new(store, LocalMaximaDetector, writer, config)?;

            let commands: Box<dyn BufRead> = match script {
                Some(path) => Box::new(BufReader::new(File::open(path)?)),
                None => {
                    println!("{}", HELP);
                    Box::new(io::stdin().lock())
                }
            };
            run_annotator(&mut session, commands, &mut io::stdout())?;
        }

        Commands::Info {
            input,
            min_height,
            json,
        } => {
            let reader = DatasetReader::open(&input)?;
            let store = reader.read_store()?;
            let config = PeakConfig::new().with_min_height(min_height);
            config.validate()?;
            let survey = survey_frames(&store, &LocalMaximaDetector, &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&survey)?);
                return Ok(());
            }

            println!("File: {}", input.display());
            println!(
                "Size: {} bytes ({:.2} MB)",
                reader.file_size(),
                reader.file_size() as f64 / 1_000_000.0
            );
            println!("Frames: {}", store.frame_count());
            println!("Frames with data: {}", store.stored_frames());
            println!("Samples: {}", store.sample_count());
            println!("Detector: {}", LocalMaximaDetector.name());
            println!();
            println!(
                "{:<8} | {:<8} | {:<10} | {:<24}",
                "Frame", "Samples", "Candidates", "Wavelength range"
            );
            println!("{:-<60}", "");
            for frame in &survey {
                let range = frame
                    .wavelength_range
                    .map_or_else(|| "-".to_string(), |(lo, hi)| format!("{lo:.2} - {hi:.2}"));
                println!(
                    "{:<8} | {:<8} | {:<10} | {:<24}",
                    frame.frame_id, frame.samples, frame.candidates, range
                );
            }
        }
    }

    Ok(())
}

/// Feeds input lines to the session until `quit` or end of input.
///
/// Command failures are reported and the session keeps going.
fn run_annotator<D, S, R, W>(session: &mut Session<D, S>, commands: R, out: &mut W) -> Result<()>
where
    D: PeakDetection,
    S: SelectionSink,
    R: BufRead,
    W: Write,
{
    let mut unsaved = false;
    print_status(session, out)?;

    for line in commands.lines() {
        let line = line?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message} (type `help` for commands)")?;
                continue;
            }
        };

        match input {
            Input::Quit => break,
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Status => print_status(session, out)?,
            Input::Session(command) => match session.dispatch(command) {
                Ok(outcome) => {
                    unsaved = match outcome {
                        Outcome::Flushed { .. } => false,
                        Outcome::Highlighted { .. } | Outcome::Undone(None) => unsaved,
                        Outcome::Advanced(
                            Advance::Moved { committed, .. }
                            | Advance::NoMoreFrames { committed, .. },
                        ) => unsaved || committed > 0,
                        Outcome::Confirmed(_) | Outcome::Undone(Some(_)) => true,
                    };
                    report(session, outcome, out)?;
                }
                Err(e) => {
                    log::debug!("command {command:?} failed: {e}");
                    writeln!(out, "error: {e}")?;
                }
            },
        }
    }

    if unsaved {
        log::warn!("exiting with unsaved confirmations");
        writeln!(out, "warning: confirmations since the last save were not written")?;
    }
    Ok(())
}

fn report<D, S, W>(session: &Session<D, S>, outcome: Outcome, out: &mut W) -> Result<()>
where
    D: PeakDetection,
    S: SelectionSink,
    W: Write,
{
    match outcome {
        Outcome::Highlighted { index, candidate } => writeln!(
            out,
            "candidate {}/{}: {:.2} (intensity {:.2})",
            index + 1,
            session.navigator().len(),
            candidate.wavelength,
            candidate.intensity
        )?,
        Outcome::Confirmed(record) => writeln!(
            out,
            "confirmed {:.2} in frame {} ({} this frame)",
            record.wavelength,
            record.frame_id,
            session.working().len()
        )?,
        Outcome::Undone(Some(record)) => writeln!(
            out,
            "removed {:.2} ({} left this frame)",
            record.wavelength,
            session.working().len()
        )?,
        Outcome::Undone(None) => writeln!(out, "nothing to remove")?,
        Outcome::Advanced(Advance::Moved { committed, .. }) => {
            writeln!(out, "committed {committed}")?;
            print_status(session, out)?;
        }
        Outcome::Advanced(Advance::NoMoreFrames { frame_id, committed }) => writeln!(
            out,
            "committed {committed}; frame {frame_id} is the last frame"
        )?,
        Outcome::Flushed { records } => writeln!(out, "saved {records} selections")?,
    }
    Ok(())
}

fn print_status<D, S, W>(session: &Session<D, S>, out: &mut W) -> Result<()>
where
    D: PeakDetection,
    S: SelectionSink,
    W: Write,
{
    let view = session.view();
    writeln!(
        out,
        "Frame: {}/{}  samples: {}  candidates: {}  confirmed: {}  committed: {}",
        view.frame_id,
        view.frame_count,
        view.signal.len(),
        view.candidates.len(),
        view.working.len(),
        view.committed
    )?;
    if let Some(cursor) = view.cursor {
        writeln!(
            out,
            "highlight: {}/{} at {:.2}",
            cursor + 1,
            view.candidates.len(),
            view.candidates[cursor].wavelength
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpick_core::{MemorySink, SignalStore};

    fn session() -> Session<LocalMaximaDetector, MemorySink> {
        let store = SignalStore::from_rows(vec![
            (1, 495.0, 0.0),
            (1, 500.0, 4.0),
            (1, 510.0, 1.0),
            (1, 520.0, 6.0),
            (1, 530.0, 0.0),
            (2, 500.0, 0.0),
            (2, 505.0, 3.0),
            (2, 510.0, 0.0),
        ])
        .unwrap();
        Session::new(store, LocalMaximaDetector, MemorySink::new(), SessionConfig::new()).unwrap()
    }

    #[test]
    fn test_scripted_session() {
        let mut session = session();
        let script = "right\nc\nnext\nc\nd\nc\nsave\nquit\nc\n";
        let mut out = Vec::new();
        run_annotator(&mut session, script.as_bytes(), &mut out).unwrap();

        assert_eq!(session.sink().contents(), "1 520.0\n2 505.0\n");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("saved 2 selections"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_empty_advance_after_save_is_not_unsaved() {
        let mut session = session();
        let script = "c\nsave\nnext\nnext\nquit\n";
        let mut out = Vec::new();
        run_annotator(&mut session, script.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("saved 1 selections"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_confirm_then_advance_without_save_warns() {
        let mut session = session();
        let script = "next\nc\nnext\n";
        let mut out = Vec::new();
        run_annotator(&mut session, script.as_bytes(), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("warning"));
        assert_eq!(session.aggregate().len(), 1);
    }

    #[test]
    fn test_errors_do_not_stop_the_session() {
        let mut session = session();
        let script = "jump\nclick 2000\nc\n";
        let mut out = Vec::new();
        run_annotator(&mut session, script.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command"));
        assert!(text.contains("warning"));
        assert_eq!(session.working().len(), 1);
        assert!((session.working().snapshot()[0].wavelength - 520.0).abs() < f64::EPSILON);
    }
}
