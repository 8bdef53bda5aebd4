//! Keyboard vocabulary for the interactive annotator.

use specpick_core::Command;

/// Help text listing every accepted input.
pub const HELP: &str = "\
commands:
  click <wavelength>   highlight the nearest peak
  right | left         move the highlight by one peak
  move <n>             move the highlight by n peaks
  c                    confirm the highlighted peak
  d | delete           remove the last confirmation in this frame
  next                 commit this frame and go to the next
  save                 write all confirmations to the output file
  status               show the current frame
  help                 show this text
  quit                 exit (unsaved confirmations are lost)";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// A session command.
    Session(Command),
    /// Print the current view.
    Status,
    /// Print the help text.
    Help,
    /// Leave the annotator.
    Quit,
}

/// Parses one line of input. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let word = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments: {line}"));
    }

    let input = match (word, arg) {
        ("c" | "confirm", None) => Input::Session(Command::Confirm),
        ("d" | "delete" | "undo", None) => Input::Session(Command::Undo),
        ("right", None) => Input::Session(Command::MoveCandidate(1)),
        ("left", None) => Input::Session(Command::MoveCandidate(-1)),
        ("move", Some(n)) => {
            let delta = n.parse().map_err(|_| format!("not a step count: {n}"))?;
            Input::Session(Command::MoveCandidate(delta))
        }
        ("click", Some(w)) => {
            let wavelength: f64 = w.parse().map_err(|_| format!("not a wavelength: {w}"))?;
            if !wavelength.is_finite() {
                return Err(format!("not a wavelength: {w}"));
            }
            Input::Session(Command::PickNearest(wavelength))
        }
        ("next", None) => Input::Session(Command::AdvanceFrame),
        ("save", None) => Input::Session(Command::Flush),
        ("status", None) => Input::Status,
        ("help" | "?", None) => Input::Help,
        ("quit" | "q" | "exit", None) => Input::Quit,
        _ => return Err(format!("unknown command: {line}")),
    };
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_line("c"), Ok(Some(Input::Session(Command::Confirm))));
        assert_eq!(parse_line("d"), Ok(Some(Input::Session(Command::Undo))));
        assert_eq!(parse_line("delete"), Ok(Some(Input::Session(Command::Undo))));
        assert_eq!(
            parse_line("  left "),
            Ok(Some(Input::Session(Command::MoveCandidate(-1))))
        );
        assert_eq!(
            parse_line("move -3"),
            Ok(Some(Input::Session(Command::MoveCandidate(-3))))
        );
        assert_eq!(
            parse_line("click 520.5"),
            Ok(Some(Input::Session(Command::PickNearest(520.5))))
        );
        assert_eq!(parse_line("next"), Ok(Some(Input::Session(Command::AdvanceFrame))));
        assert_eq!(parse_line("save"), Ok(Some(Input::Session(Command::Flush))));
        assert_eq!(parse_line("quit"), Ok(Some(Input::Quit)));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("# frame 1"), Ok(None));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_line("click").is_err());
        assert!(parse_line("click abc").is_err());
        assert!(parse_line("click nan").is_err());
        assert!(parse_line("c now").is_err());
        assert!(parse_line("jump").is_err());
    }
}
