//! Line-oriented command stream reader.
//!
//! The parent process writes one instruction per line:
//!
//! - `<key> <value>` appends `value` to `key` in the [`Parameters`]
//! - `launch` ends the stream and starts the launch
//! - `abort` ends the stream and abandons the launch
//!
//! Running out of input before either bare token counts as `abort`. A line
//! that cannot be split ends the attempt immediately; nothing after it is
//! read, since a corrupted control channel cannot be trusted further.

use std::io::BufRead;

use ignite_shared::constants::{TOKEN_ABORT, TOKEN_LAUNCH};

use crate::error::LaunchError;
use crate::params::Parameters;
use crate::settings::EmptyLinePolicy;

/// State of the reader after each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreLaunchAction {
    /// Keep reading.
    Proceed,
    /// Terminal: hand the parameters to a launcher.
    Launch,
    /// Terminal: give up on this attempt.
    Abort,
}

/// Result of reading the stream to a terminal state.
#[derive(Debug)]
pub struct ReadOutcome {
    pub parameters: Parameters,
    pub action: PreLaunchAction,
}

/// Reads the command stream into a [`Parameters`] store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolReader {
    empty_lines: EmptyLinePolicy,
}

impl ProtocolReader {
    pub fn new(empty_lines: EmptyLinePolicy) -> Self {
        Self { empty_lines }
    }

    /// Classify one line (without its terminator) and apply it to `params`.
    pub fn parse_line(
        &self,
        line: &str,
        params: &mut Parameters,
    ) -> Result<PreLaunchAction, LaunchError> {
        if line.is_empty() {
            return match self.empty_lines {
                EmptyLinePolicy::Skip => Ok(PreLaunchAction::Proceed),
                EmptyLinePolicy::Reject => Err(malformed(line)),
            };
        }

        match line {
            TOKEN_LAUNCH => return Ok(PreLaunchAction::Launch),
            TOKEN_ABORT => return Ok(PreLaunchAction::Abort),
            _ => {}
        }

        let (key, value) = split_instruction(line).ok_or_else(|| malformed(line))?;
        params.add(key, value);

        Ok(PreLaunchAction::Proceed)
    }

    /// Read lines until a terminal state, end-of-stream or the first error.
    pub fn read<R: BufRead>(&self, mut reader: R) -> Result<ReadOutcome, LaunchError> {
        let mut parameters = Parameters::new();
        let mut action = PreLaunchAction::Proceed;
        let mut line = String::new();

        while action == PreLaunchAction::Proceed {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                tracing::debug!("Command stream ended without a terminating token");
                action = PreLaunchAction::Abort;
                break;
            }

            action = self.parse_line(strip_terminator(&line), &mut parameters)?;
        }

        Ok(ReadOutcome { parameters, action })
    }
}

/// Split at the first whitespace run into key and value.
///
/// Returns `None` when there is no key or no value.
fn split_instruction(line: &str) -> Option<(&str, &str)> {
    let split = line.find(char::is_whitespace)?;
    let key = &line[..split];
    let value = line[split..].trim_start();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn malformed(line: &str) -> LaunchError {
    LaunchError::MalformedInstruction {
        line: line.to_string(),
    }
}
