//! Process exit codes.
//!
//! Only `0` is mandated by the wire protocol; every other failure class gets
//! its own small integer so the parent can tell them apart in its logs.

use std::fmt;

/// Outcome of one launch attempt, as reported to the parent process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// The target ran and returned normally.
    Normal,
    /// The parent sent `abort` or closed the stream.
    Aborted,
    /// A line could not be parsed, or the stream failed.
    MalformedInput,
    /// A required parameter was missing or malformed.
    InvalidParameter,
    /// The `launcher` value names no registered strategy.
    UnknownLauncher,
    /// The target class or its entry point could not be resolved.
    TargetNotFound,
    /// The target's own entry point failed.
    TargetFailed,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Normal => 0,
            ExitCode::Aborted => 1,
            ExitCode::MalformedInput => 2,
            ExitCode::InvalidParameter => 3,
            ExitCode::UnknownLauncher => 4,
            ExitCode::TargetNotFound => 5,
            ExitCode::TargetFailed => 6,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Normal
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::Normal => "normal",
            ExitCode::Aborted => "aborted",
            ExitCode::MalformedInput => "malformed input",
            ExitCode::InvalidParameter => "invalid parameter",
            ExitCode::UnknownLauncher => "unknown launcher",
            ExitCode::TargetNotFound => "target not found",
            ExitCode::TargetFailed => "target failed",
        };
        write!(f, "{} ({})", name, self.code())
    }
}
