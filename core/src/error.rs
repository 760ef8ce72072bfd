//! Error taxonomy for one launch attempt.

use std::io;
use std::path::PathBuf;

use ignite_shared::ExitCode;
use thiserror::Error;

/// Everything that can end a launch attempt.
///
/// `WrapperConstructionFailed` is the only variant a strategy recovers from;
/// all others propagate to the driver and become a non-zero exit code.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Malformed instruction: {line:?}")]
    MalformedInstruction { line: String },

    #[error("Failed to read command stream: {0}")]
    Io(#[from] io::Error),

    #[error("Required parameter '{0}' is missing")]
    KeyNotFound(String),

    #[error("Invalid value {value:?} for parameter '{key}': {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown launcher type '{name}'. Supported launchers: {supported}")]
    UnknownLauncherType { name: String, supported: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("No entry point 'static void main(String[])' in class {0}")]
    EntryPointNotFound(String),

    #[error("Invalid class descriptor {}: {reason}", path.display())]
    InvalidClassDescriptor { path: PathBuf, reason: String },

    #[error("Compatibility wrapper failed: {0}")]
    WrapperConstructionFailed(String),

    #[error("Target {class} failed: {source:#}")]
    TargetFailed {
        class: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LaunchError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        LaunchError::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Exit code the driver reports for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LaunchError::MalformedInstruction { .. } | LaunchError::Io(_) => {
                ExitCode::MalformedInput
            }
            LaunchError::KeyNotFound(_) | LaunchError::InvalidParameter { .. } => {
                ExitCode::InvalidParameter
            }
            LaunchError::UnknownLauncherType { .. } => ExitCode::UnknownLauncher,
            LaunchError::ClassNotFound(_)
            | LaunchError::EntryPointNotFound(_)
            | LaunchError::InvalidClassDescriptor { .. } => ExitCode::TargetNotFound,
            // Only reaches the driver if a caller chose not to recover from it.
            LaunchError::WrapperConstructionFailed(_) | LaunchError::TargetFailed { .. } => {
                ExitCode::TargetFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            LaunchError::MalformedInstruction { line: "foo".into() }.exit_code(),
            ExitCode::MalformedInput
        );
        assert_eq!(
            LaunchError::KeyNotFound("userName".into()).exit_code(),
            ExitCode::InvalidParameter
        );
        assert_eq!(
            LaunchError::ClassNotFound("a.B".into()).exit_code(),
            ExitCode::TargetNotFound
        );
        assert_eq!(
            LaunchError::TargetFailed {
                class: "a.B".into(),
                source: anyhow::anyhow!("boom"),
            }
            .exit_code(),
            ExitCode::TargetFailed
        );
    }

    #[test]
    fn test_target_failure_message_keeps_source() {
        let err = LaunchError::TargetFailed {
            class: "a.B".into(),
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.to_string(), "Target a.B failed: boom");
    }
}
