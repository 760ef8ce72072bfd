//! Shared types for the ignite launch orchestrator.
//!
//! Wire-level constants and exit codes used by both the core engine and the
//! launcher binary.

pub mod constants;
mod exit;

pub use exit::ExitCode;
