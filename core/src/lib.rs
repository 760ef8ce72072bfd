//! Ignite Core - launch orchestration engine
//!
//! A parent process streams `key value` lines on stdin, then `launch` or
//! `abort`. This crate accumulates those lines into a parameter store, picks
//! a launch strategy by name, prepares the target application and invokes
//! its entry point.
//!
//! # Architecture
//!
//! - [`ProtocolReader`] - reads the command stream into [`Parameters`]
//! - [`LauncherRegistry`] - maps strategy names to constructors
//! - [`Launcher`] - the closed set of strategies (standard, legacy)
//! - [`reflect`] - narrow query interface onto the target's classes
//! - [`window`] - compatibility wrapper for applet-style targets
//! - [`Driver`] - ties it together and produces an [`ExitCode`]

pub mod driver;
pub mod environment;
pub mod error;
pub mod launcher;
pub mod params;
pub mod protocol;
pub mod reflect;
pub mod settings;
pub mod window;

pub use driver::Driver;
pub use environment::RuntimeEnvironment;
pub use error::LaunchError;
pub use ignite_shared::ExitCode;
pub use launcher::{LaunchContext, LaunchServices, Launcher, LauncherRegistry};
pub use params::Parameters;
pub use protocol::{PreLaunchAction, ProtocolReader, ReadOutcome};
pub use settings::{EmptyLinePolicy, FinalFieldPolicy, Settings};
