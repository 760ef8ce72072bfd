//! Launch strategies.
//!
//! The set of strategies is closed, so [`Launcher`] is an enum and every
//! operation dispatches with a `match`. Adding a strategy means adding a
//! variant, a constructor in [`LauncherRegistry::with_builtins`], and the
//! match arms the compiler then asks for.

mod common;
mod legacy;
mod registry;
mod standard;

use std::path::PathBuf;
use std::sync::Arc;

use ignite_shared::constants::{LAUNCHER_LEGACY, LAUNCHER_STANDARD};

use crate::error::LaunchError;
use crate::reflect::ClassLoaderFactory;
use crate::settings::FinalFieldPolicy;
use crate::window::WindowFactory;

pub use common::{LaunchConfig, ServerTarget, WindowMode, parse_window_params};
pub use legacy::{LegacyLauncher, WRAPPER_THREAD_NAME};
pub use registry::{LauncherConstructor, LauncherRegistry};
pub use standard::StandardLauncher;

/// A configured launch strategy, ready to run.
#[derive(Debug, Clone)]
pub enum Launcher {
    Standard(StandardLauncher),
    Legacy(LegacyLauncher),
}

impl Launcher {
    pub fn name(&self) -> &'static str {
        match self {
            Launcher::Standard(_) => LAUNCHER_STANDARD,
            Launcher::Legacy(_) => LAUNCHER_LEGACY,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        match self {
            Launcher::Standard(launcher) => launcher.config(),
            Launcher::Legacy(launcher) => launcher.config(),
        }
    }

    /// Run the target. Blocks until its entry point (or wrapper) returns.
    pub fn launch(&self, services: &LaunchServices) -> Result<(), LaunchError> {
        match self {
            Launcher::Standard(launcher) => launcher.launch(services),
            Launcher::Legacy(launcher) => launcher.launch(services),
        }
    }
}

/// Collaborators a strategy needs at launch time.
#[derive(Clone)]
pub struct LaunchServices {
    pub class_loaders: Arc<dyn ClassLoaderFactory>,
    pub windows: Arc<dyn WindowFactory>,
}

impl LaunchServices {
    pub fn new(
        class_loaders: impl ClassLoaderFactory + 'static,
        windows: impl WindowFactory + 'static,
    ) -> Self {
        Self {
            class_loaders: Arc::new(class_loaders),
            windows: Arc::new(windows),
        }
    }
}

/// Process facts a strategy is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    /// Directory the target treats as its base directory.
    pub working_dir: PathBuf,
    pub final_fields: FinalFieldPolicy,
}

impl LaunchContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            final_fields: FinalFieldPolicy::default(),
        }
    }

    pub fn with_final_fields(mut self, policy: FinalFieldPolicy) -> Self {
        self.final_fields = policy;
        self
    }
}
