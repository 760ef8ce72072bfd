//! Name to strategy constructor mapping.
//!
//! Built once at startup and handed to the driver; never global.

use hashbrown::HashMap;

use ignite_shared::constants::{
    KEY_TRAITS, LAUNCHER_LEGACY, LAUNCHER_ONESIX, LAUNCHER_STANDARD, TRAIT_ALPHA_LAUNCH,
    TRAIT_LEGACY_LAUNCH,
};

use crate::error::LaunchError;
use crate::params::Parameters;

use super::{LaunchContext, Launcher, LegacyLauncher, StandardLauncher};

/// Builds a strategy from the frozen parameters.
///
/// May fail with a parameter validation error.
pub type LauncherConstructor = fn(&Parameters, &LaunchContext) -> Result<Launcher, LaunchError>;

#[derive(Clone, Default)]
pub struct LauncherRegistry {
    constructors: HashMap<String, LauncherConstructor>,
}

impl LauncherRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `standard`, `legacy` and the `onesix` alias.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LAUNCHER_STANDARD, create_standard);
        registry.register(LAUNCHER_LEGACY, create_legacy);
        registry.register(LAUNCHER_ONESIX, create_onesix);
        registry
    }

    /// Register a constructor, replacing any previous one with that name.
    pub fn register(&mut self, name: impl Into<String>, constructor: LauncherConstructor) {
        let name = name.into();
        if self.constructors.insert(name.clone(), constructor).is_some() {
            tracing::debug!("Replaced launcher constructor '{}'", name);
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn create(
        &self,
        name: &str,
        params: &Parameters,
        ctx: &LaunchContext,
    ) -> Result<Launcher, LaunchError> {
        let constructor =
            self.constructors
                .get(name)
                .ok_or_else(|| LaunchError::UnknownLauncherType {
                    name: name.to_string(),
                    supported: self.names().join(", "),
                })?;
        constructor(params, ctx)
    }
}

impl std::fmt::Debug for LauncherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn create_standard(params: &Parameters, ctx: &LaunchContext) -> Result<Launcher, LaunchError> {
    StandardLauncher::new(params, ctx).map(Launcher::Standard)
}

fn create_legacy(params: &Parameters, ctx: &LaunchContext) -> Result<Launcher, LaunchError> {
    LegacyLauncher::new(params, ctx).map(Launcher::Legacy)
}

/// Older hosts send `onesix` and mark legacy targets with a trait instead.
fn create_onesix(params: &Parameters, ctx: &LaunchContext) -> Result<Launcher, LaunchError> {
    let traits = params.all_or_default(KEY_TRAITS, Vec::new());
    let legacy = traits
        .iter()
        .any(|t| t == TRAIT_LEGACY_LAUNCH || t == TRAIT_ALPHA_LAUNCH);

    if legacy {
        create_legacy(params, ctx)
    } else {
        create_standard(params, ctx)
    }
}
