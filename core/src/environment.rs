//! Runtime environment handed to the target application.
//!
//! Collects the class path, the native library directory, the working
//! directory and the properties old targets read at startup, and knows how
//! to export them to a spawned process.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ignite_shared::constants::{
    KEY_CLASS_PATH, KEY_CLASS_PATH_LEGACY, KEY_NATIVES, PROPERTY_JINPUT_LIBRARY_PATH,
    PROPERTY_LIBRARY_PATH, PROPERTY_LWJGL_LIBRARY_PATH, PROPERTY_TARGET_DIRECTORY,
};

use crate::params::Parameters;

/// Prefix of environment variables carrying properties.
pub const PROPERTY_ENV_PREFIX: &str = "IGNITE_PROP_";

/// Prefix of environment variables carrying static field overrides.
pub const FIELD_ENV_PREFIX: &str = "IGNITE_FIELD_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    pub working_dir: PathBuf,
    /// Class path entries, searched in order.
    pub class_path: Vec<PathBuf>,
    /// Directory holding the target's native libraries.
    pub natives: Option<PathBuf>,
    pub properties: BTreeMap<String, String>,
}

impl RuntimeEnvironment {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            class_path: Vec::new(),
            natives: None,
            properties: BTreeMap::new(),
        }
    }

    /// Assemble the environment from the command stream parameters.
    ///
    /// Both `classPath` and the older `cp` entries are honoured, in that order.
    pub fn from_parameters(params: &Parameters, working_dir: &Path) -> Self {
        let mut env = Self::new(working_dir);

        env.class_path = params
            .all_or_default(KEY_CLASS_PATH, Vec::new())
            .into_iter()
            .chain(params.all_or_default(KEY_CLASS_PATH_LEGACY, Vec::new()))
            .map(PathBuf::from)
            .collect();

        env.set_property(
            PROPERTY_TARGET_DIRECTORY,
            working_dir.to_string_lossy().into_owned(),
        );

        if let Some(natives) = params.first_opt(KEY_NATIVES) {
            env.set_property(PROPERTY_LIBRARY_PATH, natives);
            env.set_property(PROPERTY_LWJGL_LIBRARY_PATH, natives);
            env.set_property(PROPERTY_JINPUT_LIBRARY_PATH, natives);
            env.natives = Some(PathBuf::from(natives));
        }

        env
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Environment variables a spawned target should receive.
    ///
    /// The native directory is prepended to the platform library search path;
    /// properties are exported as `IGNITE_PROP_<NAME>`.
    pub fn process_env(&self) -> Vec<(String, OsString)> {
        let mut vars = Vec::new();

        if let Some(natives) = &self.natives {
            let var = library_path_var();
            let mut paths = vec![natives.clone()];
            if let Some(existing) = std::env::var_os(var) {
                paths.extend(std::env::split_paths(&existing));
            }
            match std::env::join_paths(paths) {
                Ok(joined) => vars.push((var.to_string(), joined)),
                Err(e) => tracing::warn!(
                    "Cannot add {} to {}: {}",
                    natives.display(),
                    var,
                    e
                ),
            }
        }

        for (key, value) in &self.properties {
            vars.push((property_env_name(key), OsString::from(value)));
        }

        vars
    }
}

/// Name of the variable the platform's dynamic loader searches.
pub fn library_path_var() -> &'static str {
    if cfg!(windows) {
        "PATH"
    } else if cfg!(target_os = "macos") {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

/// `minecraft.applet.TargetDirectory` -> `IGNITE_PROP_MINECRAFT_APPLET_TARGETDIRECTORY`
pub fn property_env_name(property: &str) -> String {
    let sanitized: String = property
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", PROPERTY_ENV_PREFIX, sanitized)
}

/// Variable carrying a static field override. Field names are kept verbatim.
pub fn field_env_name(field: &str) -> String {
    format!("{}{}", FIELD_ENV_PREFIX, field)
}
