//! Settings management (`ignite.toml`)
//!
//! Handles loading and providing defaults for the behaviours that changed
//! across protocol generations. Settings are stored in TOML format in the
//! platform-specific config directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the settings file inside [`config_dir`].
pub const SETTINGS_FILE: &str = "ignite.toml";

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Command stream settings
    #[serde(default)]
    pub protocol: ProtocolSettings,
    /// Base-directory field discovery settings
    #[serde(default)]
    pub discovery: DiscoverySettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// What to do with an empty line on the command stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyLinePolicy {
    /// Treat it as a malformed instruction and abort (newer hosts).
    #[default]
    Reject,
    /// Ignore it (older hosts).
    Skip,
}

/// Whether a `final` field may be chosen as the base-directory field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FinalFieldPolicy {
    /// Constants cannot be overridden, so skip them.
    #[default]
    Reject,
    /// Accept them like any other candidate.
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProtocolSettings {
    /// Empty line handling (default: reject)
    #[serde(default)]
    pub empty_lines: EmptyLinePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiscoverySettings {
    /// Final field handling (default: reject)
    #[serde(default)]
    pub final_fields: FinalFieldPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FromStr for EmptyLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(EmptyLinePolicy::Reject),
            "skip" => Ok(EmptyLinePolicy::Skip),
            other => Err(format!("expected 'reject' or 'skip', got '{}'", other)),
        }
    }
}

impl fmt::Display for EmptyLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmptyLinePolicy::Reject => "reject",
            EmptyLinePolicy::Skip => "skip",
        })
    }
}

impl FromStr for FinalFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(FinalFieldPolicy::Reject),
            "allow" => Ok(FinalFieldPolicy::Allow),
            other => Err(format!("expected 'reject' or 'allow', got '{}'", other)),
        }
    }
}

impl fmt::Display for FinalFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinalFieldPolicy::Reject => "reject",
            FinalFieldPolicy::Allow => "allow",
        })
    }
}

/// Error loading an explicitly requested settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Ignite\config`
/// On macOS: `~/Library/Application Support/io.ignite.Ignite`
/// On Linux: `~/.config/Ignite`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.ignite", "", "Ignite")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the settings from the default location.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Settings {
    let Some(path) = config_dir().map(|dir| dir.join(SETTINGS_FILE)) else {
        return Settings::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Loads settings from an explicit path.
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.protocol.empty_lines, EmptyLinePolicy::Reject);
        assert_eq!(settings.discovery.final_fields, FinalFieldPolicy::Reject);
        assert_eq!(settings.logging.level, "info");
    }

    // =============================================================
    // TOML tests
    // =============================================================

    #[test]
    fn test_settings_deserialize_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
[protocol]
empty_lines = "skip"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.protocol.empty_lines, EmptyLinePolicy::Skip);
        assert_eq!(settings.discovery.final_fields, FinalFieldPolicy::Reject);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_settings_deserialize_full() {
        let toml_str = r#"
[protocol]
empty_lines = "reject"

[discovery]
final_fields = "allow"

[logging]
level = "debug"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.discovery.final_fields, FinalFieldPolicy::Allow);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_settings_reject_unknown_policy() {
        let toml_str = r#"
[protocol]
empty_lines = "sometimes"
"#;
        assert!(toml::from_str::<Settings>(toml_str).is_err());
    }

    // =============================================================
    // FromStr tests
    // =============================================================

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<EmptyLinePolicy>(), Ok(EmptyLinePolicy::Skip));
        assert_eq!("allow".parse::<FinalFieldPolicy>(), Ok(FinalFieldPolicy::Allow));
        assert!("Skip".parse::<EmptyLinePolicy>().is_err());
        assert!("".parse::<FinalFieldPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_matches_from_str() {
        for policy in [EmptyLinePolicy::Reject, EmptyLinePolicy::Skip] {
            assert_eq!(policy.to_string().parse::<EmptyLinePolicy>(), Ok(policy));
        }
        for policy in [FinalFieldPolicy::Reject, FinalFieldPolicy::Allow] {
            assert_eq!(policy.to_string().parse::<FinalFieldPolicy>(), Ok(policy));
        }
    }

    // =============================================================
    // File loading tests
    // =============================================================

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "[discovery]\nfinal_fields = \"allow\"\n").unwrap();

        let settings = load_from(&path).unwrap();
        assert_eq!(settings.discovery.final_fields, FinalFieldPolicy::Allow);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "[protocol\n").unwrap();
        assert!(matches!(load_from(&path), Err(SettingsError::Parse { .. })));
    }
}
