//! Ignite launcher binary
//!
//! Reads launch instructions from stdin and starts the target application
//! from the current directory.
//!
//! # Usage
//!
//! ```bash
//! printf 'launcher standard\nclassPath classes\nmainClass game.Main\nlaunch\n' | ignite
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` to override the configured level.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ignite_core::reflect::ManifestClassLoaderFactory;
use ignite_core::settings::{self, EmptyLinePolicy, FinalFieldPolicy, Settings};
use ignite_core::window::AppletWindowFactory;
use ignite_core::{Driver, LaunchServices, LauncherRegistry};

/// Launch orchestrator driven by a stdin command stream
#[derive(Parser, Debug)]
#[command(name = "ignite")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ignite.toml in the config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to treat empty command lines: reject or skip
    #[arg(long)]
    empty_lines: Option<EmptyLinePolicy>,

    /// Whether final fields may be the base directory field: reject or allow
    #[arg(long)]
    final_fields: Option<FinalFieldPolicy>,

    /// Log filter, e.g. `debug` or `ignite_core=trace`
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => settings::load_from(path)?,
            None => settings::load(),
        };

        if let Some(policy) = self.empty_lines {
            settings.protocol.empty_lines = policy;
        }
        if let Some(policy) = self.final_fields {
            settings.discovery.final_fields = policy;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        Ok(settings)
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    init_logging(&settings.logging.level);

    let working_dir = std::env::current_dir().context("Failed to determine working directory")?;
    tracing::debug!("Working directory: {}", working_dir.display());

    let driver = Driver::new(LauncherRegistry::with_builtins(), &settings, working_dir);
    let services = LaunchServices::new(ManifestClassLoaderFactory, AppletWindowFactory);

    let code = driver.run(io::stdin().lock(), &services);
    if !code.is_success() {
        std::process::exit(code.code());
    }
    Ok(())
}
