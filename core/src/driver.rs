//! Orchestration driver: one read, one launch, one exit code.

use std::io::BufRead;
use std::path::PathBuf;

use ignite_shared::ExitCode;
use ignite_shared::constants::KEY_LAUNCHER;

use crate::error::LaunchError;
use crate::launcher::{LaunchContext, LaunchServices, LauncherRegistry};
use crate::protocol::{PreLaunchAction, ProtocolReader};
use crate::settings::Settings;

/// Runs exactly one launch attempt per process.
#[derive(Debug, Clone)]
pub struct Driver {
    registry: LauncherRegistry,
    reader: ProtocolReader,
    context: LaunchContext,
}

impl Driver {
    pub fn new(
        registry: LauncherRegistry,
        settings: &Settings,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            reader: ProtocolReader::new(settings.protocol.empty_lines),
            context: LaunchContext::new(working_dir)
                .with_final_fields(settings.discovery.final_fields),
        }
    }

    /// Read the command stream, launch, and report the outcome as an exit code.
    ///
    /// Every failure is logged here; callers only need the code.
    pub fn run<R: BufRead>(&self, input: R, services: &LaunchServices) -> ExitCode {
        match self.try_run(input, services) {
            Ok(code) => code,
            Err(e) => {
                let code = e.exit_code();
                tracing::error!("{}", e);
                tracing::error!("Launch failed with exit code {}", code);
                code
            }
        }
    }

    /// Like [`Driver::run`], but hands the error back instead of logging it.
    ///
    /// An abort is not an error and is returned as [`ExitCode::Aborted`].
    pub fn try_run<R: BufRead>(
        &self,
        input: R,
        services: &LaunchServices,
    ) -> Result<ExitCode, LaunchError> {
        let outcome = self.reader.read(input)?;
        if outcome.action != PreLaunchAction::Launch {
            tracing::info!("Launch aborted by the launcher.");
            return Ok(ExitCode::Aborted);
        }

        let params = outcome.parameters;
        tracing::debug!("Received {} parameter keys", params.len());

        let name = params.first(KEY_LAUNCHER)?;
        let launcher = self.registry.create(name, &params, &self.context)?;
        tracing::info!(
            "Using {} launcher for {}",
            launcher.name(),
            launcher.config().main_class
        );

        launcher.launch(services)?;
        tracing::info!("Target exited normally");
        Ok(ExitCode::Normal)
    }
}
