//! Legacy launch: base directory injection and the compatibility wrapper.
//!
//! Old targets ignore the working directory and compute their data folder
//! from a private static directory field, so that field is overwritten first.
//! Targets that predate a usable entry point are then hosted in a
//! compatibility window. If anything about the wrapper fails, the plain
//! entry point is invoked instead.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use ignite_shared::constants::{
    DEFAULT_APPLET_CLASS, DEFAULT_WINDOW_TITLE, DEMO_ARGUMENT, KEY_APPLET_CLASS, KEY_SESSION_ID,
    KEY_USER_NAME, KEY_WINDOW_TITLE, TRAIT_NO_APPLET,
};

use crate::error::LaunchError;
use crate::params::Parameters;
use crate::reflect::{
    ClassLoader, TargetClass, create_applet, find_base_dir_field, find_main_entrypoint,
};
use crate::settings::FinalFieldPolicy;
use crate::window::{MpTicket, WindowFactory, WrapperSession};

use super::common::LaunchConfig;
use super::{LaunchContext, LaunchServices};

/// Name of the thread the compatibility window runs on.
pub const WRAPPER_THREAD_NAME: &str = "compat-wrapper";

#[derive(Debug, Clone)]
pub struct LegacyLauncher {
    config: LaunchConfig,
    user: String,
    session: String,
    title: String,
    applet_class: String,
    use_applet: bool,
    working_dir: PathBuf,
    final_fields: FinalFieldPolicy,
}

impl LegacyLauncher {
    pub fn new(params: &Parameters, ctx: &LaunchContext) -> Result<Self, LaunchError> {
        let config = LaunchConfig::from_parameters(params, ctx)?;
        let use_applet = !config.has_trait(TRAIT_NO_APPLET);

        Ok(Self {
            user: params.first(KEY_USER_NAME)?.to_string(),
            session: params.first(KEY_SESSION_ID)?.to_string(),
            title: params
                .first_or_default(KEY_WINDOW_TITLE, DEFAULT_WINDOW_TITLE)
                .to_string(),
            applet_class: params
                .first_or_default(KEY_APPLET_CLASS, DEFAULT_APPLET_CLASS)
                .to_string(),
            use_applet,
            working_dir: ctx.working_dir.clone(),
            final_fields: ctx.final_fields,
            config,
        })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn uses_applet(&self) -> bool {
        self.use_applet
    }

    pub fn launch(&self, services: &LaunchServices) -> Result<(), LaunchError> {
        let loader = services.class_loaders.create(&self.config.environment)?;
        let main = loader.load_class(&self.config.main_class)?;

        self.inject_base_dir(main.as_ref())?;

        if self.uses_applet() {
            match self.run_wrapper(loader.clone(), services.windows.clone()) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::error!("Running applet wrapper failed: {}", e);
                    tracing::warn!("Falling back to {}.main", self.config.main_class);
                }
            }
        }

        // Size flags are not added here; versions that need the wrapper ignore them.
        let entry = find_main_entrypoint(main.as_ref())?;
        tracing::info!(
            "Invoking {}.main with {} arguments",
            self.config.main_class,
            self.config.game_args.len()
        );
        entry
            .invoke(&self.config.game_args)
            .map_err(|source| LaunchError::TargetFailed {
                class: self.config.main_class.clone(),
                source,
            })
    }

    /// Point the target's base directory field at the working directory.
    fn inject_base_dir(&self, main: &dyn TargetClass) -> Result<(), LaunchError> {
        let fields = main.declared_fields();
        let Some(field) = find_base_dir_field(&fields, self.final_fields) else {
            tracing::warn!(
                "No base directory field found in {}; the target will pick its own",
                main.name()
            );
            return Ok(());
        };

        main.set_static_field(&field.name, &self.working_dir)
            .map_err(|source| LaunchError::TargetFailed {
                class: main.name().to_string(),
                source,
            })?;
        tracing::debug!(
            "Set {}.{} to {}",
            main.name(),
            field.name,
            self.working_dir.display()
        );
        Ok(())
    }

    pub fn wrapper_session(&self) -> WrapperSession {
        let (width, height) = self.config.window.size();
        let server = self.config.server.as_ref();

        WrapperSession {
            user: self.user.clone(),
            session: self.session.clone(),
            width,
            height,
            maximize: self.config.window.is_maximized(),
            server_address: server.map(|s| s.address.clone()),
            server_port: server.map(|s| s.port.clone()),
            demo: self.config.game_args.iter().any(|arg| arg == DEMO_ARGUMENT),
            ticket: MpTicket::load(&self.working_dir.join("..")),
        }
    }

    /// Host the applet in a compatibility window and wait for it to finish.
    ///
    /// Applet instantiation, window construction and the window itself all
    /// run on the wrapper thread, so a panic in any of them surfaces as
    /// `WrapperConstructionFailed` from the join.
    fn run_wrapper(
        &self,
        loader: Arc<dyn ClassLoader>,
        windows: Arc<dyn WindowFactory>,
    ) -> Result<(), LaunchError> {
        let applet_class = self.applet_class.clone();
        let title = self.title.clone();
        let session = self.wrapper_session();

        let handle = thread::Builder::new()
            .name(WRAPPER_THREAD_NAME.to_string())
            .spawn(move || -> Result<(), LaunchError> {
                let applet = create_applet(loader.as_ref(), &applet_class)?;
                let window = windows.construct(&title, applet)?;
                window
                    .start(session)
                    .map_err(|e| LaunchError::WrapperConstructionFailed(format!("{:#}", e)))
            })
            .map_err(|e| {
                LaunchError::WrapperConstructionFailed(format!("cannot spawn wrapper thread: {}", e))
            })?;

        match handle.join() {
            Ok(result) => result,
            Err(_) => Err(LaunchError::WrapperConstructionFailed(
                "wrapper thread panicked".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        let mut params = Parameters::new();
        params.add("userName", "alice");
        params.add("sessionId", "token");
        for (key, value) in pairs {
            params.add(*key, *value);
        }
        params
    }

    #[test]
    fn test_requires_identity() {
        let mut missing_user = Parameters::new();
        missing_user.add("sessionId", "token");
        let err = LegacyLauncher::new(&missing_user, &LaunchContext::new("/")).unwrap_err();
        assert!(matches!(err, LaunchError::KeyNotFound(key) if key == "userName"));

        let mut missing_session = Parameters::new();
        missing_session.add("userName", "alice");
        let err = LegacyLauncher::new(&missing_session, &LaunchContext::new("/")).unwrap_err();
        assert!(matches!(err, LaunchError::KeyNotFound(key) if key == "sessionId"));
    }

    #[test]
    fn test_defaults() {
        let launcher = LegacyLauncher::new(&params(&[]), &LaunchContext::new("/")).unwrap();
        assert_eq!(launcher.title, "Minecraft");
        assert_eq!(launcher.applet_class, "net.minecraft.client.MinecraftApplet");
        assert!(launcher.uses_applet());
    }

    #[test]
    fn test_noapplet_trait_disables_wrapper() {
        let launcher =
            LegacyLauncher::new(&params(&[("traits", "noapplet")]), &LaunchContext::new("/"))
                .unwrap();
        assert!(!launcher.uses_applet());
    }

    #[test]
    fn test_wrapper_session() {
        let dir = tempfile::tempdir().unwrap();
        let game_dir = dir.path().join("minecraft");
        fs::create_dir(&game_dir).unwrap();
        fs::write(dir.path().join("mpticket"), "classic.example.net\n25565\nsecret\n").unwrap();

        let launcher = LegacyLauncher::new(
            &params(&[
                ("windowParams", "max"),
                ("param", "--demo"),
                ("serverAddress", "play.example.org"),
            ]),
            &LaunchContext::new(&game_dir),
        )
        .unwrap();
        let session = launcher.wrapper_session();

        assert_eq!(session.user, "alice");
        assert_eq!(session.session, "token");
        assert_eq!((session.width, session.height), (854, 480));
        assert!(session.maximize);
        assert!(session.demo);
        assert_eq!(session.server_address.as_deref(), Some("play.example.org"));
        assert_eq!(session.server_port.as_deref(), Some("25565"));
        assert_eq!(session.ticket.unwrap().mppass, "secret");
    }

    #[test]
    fn test_wrapper_session_without_demo() {
        let launcher = LegacyLauncher::new(
            &params(&[("windowParams", "640x480"), ("param", "--demoMode")]),
            &LaunchContext::new("/nonexistent/game"),
        )
        .unwrap();
        let session = launcher.wrapper_session();
        assert!(!session.demo);
        assert!(!session.maximize);
        assert_eq!((session.width, session.height), (640, 480));
        assert_eq!(session.ticket, None);
    }
}
