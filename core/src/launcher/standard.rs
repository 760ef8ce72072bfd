//! Standard launch: pass everything to the entry point as arguments.

use ignite_shared::constants::{TRAIT_QUICK_PLAY_MULTIPLAYER, TRAIT_QUICK_PLAY_SINGLEPLAYER};

use crate::error::LaunchError;
use crate::params::Parameters;
use crate::reflect::find_main_method;

use super::common::{LaunchConfig, WindowMode};
use super::{LaunchContext, LaunchServices};

#[derive(Debug, Clone)]
pub struct StandardLauncher {
    config: LaunchConfig,
}

impl StandardLauncher {
    pub fn new(params: &Parameters, ctx: &LaunchContext) -> Result<Self, LaunchError> {
        Ok(Self {
            config: LaunchConfig::from_parameters(params, ctx)?,
        })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Final argument list for the entry point.
    pub fn game_arguments(&self) -> Vec<String> {
        let config = &self.config;
        let mut args = config.game_args.clone();

        if let WindowMode::Windowed { width, height } = config.window {
            args.push("--width".to_string());
            args.push(width.to_string());
            args.push("--height".to_string());
            args.push(height.to_string());
        }

        if let Some(server) = &config.server {
            if config.has_trait(TRAIT_QUICK_PLAY_MULTIPLAYER) {
                args.push("--quickPlayMultiplayer".to_string());
                args.push(format!("{}:{}", server.address, server.port));
            } else {
                args.push("--server".to_string());
                args.push(server.address.clone());
                args.push("--port".to_string());
                args.push(server.port.clone());
            }
        } else if let Some(world) = &config.world_name
            && config.has_trait(TRAIT_QUICK_PLAY_SINGLEPLAYER)
        {
            args.push("--quickPlaySingleplayer".to_string());
            args.push(world.clone());
        }

        args
    }

    pub fn launch(&self, services: &LaunchServices) -> Result<(), LaunchError> {
        let loader = services.class_loaders.create(&self.config.environment)?;
        let main_class = &self.config.main_class;
        let entry = find_main_method(loader.as_ref(), main_class)?;

        let args = self.game_arguments();
        tracing::info!("Invoking {}.main with {} arguments", main_class, args.len());

        entry.invoke(&args).map_err(|source| LaunchError::TargetFailed {
            class: main_class.clone(),
            source,
        })
    }
}
