//! Configuration shared by every launch strategy.

use hashbrown::HashSet;

use ignite_shared::constants::{
    DEFAULT_MAIN_CLASS, DEFAULT_SERVER_PORT, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    KEY_MAIN_CLASS, KEY_PARAM, KEY_SERVER_ADDRESS, KEY_SERVER_PORT, KEY_TRAITS,
    KEY_WINDOW_PARAMS, KEY_WORLD_NAME, WINDOW_MAXIMIZE,
};

use crate::environment::RuntimeEnvironment;
use crate::error::LaunchError;
use crate::params::Parameters;

use super::LaunchContext;

/// Requested window shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Windowed { width: u32, height: u32 },
    Maximized,
}

impl Default for WindowMode {
    fn default() -> Self {
        WindowMode::Windowed {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl WindowMode {
    pub fn is_maximized(&self) -> bool {
        matches!(self, WindowMode::Maximized)
    }

    /// Frame size. A maximized window still needs a restore size.
    pub fn size(&self) -> (u32, u32) {
        match *self {
            WindowMode::Windowed { width, height } => (width, height),
            WindowMode::Maximized => (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

/// Parse `windowParams`: `max` (any case) or `WIDTHxHEIGHT`.
pub fn parse_window_params(value: &str) -> Result<WindowMode, LaunchError> {
    if value.eq_ignore_ascii_case(WINDOW_MAXIMIZE) {
        return Ok(WindowMode::Maximized);
    }

    let invalid = || LaunchError::invalid(KEY_WINDOW_PARAMS, value, "expected WIDTHxHEIGHT or max");
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width: u32 = width.parse().map_err(|_| invalid())?;
    let height: u32 = height.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(LaunchError::invalid(
            KEY_WINDOW_PARAMS,
            value,
            "window dimensions must be positive",
        ));
    }

    Ok(WindowMode::Windowed { width, height })
}

/// Multiplayer server to join on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    pub address: String,
    pub port: String,
}

/// Configuration common to both strategies.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub main_class: String,
    /// Arguments for the entry point, in stream order.
    pub game_args: Vec<String>,
    pub window: WindowMode,
    pub server: Option<ServerTarget>,
    pub world_name: Option<String>,
    pub traits: HashSet<String>,
    pub environment: RuntimeEnvironment,
}

impl LaunchConfig {
    pub fn from_parameters(params: &Parameters, ctx: &LaunchContext) -> Result<Self, LaunchError> {
        let window = match params.first_opt(KEY_WINDOW_PARAMS) {
            Some(value) => parse_window_params(value)?,
            None => WindowMode::default(),
        };

        let server = match params.first_opt(KEY_SERVER_ADDRESS) {
            Some(address) => {
                let port = params.first_or_default(KEY_SERVER_PORT, DEFAULT_SERVER_PORT);
                if port.parse::<u16>().is_err() {
                    return Err(LaunchError::invalid(
                        KEY_SERVER_PORT,
                        port,
                        "expected a port number",
                    ));
                }
                Some(ServerTarget {
                    address: address.to_string(),
                    port: port.to_string(),
                })
            }
            None => None,
        };

        Ok(Self {
            main_class: params
                .first_or_default(KEY_MAIN_CLASS, DEFAULT_MAIN_CLASS)
                .to_string(),
            game_args: params.all_or_default(KEY_PARAM, Vec::new()),
            window,
            server,
            world_name: params.first_opt(KEY_WORLD_NAME).map(str::to_string),
            traits: params
                .all_or_default(KEY_TRAITS, Vec::new())
                .into_iter()
                .collect(),
            environment: RuntimeEnvironment::from_parameters(params, &ctx.working_dir),
        })
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }
}
