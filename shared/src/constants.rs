//! Centralized constants for the ignite command stream.
//!
//! This module is the single source of truth for every key, bare token and
//! trait name the parent process may send, plus the defaults the launch
//! strategies fall back to when a key is absent.

// =============================================================================
// Bare tokens
// =============================================================================

/// Terminates parsing and begins the launch.
pub const TOKEN_LAUNCH: &str = "launch";

/// Terminates parsing and abandons the launch.
pub const TOKEN_ABORT: &str = "abort";

// =============================================================================
// Parameter keys
// =============================================================================

/// Selects the launch strategy (`standard`, `legacy`, `onesix`).
pub const KEY_LAUNCHER: &str = "launcher";
pub const KEY_USER_NAME: &str = "userName";
pub const KEY_SESSION_ID: &str = "sessionId";
pub const KEY_MAIN_CLASS: &str = "mainClass";
pub const KEY_APPLET_CLASS: &str = "appletClass";
/// Repeatable; each value is one argument for the target.
pub const KEY_PARAM: &str = "param";
pub const KEY_WINDOW_TITLE: &str = "windowTitle";
/// Either `WIDTHxHEIGHT` or the literal `max`.
pub const KEY_WINDOW_PARAMS: &str = "windowParams";
/// Repeatable capability flags.
pub const KEY_TRAITS: &str = "traits";
pub const KEY_SERVER_ADDRESS: &str = "serverAddress";
pub const KEY_SERVER_PORT: &str = "serverPort";
pub const KEY_WORLD_NAME: &str = "worldName";
/// Repeatable class-path entry.
pub const KEY_CLASS_PATH: &str = "classPath";
/// Older spelling of [`KEY_CLASS_PATH`], still sent by some hosts.
pub const KEY_CLASS_PATH_LEGACY: &str = "cp";
/// Directory holding extracted native libraries.
pub const KEY_NATIVES: &str = "natives";

// =============================================================================
// Traits
// =============================================================================

/// Disables the compatibility wrapper for legacy launches.
pub const TRAIT_NO_APPLET: &str = "noapplet";
pub const TRAIT_LEGACY_LAUNCH: &str = "legacyLaunch";
pub const TRAIT_ALPHA_LAUNCH: &str = "alphaLaunch";
pub const TRAIT_QUICK_PLAY_MULTIPLAYER: &str = "feature:is_quick_play_multiplayer";
pub const TRAIT_QUICK_PLAY_SINGLEPLAYER: &str = "feature:is_quick_play_singleplayer";

// =============================================================================
// Launcher names
// =============================================================================

pub const LAUNCHER_STANDARD: &str = "standard";
pub const LAUNCHER_LEGACY: &str = "legacy";
/// Historical name that picks standard or legacy from the trait set.
pub const LAUNCHER_ONESIX: &str = "onesix";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_MAIN_CLASS: &str = "net.minecraft.client.Minecraft";
pub const DEFAULT_APPLET_CLASS: &str = "net.minecraft.client.MinecraftApplet";
pub const DEFAULT_WINDOW_TITLE: &str = "Minecraft";
pub const DEFAULT_WINDOW_WIDTH: u32 = 854;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 480;
pub const DEFAULT_SERVER_PORT: &str = "25565";

/// Literal `windowParams` value requesting a maximized window.
pub const WINDOW_MAXIMIZE: &str = "max";

/// Argument whose presence switches the compatibility wrapper into demo mode.
pub const DEMO_ARGUMENT: &str = "--demo";

/// Property pointing old targets at their base directory.
pub const PROPERTY_TARGET_DIRECTORY: &str = "minecraft.applet.TargetDirectory";
pub const PROPERTY_LIBRARY_PATH: &str = "java.library.path";
pub const PROPERTY_LWJGL_LIBRARY_PATH: &str = "org.lwjgl.librarypath";
pub const PROPERTY_JINPUT_LIBRARY_PATH: &str = "net.java.games.input.librarypath";
