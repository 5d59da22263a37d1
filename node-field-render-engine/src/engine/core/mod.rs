//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! system ordering and plugin initialisation.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the instanced render pipeline, asset loading
/// systems and the gesture layer.
pub mod app_setup;

/// Application state machine, system sets and loading transitions.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
