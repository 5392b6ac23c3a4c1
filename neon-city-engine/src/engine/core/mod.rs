//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with materials, asset loading systems, state-gated
/// scene animation and platform-specific overlays.
pub mod app_setup;

/// Application state machine: config loading, city generation, runtime.
pub mod app_state;

/// Seeded random source shared by generation and runtime effects.
pub mod random;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
