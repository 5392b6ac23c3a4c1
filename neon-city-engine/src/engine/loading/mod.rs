//! Startup pipeline: config loading, then one-shot city generation.

/// City config loading with validation and fallback to defaults.
pub mod config_loader;

/// Spawns the whole city once the config is available.
pub mod city_creator;

/// Loading progress flags driving state transitions.
pub mod progress;
