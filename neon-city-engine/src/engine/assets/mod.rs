//! Data-driven inputs for city generation.
//!
//! The city is described by a small JSON config asset; everything else is
//! generated procedurally from its seed.

/// City configuration asset with defaults, validation and error types.
pub mod city_config;

/// Optional brick and concrete textures, loaded with a repeating sampler.
pub mod surface_textures;
