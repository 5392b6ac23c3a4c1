//! City generation and the static scene.
//!
//! Pure building plans and placement rules, plus the spawners that turn them
//! into entities: buildings, ground, lights and vehicle models.

/// Seeded building layout, dimensions, windows, doors and banners.
pub mod building_plan;

/// Building entity assembly from a plan.
pub mod buildings;

/// Ground plane and puddles.
pub mod ground;

/// Ambient light, sun and moon.
pub mod lighting;

/// Footprints, open-space sampling and movement blocking.
pub mod placement;

/// Neon car assembly with headlight spots and beams.
pub mod vehicle_model;
