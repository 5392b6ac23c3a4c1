//! Procedural mesh builders for geometry Bevy's primitives do not cover.
//!
//! Line lists for neon outlines, the open cone used by headlight beams and
//! flat fan polygons for puddles and the interaction pointer.

/// Open cone with a length-wise UV ramp for volumetric beams.
pub mod beam_cone;

/// Flat polygons: puddle fans and the pointer triangle.
pub mod flat_shapes;

/// Line-list meshes for building edges and door neon.
pub mod neon_lines;
