//! Rendering pieces the standard PBR material cannot express directly.
//!
//! Procedural canvas-style textures and the additive volumetric beam material
//! used by vehicle headlights.

/// Procedural RGBA textures: scrolling ad strip, image panel, rainbow gradient.
pub mod ad_texture;

/// Additive cone material for headlight beams.
pub mod light_beam;
