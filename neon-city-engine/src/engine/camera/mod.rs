//! Third-person follow camera.
//!
//! Orbits the player with mouse look while the cursor is grabbed, zooms on
//! the wheel, and carries the HDR bloom setup the neon scene relies on.

/// Follow camera component, cursor grab and orbit/zoom systems.
pub mod follow_camera;
