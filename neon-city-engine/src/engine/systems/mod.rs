//! Per-frame animation and diagnostics.
//!
//! Everything that moves after the city is generated: the day/night cycle
//! and the props that react to it, traffic, weather, ads and FPS reporting.

/// Scrolling banner UVs and the pulsing text glow.
pub mod advertisement;

/// Phase-driven sun, moon, sky and ambient light. Publishes the night weight.
pub mod day_night;

/// Floating cubes that bob, spin and cycle hue after dusk.
pub mod decorative_cubes;

/// Mirror-tiled disco balls with breathing point and spot lights.
pub mod disco_balls;

/// Headlight fade-out/fade-in state machine.
pub mod flicker;

/// FPS and day/night notifications over RPC, plus the native FPS overlay text.
///
/// Sends frame rate updates to the host page and updates native UI overlays.
pub mod fps_tracking;

/// Falling rain streaks in one dynamic line mesh.
pub mod rain;

/// Rising rooftop smoke puffs.
pub mod smoke;

/// Traffic flight paths and headlight output.
pub mod vehicles;
