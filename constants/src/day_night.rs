/// Per-frame constants in the scene are tuned against this frame rate.
pub const REFERENCE_FPS: f32 = 60.0;

pub const DEFAULT_CYCLE_SECS: f32 = 60.0;

/// Height at which a hidden sun or moon is parked.
pub const HIDDEN_BODY_Y: f32 = -999.0;

/// Horizontal half span of the sun and moon arc.
pub const ARC_HALF_SPAN: f32 = 200.0;
pub const ARC_PEAK_HEIGHT: f32 = 120.0;

pub const SUN_INTENSITY: f32 = 1.2;
pub const MOON_INTENSITY: f32 = 0.8;
pub const DAY_AMBIENT: f32 = 0.3;
pub const NIGHT_AMBIENT: f32 = 0.05;

/// Below this night alpha the night-only props rest.
pub const NIGHT_PROPS_THRESHOLD: f32 = 0.1;
