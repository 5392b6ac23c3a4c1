/// Illuminance in lux for a directional light of scene intensity 1.
pub const LUX_PER_DIRECTIONAL_UNIT: f32 = 2_000.0;

/// Ambient brightness for an ambient intensity of 1.
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 300.0;

/// Luminous power in lumens for a point or spot light of scene intensity 1.
pub const LUMENS_PER_LIGHT_UNIT: f32 = 50_000.0;

/// Multiplier applied to every emissive strength so neon reaches the bloom threshold.
pub const EMISSIVE_SCALE: f32 = 4.0;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Length of a rendered rain streak.
pub const RAIN_STREAK_LENGTH: f32 = 0.6;
