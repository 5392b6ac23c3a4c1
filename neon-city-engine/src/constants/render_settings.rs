use bevy::core_pipeline::bloom::{Bloom, BloomCompositeMode, BloomPrefilter};

/// Bloom tuned for neon: additive composite with a bright-pass prefilter.
pub fn neon_bloom(intensity: f32, threshold: f32) -> Bloom {
    Bloom {
        intensity,
        low_frequency_boost: 0.6,
        low_frequency_boost_curvature: 0.9,
        high_pass_frequency: 1.0,
        prefilter: BloomPrefilter {
            threshold,
            threshold_softness: 0.2,
        },
        composite_mode: BloomCompositeMode::Additive,
        ..Bloom::NATURAL
    }
}

pub const FPS_TEXT_SIZE: f32 = 16.0;
pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;
pub const DAY_NIGHT_NOTIFY_INTERVAL_SECS: f32 = 1.0;
