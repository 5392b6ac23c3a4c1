use bevy::prelude::*;

/// Neon colours used for windows, cubes and mirror tiles.
pub const NEON_COLORS: &[u32] = &[
    0xff00ff, 0x00ffff, 0xff3366, 0x33ff33, 0xff6600, 0x0066ff, 0xffff00, 0xff9900, 0x9900ff,
    0x00ff99, 0x6600ff, 0xff0066,
];

/// Vehicle body colours, a subset of the neon palette.
pub const VEHICLE_NEON_COLORS: &[u32] = &[0xff00ff, 0x00ffff, 0xff3366, 0x33ff33, 0xff6600, 0x0066ff];

pub const BUILDING_EDGE_COLOR: u32 = 0x00ffff;
pub const DOOR_NEON_COLOR: u32 = 0xff00ff;
pub const WINDOW_FRAME_COLOR: u32 = 0x333333;
pub const ANTENNA_COLOR: u32 = 0x888888;
pub const PUDDLE_COLOR: u32 = 0x111111;
pub const PLAYER_COLOR: u32 = 0x00ff00;
pub const POINTER_COLOR: u32 = 0xffff00;
pub const PUNCH_PARTICLE_COLOR: u32 = 0xb5b5b5;

pub const DAY_SKY_COLOR: u32 = 0x4287f5;
pub const NIGHT_SKY_COLOR: u32 = 0x000011;
pub const AMBIENT_LIGHT_COLOR: u32 = 0xe6eaff;

pub const SUN_COLOR: u32 = 0xf85a3e;
pub const SUN_LIGHT_COLOR: u32 = 0xfff2b0;
pub const MOON_COLOR: u32 = 0xb0b0ff;
pub const MOON_EMISSIVE_COLOR: u32 = 0x7777ff;
pub const MOON_LIGHT_COLOR: u32 = 0xccddff;

pub const HEADLIGHT_COLOR: u32 = 0xffffaa;
pub const HEADLIGHT_BEAM_LIGHT_COLOR: u32 = 0xffffee;
pub const TAILLIGHT_COLOR: u32 = 0xff0000;
pub const WHEEL_COLOR: u32 = 0x222222;

/// Advertisement gradient stops, evenly spaced across the banner.
pub const AD_GRADIENT: &[u32] = &[0xff00ff, 0x00ffff, 0xffff00, 0xff00ff];
pub const AD_IMAGE_COLOR: u32 = 0x550055;

/// Rainbow stops for the painted disco ball, top to bottom.
pub const RAINBOW_GRADIENT: &[u32] = &[
    0xff0000, 0xffa500, 0xffff00, 0x008000, 0x0000ff, 0x4b0082, 0xee82ee,
];

/// Splits a `0xRRGGBB` value into normalised sRGB channels.
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn hex_color(hex: u32) -> Color {
    let [r, g, b] = hex_to_srgb(hex);
    Color::srgb(r, g, b)
}

/// Linear emissive colour for a palette entry at the given strength.
pub fn hex_emissive(hex: u32, strength: f32) -> LinearRgba {
    scaled_emissive(hex_color(hex), strength)
}

/// Linear emissive for any colour at the given strength, alpha left at 1.
pub fn scaled_emissive(color: Color, strength: f32) -> LinearRgba {
    let linear = color.to_linear();
    LinearRgba::rgb(
        linear.red * strength,
        linear.green * strength,
        linear.blue * strength,
    )
}

/// Oscillating hue in `[0, 1]`.
pub fn hue_cycle(t: f32) -> f32 {
    (t.sin() + 1.0) / 2.0
}

/// Fully saturated neon colour for a hue in `[0, 1]`.
pub fn neon_hue(hue: f32) -> Color {
    Color::hsl(hue.rem_euclid(1.0) * 360.0, 1.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels_are_split_in_rgb_order() {
        assert_eq!(hex_to_srgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_srgb(0x00ff00), [0.0, 1.0, 0.0]);
        let [r, g, b] = hex_to_srgb(0x336699);
        assert!((r - 0.2).abs() < 1e-6);
        assert!((g - 0.4).abs() < 1e-6);
        assert!((b - 0.6).abs() < 1e-6);
    }

    #[test]
    fn hue_cycle_stays_in_unit_range() {
        for i in 0..200 {
            let h = hue_cycle(i as f32 * 0.37);
            assert!((0.0..=1.0).contains(&h));
        }
        assert!((hue_cycle(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn vehicle_colours_come_from_the_neon_palette() {
        for c in VEHICLE_NEON_COLORS {
            assert!(NEON_COLORS.contains(c));
        }
    }
}
