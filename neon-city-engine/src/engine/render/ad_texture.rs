use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use constants::palette::{AD_GRADIENT, AD_IMAGE_COLOR, RAINBOW_GRADIENT, hex_to_srgb};

pub const BANNER_WIDTH: u32 = 512;
pub const BANNER_HEIGHT: u32 = 128;
pub const PANEL_WIDTH: u32 = 512;
pub const PANEL_HEIGHT: u32 = 384;
pub const RAINBOW_SIZE: u32 = 256;

pub const BANNER_TEXT: &str = "CYBER CITY ";

const AD_STOPS: [f32; 4] = [0.0, 0.33, 0.66, 1.0];
const RAINBOW_STOPS: [f32; 7] = [0.0, 0.17, 0.33, 0.5, 0.67, 0.83, 1.0];

const GLYPH_ROWS: usize = 7;
const GLYPH_COLS: usize = 5;
const GLYPH_SCALE: u32 = 7;

/// 5x7 bitmap glyphs for the banner text.
fn glyph(c: char) -> Option<[&'static str; GLYPH_ROWS]> {
    let rows = match c {
        'B' => ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'I' => [".###.", "..#..", "..#..", "..#..", "..#..", "..#..", ".###."],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'Y' => ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."],
        ' ' => ["....."; GLYPH_ROWS],
        _ => return None,
    };
    Some(rows)
}

/// Piecewise-linear colour ramp over `(position, 0xRRGGBB)` stops.
pub fn gradient_sample(positions: &[f32], colors: &[u32], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let last = positions.len().min(colors.len()) - 1;
    for i in 0..last {
        let (start, end) = (positions[i], positions[i + 1]);
        if t <= end {
            let local = if end > start { (t - start) / (end - start) } else { 0.0 };
            let a = hex_to_srgb(colors[i]);
            let b = hex_to_srgb(colors[i + 1]);
            return [
                a[0] + (b[0] - a[0]) * local,
                a[1] + (b[1] - a[1]) * local,
                a[2] + (b[2] - a[2]) * local,
            ];
        }
    }
    hex_to_srgb(colors[last])
}

fn to_rgba8(rgb: [f32; 3]) -> [u8; 4] {
    [
        (rgb[0] * 255.0).round() as u8,
        (rgb[1] * 255.0).round() as u8,
        (rgb[2] * 255.0).round() as u8,
        255,
    ]
}

/// Neon gradient strip with the banner text stamped in white, centred.
pub fn banner_pixels() -> Vec<u8> {
    let (width, height) = (BANNER_WIDTH as usize, BANNER_HEIGHT as usize);
    let mut data = Vec::with_capacity(width * height * 4);
    for _y in 0..height {
        for x in 0..width {
            let t = x as f32 / (width - 1) as f32;
            data.extend_from_slice(&to_rgba8(gradient_sample(&AD_STOPS, AD_GRADIENT, t)));
        }
    }

    let advance = (GLYPH_COLS as u32 + 1) * GLYPH_SCALE;
    let text_width = advance * BANNER_TEXT.chars().count() as u32;
    let origin_x = BANNER_WIDTH.saturating_sub(text_width) / 2;
    let origin_y = (BANNER_HEIGHT - GLYPH_ROWS as u32 * GLYPH_SCALE) / 2;

    for (i, c) in BANNER_TEXT.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let glyph_x = origin_x + i as u32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for (col, bit) in bits.chars().enumerate() {
                if bit != '#' {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let px = glyph_x + col as u32 * GLYPH_SCALE + dx;
                        let py = origin_y + row as u32 * GLYPH_SCALE + dy;
                        if px < BANNER_WIDTH && py < BANNER_HEIGHT {
                            let offset = ((py * BANNER_WIDTH + px) * 4) as usize;
                            data[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
                        }
                    }
                }
            }
        }
    }

    data
}

pub fn rainbow_pixels() -> Vec<u8> {
    let size = RAINBOW_SIZE as usize;
    let mut data = Vec::with_capacity(size * size * 4);
    for y in 0..size {
        let texel = to_rgba8(gradient_sample(
            &RAINBOW_STOPS,
            RAINBOW_GRADIENT,
            y as f32 / (size - 1) as f32,
        ));
        for _x in 0..size {
            data.extend_from_slice(&texel);
        }
    }
    data
}

fn rgba_image(width: u32, height: u32, data: Vec<u8>, address_mode_v: ImageAddressMode) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v,
        ..ImageSamplerDescriptor::linear()
    });
    image
}

pub fn banner_image() -> Image {
    rgba_image(
        BANNER_WIDTH,
        BANNER_HEIGHT,
        banner_pixels(),
        ImageAddressMode::Repeat,
    )
}

/// Flat backdrop shown under the text strip until real artwork exists.
pub fn image_panel() -> Image {
    let texel = to_rgba8(hex_to_srgb(AD_IMAGE_COLOR));
    let data = texel.repeat((PANEL_WIDTH * PANEL_HEIGHT) as usize);
    rgba_image(PANEL_WIDTH, PANEL_HEIGHT, data, ImageAddressMode::ClampToEdge)
}

pub fn rainbow_image() -> Image {
    rgba_image(
        RAINBOW_SIZE,
        RAINBOW_SIZE,
        rainbow_pixels(),
        ImageAddressMode::ClampToEdge,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let o = ((y * width + x) * 4) as usize;
        [data[o], data[o + 1], data[o + 2], data[o + 3]]
    }

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(gradient_sample(&AD_STOPS, AD_GRADIENT, 0.0), [1.0, 0.0, 1.0]);
        assert_eq!(gradient_sample(&AD_STOPS, AD_GRADIENT, 0.33), [0.0, 1.0, 1.0]);
        assert_eq!(gradient_sample(&AD_STOPS, AD_GRADIENT, 1.0), [1.0, 0.0, 1.0]);
        let mid = gradient_sample(&AD_STOPS, AD_GRADIENT, 0.165);
        assert!((mid[0] - 0.5).abs() < 1e-3 && (mid[1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn banner_has_white_text_over_gradient() {
        let data = banner_pixels();
        assert_eq!(data.len(), (BANNER_WIDTH * BANNER_HEIGHT * 4) as usize);
        // corners are pure gradient
        assert_eq!(pixel(&data, BANNER_WIDTH, 0, 0), [255, 0, 255, 255]);
        let white = data.chunks(4).filter(|p| *p == [255, 255, 255, 255]).count();
        assert!(white > 1000);
        // top rows are above the glyph band
        assert!((0..BANNER_WIDTH).all(|x| pixel(&data, BANNER_WIDTH, x, 2) != [255, 255, 255, 255]));
    }

    #[test]
    fn every_banner_character_has_a_glyph() {
        assert!(BANNER_TEXT.chars().all(|c| glyph(c).is_some()));
        let advance = (GLYPH_COLS as u32 + 1) * GLYPH_SCALE;
        assert!(advance * BANNER_TEXT.chars().count() as u32 <= BANNER_WIDTH);
    }

    #[test]
    fn rainbow_runs_red_to_violet_top_to_bottom() {
        let data = rainbow_pixels();
        assert_eq!(pixel(&data, RAINBOW_SIZE, 10, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&data, RAINBOW_SIZE, 10, RAINBOW_SIZE - 1), [238, 130, 238, 255]);
    }
}
