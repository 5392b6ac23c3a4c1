use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::{FOOTPRINT_CLEARANCE, MAX_PLACEMENT_ATTEMPTS};

/// Ground footprint of one building, used to keep props out of walls and to
/// block the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingFootprint {
    pub x: f32,
    pub z: f32,
    /// One unit above the roof.
    pub top_y: f32,
    /// Clearance circle: half the longest side plus a margin.
    pub radius: f32,
    pub half_width: f32,
    pub half_depth: f32,
}

impl BuildingFootprint {
    pub fn new(x: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        Self {
            x,
            z,
            top_y: height + 1.0,
            radius: width.max(depth) / 2.0 + FOOTPRINT_CLEARANCE,
            half_width: width / 2.0,
            half_depth: depth / 2.0,
        }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        let dx = x - self.x;
        let dz = z - self.z;
        (dx * dx + dz * dz).sqrt() < self.radius
    }

    /// Box test against the real walls grown by `margin`.
    pub fn blocks(&self, x: f32, z: f32, margin: f32) -> bool {
        (x - self.x).abs() < self.half_width + margin && (z - self.z).abs() < self.half_depth + margin
    }
}

/// Every building footprint in the generated city, one entry per building.
#[derive(Resource, Default, Debug, Clone)]
pub struct CityFootprints(pub Vec<BuildingFootprint>);

impl CityFootprints {
    pub fn is_inside_any_building(&self, x: f32, z: f32) -> bool {
        is_inside_any_building(x, z, &self.0)
    }

    pub fn blocks_movement(&self, x: f32, z: f32, margin: f32) -> bool {
        self.0.iter().any(|f| f.blocks(x, z, margin))
    }
}

pub fn is_inside_any_building(x: f32, z: f32, footprints: &[BuildingFootprint]) -> bool {
    footprints.iter().any(|f| f.contains(x, z))
}

/// Rejection-samples an XZ position in `[-half_range, half_range)` that is
/// clear of every footprint. Gives up after a fixed number of attempts.
pub fn sample_open_position(
    rng: &mut impl Rng,
    half_range: f32,
    footprints: &[BuildingFootprint],
) -> Option<Vec2> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = (rng.random::<f32>() - 0.5) * half_range * 2.0;
        let z = (rng.random::<f32>() - 0.5) * half_range * 2.0;
        if !is_inside_any_building(x, z, footprints) {
            return Some(Vec2::new(x, z));
        }
    }
    None
}
