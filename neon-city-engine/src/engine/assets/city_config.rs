use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use constants::day_night::DEFAULT_CYCLE_SECS;

pub const MAX_GRID_RADIUS: i32 = 32;
pub const MAX_RAIN_DROPS: usize = 20_000;

/// Tunable description of the city, loaded from `*.city.json`.
///
/// Every field falls back to its default when absent, so a config file only
/// needs to name what it changes.
#[derive(Asset, Resource, TypePath, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CityConfig {
    pub seed: u64,
    pub building_grid_radius: i32,
    pub building_spacing: f32,
    pub building_probability: f32,
    pub traffic_vehicle_count: usize,
    pub decorative_cube_count: usize,
    pub disco_ball_count: usize,
    pub disco_shadows: bool,
    pub rain_drop_count: usize,
    pub puddle_count: usize,
    pub day_night_cycle_secs: f32,
    pub start_phase: f32,
    pub brick_texture: Option<String>,
    pub concrete_texture: Option<String>,
    pub concrete_normal_texture: Option<String>,
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            seed: 2077,
            building_grid_radius: 4,
            building_spacing: 20.0,
            building_probability: 0.3,
            traffic_vehicle_count: 30,
            decorative_cube_count: 10,
            disco_ball_count: 5,
            disco_shadows: true,
            rain_drop_count: 2000,
            puddle_count: 30,
            day_night_cycle_secs: DEFAULT_CYCLE_SECS,
            start_phase: 0.0,
            brick_texture: None,
            concrete_texture: None,
            concrete_normal_texture: None,
            bloom_intensity: 0.3,
            bloom_threshold: 0.85,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CityConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },
    #[error("start_phase must lie in [0, 1), got {0}")]
    PhaseOutOfRange(f32),
    #[error("building_grid_radius {radius} is outside 0..={max}")]
    GridRadius { radius: i32, max: i32 },
    #[error("rain_drop_count {count} exceeds {max}")]
    TooManyRainDrops { count: usize, max: usize },
}

impl CityConfig {
    /// Rejects values the generators cannot work with.
    pub fn validate(&self) -> Result<(), CityConfigError> {
        positive("building_spacing", self.building_spacing)?;
        positive("day_night_cycle_secs", self.day_night_cycle_secs)?;
        unit_range("building_probability", self.building_probability)?;
        unit_range("bloom_intensity", self.bloom_intensity)?;
        if !(0.0..1.0).contains(&self.start_phase) {
            return Err(CityConfigError::PhaseOutOfRange(self.start_phase));
        }
        if !(0..=MAX_GRID_RADIUS).contains(&self.building_grid_radius) {
            return Err(CityConfigError::GridRadius {
                radius: self.building_grid_radius,
                max: MAX_GRID_RADIUS,
            });
        }
        if self.rain_drop_count > MAX_RAIN_DROPS {
            return Err(CityConfigError::TooManyRainDrops {
                count: self.rain_drop_count,
                max: MAX_RAIN_DROPS,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), CityConfigError> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(CityConfigError::NonPositive { field, value })
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), CityConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CityConfigError::OutOfUnitRange { field, value })
    }
}
