//! Pure building layout: dimensions, doors, windows, banners and roof details.
//!
//! Nothing here touches the ECS, so a plan can be inspected and tested before
//! it is turned into entities by the building assembly.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::{MAX_WINDOWS_PER_BUILDING, WINDOW_SPACING};
use constants::palette::NEON_COLORS;

use crate::engine::assets::city_config::CityConfig;
use crate::engine::scene::placement::BuildingFootprint;

const FLOOR_HEIGHT: f32 = 3.0;
const MAX_DOOR_HEIGHT: f32 = 4.0;
const MAX_DOOR_WIDTH: f32 = 3.0;

/// One of the four vertical faces of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facade {
    /// +Z, the face with the door.
    Front,
    /// +X
    Right,
    /// -Z
    Back,
    /// -X
    Left,
}

impl Facade {
    pub const ALL: [Facade; 4] = [Facade::Front, Facade::Right, Facade::Back, Facade::Left];

    pub fn yaw(self) -> f32 {
        match self {
            Facade::Front => 0.0,
            Facade::Right => FRAC_PI_2,
            Facade::Back => PI,
            Facade::Left => -FRAC_PI_2,
        }
    }

    /// Horizontal extent of the face.
    pub fn span(self, width: f32, depth: f32) -> f32 {
        match self {
            Facade::Front | Facade::Back => width,
            Facade::Right | Facade::Left => depth,
        }
    }

    /// Distance from the building centre to the face.
    pub fn half_thickness(self, width: f32, depth: f32) -> f32 {
        match self {
            Facade::Front | Facade::Back => depth / 2.0,
            Facade::Right | Facade::Left => width / 2.0,
        }
    }

    pub fn rotation(self) -> Quat {
        Quat::from_rotation_y(self.yaw())
    }

    /// Building-local position on this face. `horizontal` runs along the face,
    /// `vertical` is relative to the building centre and `standoff` pushes the
    /// point out of the wall.
    pub fn place(self, width: f32, depth: f32, horizontal: f32, vertical: f32, standoff: f32) -> Vec3 {
        self.rotation()
            * Vec3::new(
                horizontal,
                vertical,
                self.half_thickness(width, depth) + standoff,
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSlot {
    pub facade: Facade,
    pub horizontal: f32,
    pub vertical: f32,
    pub color_index: usize,
}

/// Advertisement banner wrapped around the upper third of a building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdPlan {
    pub banner_height: f32,
    /// Banner centre, relative to the building centre.
    pub center_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPlan {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub tint: [f32; 3],
    pub door_width: f32,
    pub door_height: f32,
    pub advertisement: Option<AdPlan>,
    pub windows: Vec<WindowSlot>,
    pub antenna_height: Option<f32>,
    pub emits_smoke: bool,
}

impl BuildingPlan {
    pub fn footprint(&self) -> BuildingFootprint {
        BuildingFootprint::new(self.x, self.z, self.width, self.height, self.depth)
    }

    /// World position of the building centre.
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.x, self.height / 2.0, self.z)
    }

    /// Local Y of the ground under the building.
    pub fn base_y(&self) -> f32 {
        -self.height / 2.0
    }
}

/// Lays buildings on a jittered grid, keeping each cell with the configured probability.
pub fn plan_city(config: &CityConfig, rng: &mut impl Rng) -> Vec<BuildingPlan> {
    let radius = config.building_grid_radius;
    let spacing = config.building_spacing;
    let mut plans = Vec::new();

    for i in -radius..=radius {
        for j in -radius..=radius {
            if rng.random::<f32>() < config.building_probability {
                let x = i as f32 * spacing + (rng.random::<f32>() - 0.5) * spacing * 0.5;
                let z = j as f32 * spacing + (rng.random::<f32>() - 0.5) * spacing * 0.5;
                plans.push(plan_building(x, z, rng));
            }
        }
    }

    plans
}

pub fn plan_building(x: f32, z: f32, rng: &mut impl Rng) -> BuildingPlan {
    let width = 5.0 + rng.random::<f32>() * 10.0;
    let height = 20.0 + rng.random::<f32>().powi(2) * 70.0;
    let depth = 5.0 + rng.random::<f32>() * 10.0;

    let door_height = (FLOOR_HEIGHT * 1.2).min(MAX_DOOR_HEIGHT);
    let door_width = (width * 0.4).min(MAX_DOOR_WIDTH);

    let can_have_ad = height > 20.0 && rng.random::<f32>() > 0.3;
    let has_ad = can_have_ad && rng.random::<f32>() > 0.5;
    let advertisement = has_ad.then(|| {
        let banner_height = height / 3.0;
        AdPlan {
            banner_height,
            center_y: height / 2.0 - banner_height / 2.0,
        }
    });

    let ceiling = match advertisement {
        Some(ad) => height / 2.0 - ad.banner_height,
        None => height / 2.0 - 1.0,
    };
    let windows = plan_windows(width, height, depth, door_height, ceiling, rng);

    let antenna_height = match advertisement {
        Some(_) => None,
        None => plan_antenna(height, rng),
    };

    let tint = [
        rng.random_range(0.6..1.0),
        rng.random_range(0.6..1.0),
        rng.random_range(0.6..1.0),
    ];
    let emits_smoke = rng.random::<f32>() > 0.5;

    BuildingPlan {
        x,
        z,
        width,
        height,
        depth,
        tint,
        door_width,
        door_height,
        advertisement,
        windows,
        antenna_height,
        emits_smoke,
    }
}

/// Scans each facade on a 2-unit lattice between the door zone and `ceiling`,
/// lighting roughly 40% of the slots. Capped per building.
pub fn plan_windows(
    width: f32,
    height: f32,
    depth: f32,
    door_height: f32,
    ceiling: f32,
    rng: &mut impl Rng,
) -> Vec<WindowSlot> {
    let start_y = -height / 2.0 + door_height + 1.0;
    let mut slots = Vec::new();

    for facade in Facade::ALL {
        let span = facade.span(width, depth);
        let mut vertical = start_y;
        while vertical < ceiling {
            let mut horizontal = -span / 2.0 + 1.0;
            while horizontal < span / 2.0 - 1.0 {
                if rng.random::<f32>() > 0.6 {
                    slots.push(WindowSlot {
                        facade,
                        horizontal,
                        vertical,
                        color_index: rng.random_range(0..NEON_COLORS.len()),
                    });
                }
                horizontal += WINDOW_SPACING;
            }
            vertical += WINDOW_SPACING;
        }
    }

    slots.truncate(MAX_WINDOWS_PER_BUILDING);
    slots
}

fn plan_antenna(height: f32, rng: &mut impl Rng) -> Option<f32> {
    if height < 20.0 || rng.random::<f32>() > 0.7 {
        return None;
    }
    Some(2.0 + rng.random::<f32>() * 3.0)
}
