//! Floating neon cubes that come alive after dusk.

use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::PROP_SCATTER_HALF_RANGE;
use constants::day_night::{NIGHT_PROPS_THRESHOLD, REFERENCE_FPS};
use constants::palette::{NEON_COLORS, hex_color, hue_cycle, neon_hue, scaled_emissive};
use constants::render_settings::{EMISSIVE_SCALE, LUMENS_PER_LIGHT_UNIT};

use crate::engine::scene::placement::{BuildingFootprint, sample_open_position};
use crate::engine::systems::day_night::NightAlpha;

const GLOW_INTENSITY: f32 = 2.0;
const GLOW_RANGE: f32 = 8.0;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct DecorativeCube {
    pub rest_height: f32,
    pub original_color: Color,
    pub float_speed: f32,
    pub float_amplitude: f32,
    /// Radians per reference frame.
    pub rotation_speed: f32,
    pub color_change_speed: f32,
    /// Accumulated x/y rotation.
    pub spin: Vec2,
    pub color: Color,
    pub glow: f32,
}

impl DecorativeCube {
    pub fn new(rest_height: f32, original_color: Color, rng: &mut impl Rng) -> Self {
        Self {
            rest_height,
            original_color,
            float_speed: 0.3 + rng.random::<f32>() * 0.7,
            float_amplitude: 0.5 + rng.random::<f32>() * 1.5,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.02,
            color_change_speed: 0.1 + rng.random::<f32>() * 0.3,
            spin: Vec2::ZERO,
            color: original_color,
            glow: 0.0,
        }
    }

    /// Advances the cube and returns its height. By day it rests at its
    /// original colour with the glow off.
    pub fn animate(&mut self, elapsed: f32, frames: f32, night: f32) -> f32 {
        if night < NIGHT_PROPS_THRESHOLD {
            self.color = self.original_color;
            self.glow = 0.0;
            return self.rest_height;
        }

        self.spin.x += self.rotation_speed * frames;
        self.spin.y += self.rotation_speed * 1.3 * frames;
        self.color = neon_hue(hue_cycle(elapsed * self.color_change_speed));
        self.glow = GLOW_INTENSITY * night;
        self.rest_height + (elapsed * self.float_speed).sin() * self.float_amplitude
    }
}

/// Point light riding inside a cube.
#[derive(Component)]
pub struct CubeGlow;

/// Places up to `count` cubes clear of buildings and returns how many landed.
pub fn spawn_decorative_cubes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    footprints: &[BuildingFootprint],
    count: usize,
    rng: &mut impl Rng,
) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        let size = 0.8 + rng.random::<f32>() * 1.5;
        let hex = NEON_COLORS[rng.random_range(0..NEON_COLORS.len())];
        let Some(spot) = sample_open_position(rng, PROP_SCATTER_HALF_RANGE, footprints) else {
            warn!("No open ground left for a decorative cube, skipping it");
            continue;
        };
        let rest_height = 3.0 + rng.random::<f32>() * 4.0;
        let color = hex_color(hex);

        commands
            .spawn((
                DecorativeCube::new(rest_height, color, rng),
                Mesh3d(meshes.add(Cuboid::from_length(size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    emissive: scaled_emissive(color, EMISSIVE_SCALE),
                    perceptual_roughness: 0.3,
                    metallic: 0.7,
                    ..default()
                })),
                Transform::from_xyz(spot.x, rest_height, spot.y),
            ))
            .with_children(|cube| {
                cube.spawn((
                    CubeGlow,
                    PointLight {
                        color,
                        intensity: 0.0,
                        range: GLOW_RANGE,
                        ..default()
                    },
                ));
            });
        placed += 1;
    }
    placed
}

pub fn decorative_cube_system(
    time: Res<Time>,
    night: Res<NightAlpha>,
    mut cubes: Query<(
        &mut DecorativeCube,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut glows: Query<(&ChildOf, &mut PointLight), With<CubeGlow>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let elapsed = time.elapsed_secs();
    let frames = time.delta_secs() * REFERENCE_FPS;

    for (mut cube, mut transform, material) in &mut cubes {
        transform.translation.y = cube.animate(elapsed, frames, night.0);
        transform.rotation = Quat::from_euler(EulerRot::XYZ, cube.spin.x, cube.spin.y, 0.0);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = cube.color;
            material.emissive = scaled_emissive(cube.color, EMISSIVE_SCALE);
        }
    }

    for (child_of, mut light) in &mut glows {
        if let Ok((cube, _, _)) = cubes.get(child_of.parent()) {
            light.color = cube.color;
            light.intensity = cube.glow * LUMENS_PER_LIGHT_UNIT;
        }
    }
}
