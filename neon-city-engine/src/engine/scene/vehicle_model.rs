//! Neon hover-car assembly.
//!
//! The car faces +Z. Headlight spotlights and beams are children of the car
//! root so they follow it along its path without extra bookkeeping.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;
use rand::Rng;

use constants::palette::{
    HEADLIGHT_BEAM_LIGHT_COLOR, HEADLIGHT_COLOR, TAILLIGHT_COLOR, VEHICLE_NEON_COLORS, WHEEL_COLOR,
    hex_color, hex_emissive,
};
use constants::render_settings::{EMISSIVE_SCALE, LUMENS_PER_LIGHT_UNIT};

use crate::engine::mesh::beam_cone::open_cone;
use crate::engine::render::light_beam::LightBeamMaterial;
use crate::engine::systems::flicker::FlickerState;

/// Undimmed headlight output in scene light units.
pub const HEADLIGHT_INTENSITY: f32 = 0.8;
const HEADLIGHT_RANGE: f32 = 18.0;
const HEADLIGHT_THROW: f32 = 6.0;
const HEADLIGHT_SPREAD: f32 = 0.3;
const HEADLIGHT_X: f32 = 0.7;
const HEADLIGHT_Z: f32 = 2.25;
const BEAM_RADIUS: f32 = 0.45;
const BEAM_YAW: f32 = PI / 30.0;
const INITIAL_BEAM_INTENSITY: f32 = 0.7;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    /// Centre of the figure-of-eight path.
    pub anchor: Vec3,
    pub phase: f32,
    pub speed: f32,
}

/// Headlight spotlight, linked to the beam cone it drives.
#[derive(Component, Debug, Clone, Copy)]
pub struct Headlight {
    pub beam: Entity,
}

/// Meshes and materials shared by every car.
pub struct VehicleKit {
    bodies: Vec<Handle<StandardMaterial>>,
    headlight: Handle<StandardMaterial>,
    taillight: Handle<StandardMaterial>,
    wheel: Handle<StandardMaterial>,
    body_mesh: Handle<Mesh>,
    bumper_mesh: Handle<Mesh>,
    cabin_mesh: Handle<Mesh>,
    headlight_mesh: Handle<Mesh>,
    taillight_mesh: Handle<Mesh>,
    tail_bar_mesh: Handle<Mesh>,
    wheel_mesh: Handle<Mesh>,
    beam_mesh: Handle<Mesh>,
}

impl VehicleKit {
    pub fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        let bodies = VEHICLE_NEON_COLORS
            .iter()
            .map(|&hex| {
                materials.add(StandardMaterial {
                    base_color: hex_color(hex),
                    metallic: 1.0,
                    perceptual_roughness: 0.1,
                    ..default()
                })
            })
            .collect();

        Self {
            bodies,
            headlight: materials.add(StandardMaterial {
                base_color: hex_color(HEADLIGHT_COLOR),
                emissive: hex_emissive(HEADLIGHT_COLOR, EMISSIVE_SCALE),
                ..default()
            }),
            taillight: materials.add(StandardMaterial {
                base_color: hex_color(TAILLIGHT_COLOR),
                emissive: hex_emissive(TAILLIGHT_COLOR, EMISSIVE_SCALE),
                ..default()
            }),
            wheel: materials.add(StandardMaterial {
                base_color: hex_color(WHEEL_COLOR),
                metallic: 0.5,
                perceptual_roughness: 0.7,
                ..default()
            }),
            body_mesh: meshes.add(Cuboid::new(2.2, 0.8, 4.5)),
            bumper_mesh: meshes.add(Cuboid::new(2.1, 0.3, 0.2)),
            cabin_mesh: meshes.add(Cuboid::new(1.8, 0.5, 2.2)),
            headlight_mesh: meshes.add(Sphere::new(0.18).mesh().uv(16, 12)),
            taillight_mesh: meshes.add(Cuboid::new(0.6, 0.15, 0.05)),
            tail_bar_mesh: meshes.add(Cuboid::new(1.4, 0.08, 0.03)),
            wheel_mesh: meshes.add(Cylinder::new(0.4, 0.2).mesh().resolution(16)),
            beam_mesh: meshes.add(open_cone(BEAM_RADIUS, HEADLIGHT_THROW, 12)),
        }
    }
}

/// Spawns a car at `position` and returns its root entity. The body colour
/// and both flicker schedules come from `rng`.
pub fn spawn_vehicle(
    commands: &mut Commands,
    beam_materials: &mut Assets<LightBeamMaterial>,
    kit: &VehicleKit,
    position: Vec3,
    phase: f32,
    rng: &mut impl Rng,
) -> Entity {
    let body = kit.bodies[rng.random_range(0..kit.bodies.len())].clone();
    let speed = 10.0 + rng.random::<f32>() * 15.0;
    let flickers = [
        FlickerState::new(HEADLIGHT_INTENSITY, rng),
        FlickerState::new(HEADLIGHT_INTENSITY, rng),
    ];

    let mut car = commands.spawn((
        Vehicle {
            anchor: position,
            phase,
            speed,
        },
        Transform::from_translation(position),
        Visibility::default(),
    ));

    car.with_children(|car| {
        car.spawn((
            Mesh3d(kit.body_mesh.clone()),
            MeshMaterial3d(body.clone()),
            Transform::from_xyz(0.0, -0.1, 0.0),
        ));
        car.spawn((
            Mesh3d(kit.bumper_mesh.clone()),
            MeshMaterial3d(body.clone()),
            Transform::from_xyz(0.0, -0.2, 2.2),
        ));
        car.spawn((
            Mesh3d(kit.cabin_mesh.clone()),
            MeshMaterial3d(body),
            Transform::from_xyz(0.0, 0.55, -0.2),
        ));

        for x in [-HEADLIGHT_X, HEADLIGHT_X] {
            car.spawn((
                Mesh3d(kit.taillight_mesh.clone()),
                MeshMaterial3d(kit.taillight.clone()),
                Transform::from_xyz(x, 0.0, -HEADLIGHT_Z),
            ));
        }
        car.spawn((
            Mesh3d(kit.tail_bar_mesh.clone()),
            MeshMaterial3d(kit.taillight.clone()),
            Transform::from_xyz(0.0, 0.0, -HEADLIGHT_Z),
        ));

        for x in [-1.2, 1.2] {
            for z in [-1.5, 1.5] {
                car.spawn((
                    Mesh3d(kit.wheel_mesh.clone()),
                    MeshMaterial3d(kit.wheel.clone()),
                    Transform::from_xyz(x, -0.4, z)
                        .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
                ));
            }
        }

        // Both lamps toe in slightly towards the centre line.
        for (side, flicker) in [-1.0_f32, 1.0].into_iter().zip(flickers) {
            let lamp = Vec3::new(side * HEADLIGHT_X, 0.0, HEADLIGHT_Z);
            car.spawn((
                Mesh3d(kit.headlight_mesh.clone()),
                MeshMaterial3d(kit.headlight.clone()),
                Transform::from_translation(lamp).with_scale(Vec3::new(1.2, 0.8, 1.0)),
            ));

            let beam = car
                .spawn((
                    Mesh3d(kit.beam_mesh.clone()),
                    MeshMaterial3d(beam_materials.add(LightBeamMaterial::new(INITIAL_BEAM_INTENSITY))),
                    Transform::from_translation(lamp)
                        .with_rotation(Quat::from_rotation_y(-side * BEAM_YAW)),
                ))
                .id();

            let target = lamp + Vec3::new(-side * HEADLIGHT_SPREAD, 0.0, HEADLIGHT_THROW);
            car.spawn((
                Headlight { beam },
                SpotLight {
                    color: hex_color(HEADLIGHT_BEAM_LIGHT_COLOR),
                    intensity: flicker.current * LUMENS_PER_LIGHT_UNIT,
                    range: HEADLIGHT_RANGE,
                    outer_angle: PI / 7.0,
                    inner_angle: PI / 7.0 * 0.6,
                    shadows_enabled: false,
                    ..default()
                },
                flicker,
                Transform::from_translation(lamp).looking_at(target, Vec3::Y),
            ));
        }
    });

    car.id()
}
