use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use constants::day_night::{DAY_AMBIENT, HIDDEN_BODY_Y};
use constants::palette::{
    AMBIENT_LIGHT_COLOR, MOON_COLOR, MOON_EMISSIVE_COLOR, MOON_LIGHT_COLOR, NIGHT_SKY_COLOR,
    SUN_COLOR, SUN_LIGHT_COLOR, hex_color, hex_emissive,
};
use constants::render_settings::{AMBIENT_BRIGHTNESS_PER_UNIT, EMISSIVE_SCALE};

/// A sky body carrying both its visible sphere and its directional light.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelestialBody {
    Sun,
    Moon,
}

/// Ambient light, sky colour, sun and moon. The day/night system moves the
/// bodies and sets every intensity from the first frame on.
pub fn spawn_lighting(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.insert_resource(AmbientLight {
        color: hex_color(AMBIENT_LIGHT_COLOR),
        brightness: DAY_AMBIENT * AMBIENT_BRIGHTNESS_PER_UNIT,
        ..default()
    });
    commands.insert_resource(ClearColor(hex_color(NIGHT_SKY_COLOR)));

    commands.spawn((
        Name::new("Sun"),
        CelestialBody::Sun,
        Mesh3d(meshes.add(Sphere::new(10.0).mesh().uv(16, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(SUN_COLOR),
            emissive: hex_emissive(SUN_COLOR, 0.4 * EMISSIVE_SCALE),
            ..default()
        })),
        DirectionalLight {
            color: hex_color(SUN_LIGHT_COLOR),
            illuminance: 0.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, HIDDEN_BODY_Y, 0.0),
        NotShadowCaster,
    ));

    commands.spawn((
        Name::new("Moon"),
        CelestialBody::Moon,
        Mesh3d(meshes.add(Sphere::new(8.0).mesh().uv(16, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(MOON_COLOR),
            emissive: hex_emissive(MOON_EMISSIVE_COLOR, 0.2 * EMISSIVE_SCALE),
            ..default()
        })),
        DirectionalLight {
            color: hex_color(MOON_LIGHT_COLOR),
            illuminance: 0.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, HIDDEN_BODY_Y, 0.0),
        NotShadowCaster,
    ));
}
