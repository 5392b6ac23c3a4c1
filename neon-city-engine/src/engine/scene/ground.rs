use bevy::math::Affine2;
use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::{GROUND_SIZE, PUDDLE_SCATTER_HALF_RANGE};
use constants::palette::{PUDDLE_COLOR, hex_color};

use crate::engine::assets::surface_textures::SurfaceTextures;
use crate::engine::mesh::flat_shapes::{fan_polygon, puddle_outline};

const GROUND_TEXTURE_REPEAT: f32 = 100.0;
const UNTEXTURED_GROUND_COLOR: u32 = 0x333333;

#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct Puddle;

pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    textures: &SurfaceTextures,
    puddle_count: usize,
    rng: &mut impl Rng,
) {
    let ground_material = match &textures.concrete {
        Some(concrete) => StandardMaterial {
            base_color_texture: Some(concrete.clone()),
            normal_map_texture: textures.concrete_normal.clone(),
            uv_transform: Affine2::from_scale(Vec2::splat(GROUND_TEXTURE_REPEAT)),
            perceptual_roughness: 0.9,
            ..default()
        },
        None => StandardMaterial {
            base_color: hex_color(UNTEXTURED_GROUND_COLOR),
            perceptual_roughness: 0.9,
            ..default()
        },
    };

    commands.spawn((
        Name::new("Ground"),
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(ground_material)),
        Transform::IDENTITY,
    ));

    let puddle_material = materials.add(StandardMaterial {
        base_color: hex_color(PUDDLE_COLOR).with_alpha(0.5),
        metallic: 0.1,
        perceptual_roughness: 0.2,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for _ in 0..puddle_count {
        let outline = puddle_outline(rng);
        let x = (rng.random::<f32>() - 0.5) * PUDDLE_SCATTER_HALF_RANGE * 2.0;
        let z = (rng.random::<f32>() - 0.5) * PUDDLE_SCATTER_HALF_RANGE * 2.0;
        commands.spawn((
            Puddle,
            Mesh3d(meshes.add(fan_polygon(&outline))),
            MeshMaterial3d(puddle_material.clone()),
            Transform::from_xyz(x, 0.01, z),
        ));
    }
}
