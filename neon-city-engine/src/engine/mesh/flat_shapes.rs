use std::f32::consts::TAU;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use rand::Rng;

/// Irregular puddle outline in the XZ plane around the origin.
///
/// The first vertex keeps the base radius; the rest wobble by up to ±0.75.
pub fn puddle_outline(rng: &mut impl Rng) -> Vec<Vec2> {
    let point_count = 8 + rng.random_range(0..5);
    let base_radius = 2.0 + rng.random::<f32>() * 9.0;
    let step = TAU / point_count as f32;

    (0..point_count)
        .map(|p| {
            let radius = if p == 0 {
                base_radius
            } else {
                base_radius + (rng.random::<f32>() - 0.5) * 1.5
            };
            let (sin, cos) = (p as f32 * step).sin_cos();
            Vec2::new(cos * radius, -sin * radius)
        })
        .collect()
}

/// Triangle fan over a star-shaped outline, facing +Y. Outline points are
/// `(x, z)` pairs ordered counter-clockwise when seen from above.
pub fn fan_polygon(outline: &[Vec2]) -> Mesh {
    let mut positions: Vec<[f32; 3]> = vec![[0.0, 0.0, 0.0]];
    positions.extend(outline.iter().map(|p| [p.x, 0.0, p.y]));
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [p[0] * 0.1 + 0.5, p[2] * 0.1 + 0.5])
        .collect();

    let n = outline.len() as u32;
    let mut indices = Vec::with_capacity(outline.len() * 3);
    for k in 0..n {
        indices.extend_from_slice(&[0, k + 1, (k + 1) % n + 1]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Downward-pointing marker triangle in the XY plane.
pub fn pointer_triangle() -> Mesh {
    let positions: Vec<[f32; 3]> = vec![[0.5, 0.5, 0.0], [-0.5, 0.5, 0.0], [0.0, -0.5, 0.0]];
    let normals = vec![[0.0, 0.0, 1.0]; 3];

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(vec![0, 1, 2]));
    mesh
}
