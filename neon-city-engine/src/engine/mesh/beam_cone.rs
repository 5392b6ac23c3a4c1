use std::f32::consts::TAU;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Open cone with its apex at the origin, widening along +Z to `radius` at
/// `length`. UV `v` runs from 1 at the apex to 0 at the mouth so a fragment
/// shader can fade both ends of the beam.
pub fn open_cone(radius: f32, length: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices = Vec::new();

    for s in 0..=segments {
        let u = s as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = Vec3::new(cos, sin, -radius / length).normalize();

        positions.push([0.0, 0.0, 0.0]);
        normals.push(normal.to_array());
        uvs.push([u, 1.0]);

        positions.push([cos * radius, sin * radius, length]);
        normals.push(normal.to_array());
        uvs.push([u, 0.0]);
    }

    for s in 0..segments {
        let apex = s * 2;
        let mouth = apex + 1;
        let next_apex = apex + 2;
        let next_mouth = apex + 3;
        indices.extend_from_slice(&[apex, next_mouth, mouth, apex, next_apex, next_mouth]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
