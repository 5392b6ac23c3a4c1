use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Line list from independent segments.
pub fn line_segments(segments: &[[Vec3; 2]]) -> Mesh {
    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(segments.len() * 2);
    let mut indices = Vec::with_capacity(segments.len() * 2);

    for [start, end] in segments {
        indices.push(vertices.len() as u32);
        vertices.push(start.to_array());
        indices.push(vertices.len() as u32);
        vertices.push(end.to_array());
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// The twelve edges of a centred box.
pub fn box_edges(size: Vec3) -> Mesh {
    line_segments(&box_edge_segments(size))
}

pub fn box_edge_segments(size: Vec3) -> Vec<[Vec3; 2]> {
    let h = size / 2.0;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);

    let mut segments = Vec::with_capacity(12);
    for y in [-1.0, 1.0] {
        segments.push([corner(-1.0, y, -1.0), corner(1.0, y, -1.0)]);
        segments.push([corner(1.0, y, -1.0), corner(1.0, y, 1.0)]);
        segments.push([corner(1.0, y, 1.0), corner(-1.0, y, 1.0)]);
        segments.push([corner(-1.0, y, 1.0), corner(-1.0, y, -1.0)]);
    }
    for (x, z) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        segments.push([corner(x, -1.0, z), corner(x, 1.0, z)]);
    }
    segments
}
