//! Falling rain, drawn as one dynamic line-list mesh of short streaks.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use rand::Rng;

use constants::city_layout::{RAIN_CEILING, RAIN_HALF_RANGE};
use constants::day_night::REFERENCE_FPS;
use constants::render_settings::RAIN_STREAK_LENGTH;

/// Units a drop falls per reference frame.
const FALL_PER_FRAME: f32 = 2.0;

#[derive(Component, Debug, Clone, Default)]
pub struct RainField {
    pub drops: Vec<Vec3>,
}

impl RainField {
    pub fn scatter(count: usize, rng: &mut impl Rng) -> Self {
        let drops = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.random::<f32>() - 0.5) * RAIN_HALF_RANGE * 2.0,
                    rng.random::<f32>() * RAIN_CEILING,
                    (rng.random::<f32>() - 0.5) * RAIN_HALF_RANGE * 2.0,
                )
            })
            .collect();
        Self { drops }
    }

    /// Drops every particle and respawns those that hit the ground at the ceiling.
    pub fn fall(&mut self, distance: f32) {
        for drop in &mut self.drops {
            drop.y -= distance;
            if drop.y < 0.0 {
                drop.y = RAIN_CEILING;
            }
        }
    }

    pub fn streak_vertices(&self) -> Vec<[f32; 3]> {
        self.drops
            .iter()
            .flat_map(|d| [d.to_array(), [d.x, d.y + RAIN_STREAK_LENGTH, d.z]])
            .collect()
    }

    fn mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.streak_vertices());
        mesh
    }
}

pub fn spawn_rain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    count: usize,
    rng: &mut impl Rng,
) {
    let field = RainField::scatter(count, rng);
    let mesh = meshes.add(field.mesh());
    commands.spawn((
        Name::new("Rain"),
        field,
        Mesh3d(mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.8, 0.8, 1.0, 0.6),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::IDENTITY,
        NoFrustumCulling,
    ));
}

pub fn rain_system(
    time: Res<Time>,
    mut fields: Query<(&mut RainField, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let distance = FALL_PER_FRAME * time.delta_secs() * REFERENCE_FPS;
    for (mut field, mesh) in &mut fields {
        field.fall(distance);
        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, field.streak_vertices());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::random::CityRng;
    use bevy::render::mesh::VertexAttributeValues;
    use std::time::Duration;

    fn positions(app: &App, mesh: &Handle<Mesh>) -> Vec<[f32; 3]> {
        let mesh = app.world().resource::<Assets<Mesh>>().get(mesh).unwrap();
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => values.clone(),
            other => panic!("unexpected position attribute: {other:?}"),
        }
    }

    #[test]
    fn drops_start_inside_the_volume() {
        let field = RainField::scatter(500, &mut CityRng::from_seed(1).0);
        assert_eq!(field.drops.len(), 500);
        for d in &field.drops {
            assert!(d.x.abs() <= 100.0 && d.z.abs() <= 100.0);
            assert!((0.0..200.0).contains(&d.y));
        }
    }

    #[test]
    fn drops_wrap_to_the_ceiling() {
        let mut field = RainField {
            drops: vec![Vec3::new(1.0, 1.5, 2.0), Vec3::new(0.0, 50.0, 0.0)],
        };
        field.fall(2.0);
        assert_eq!(field.drops[0], Vec3::new(1.0, 200.0, 2.0));
        assert_eq!(field.drops[1].y, 48.0);
    }

    #[test]
    fn each_drop_is_one_vertical_streak() {
        let field = RainField {
            drops: vec![Vec3::new(3.0, 10.0, -4.0)],
        };
        let vertices = field.streak_vertices();
        assert_eq!(vertices, vec![[3.0, 10.0, -4.0], [3.0, 10.6, -4.0]]);
    }

    #[test]
    fn system_rewrites_the_streak_mesh_each_frame() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<Assets<Mesh>>()
            .add_systems(Update, rain_system);

        let mut field = RainField::scatter(200, &mut CityRng::from_seed(5).0);
        field.drops[0] = Vec3::new(10.0, 1.0, -10.0);
        let mesh = app.world_mut().resource_mut::<Assets<Mesh>>().add(field.mesh());
        app.world_mut().spawn((field, Mesh3d(mesh.clone())));
        let before = positions(&app, &mesh);

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(1.0 / 60.0));
        app.update();

        let after = positions(&app, &mesh);
        assert_eq!(after.len(), 400);
        assert_ne!(before, after);
        // the low drop hit the ground and restarted at the ceiling
        assert!((after[0][1] - RAIN_CEILING).abs() < 1e-4);
        for [x, y, z] in after {
            assert!(x.abs() <= RAIN_HALF_RANGE && z.abs() <= RAIN_HALF_RANGE);
            assert!((0.0..=RAIN_CEILING + RAIN_STREAK_LENGTH).contains(&y));
        }
    }
}
