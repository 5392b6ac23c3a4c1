//! Roof-top smoke puffs that drift up and loop back to their chimney.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use rand::Rng;

use constants::day_night::REFERENCE_FPS;

use crate::engine::core::random::CityRng;

/// Height a puff climbs above its emitter before starting over.
pub const SMOKE_LOOP_HEIGHT: f32 = 50.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SmokePuff {
    pub base_y: f32,
    /// Units per reference frame.
    pub rise_speed: f32,
}

impl SmokePuff {
    /// Next height for a puff currently at `y`.
    pub fn rise(&self, y: f32, frames: f32) -> f32 {
        let y = y + self.rise_speed * frames;
        if y - self.base_y > SMOKE_LOOP_HEIGHT {
            self.base_y
        } else {
            y
        }
    }
}

pub fn spawn_smoke(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    top: Vec3,
    rng: &mut impl Rng,
) {
    commands.spawn((
        SmokePuff {
            base_y: top.y,
            rise_speed: 0.01 + rng.random::<f32>() * 0.01,
        },
        Mesh3d(meshes.add(Rectangle::new(2.0, 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.45),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::from_translation(top).with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    ));
}

pub fn smoke_system(
    time: Res<Time>,
    mut rng: ResMut<CityRng>,
    mut puffs: Query<(&SmokePuff, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let frames = time.delta_secs() * REFERENCE_FPS;
    for (puff, mut transform, material) in &mut puffs {
        transform.translation.y = puff.rise(transform.translation.y, frames);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(0.2 + rng.0.random::<f32>() * 0.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn puff_rises_then_loops_relative_to_its_emitter() {
        let puff = SmokePuff {
            base_y: 80.0,
            rise_speed: 0.02,
        };
        assert!((puff.rise(80.0, 1.0) - 80.02).abs() < 1e-5);
        assert_eq!(puff.rise(130.0, 1.0), 80.0);
        // a tall building's smoke never drops below its roof
        let mut y = 80.0;
        for _ in 0..10_000 {
            y = puff.rise(y, 1.0);
            assert!(y >= 80.0);
        }
    }

    #[test]
    fn system_lifts_puffs_and_rerolls_their_opacity() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(CityRng::from_seed(9))
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, smoke_system);

        let material = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let puff = app
            .world_mut()
            .spawn((
                SmokePuff {
                    base_y: 40.0,
                    rise_speed: 0.015,
                },
                Transform::from_xyz(5.0, 40.0, -5.0),
                MeshMaterial3d(material.clone()),
            ))
            .id();

        let mut alphas = Vec::new();
        for _ in 0..4 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(1.0 / 60.0));
            app.update();
            let alpha = app
                .world()
                .resource::<Assets<StandardMaterial>>()
                .get(&material)
                .unwrap()
                .base_color
                .alpha();
            assert!((0.2..0.3).contains(&alpha));
            alphas.push(alpha);
        }

        let y = app.world().get::<Transform>(puff).unwrap().translation.y;
        assert!((y - 40.06).abs() < 1e-3);
        assert!(alphas.windows(2).any(|w| w[0] != w[1]));
    }
}
