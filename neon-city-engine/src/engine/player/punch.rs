//! Punch spray: a cone of short-lived grey specks thrown from the player.
//!
//! Every live speck of every punch shares one dynamic mesh of camera-facing
//! quads. Fade is carried in the vertex alpha.

use std::f32::consts::{PI, TAU};

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use rand::Rng;

use constants::day_night::REFERENCE_FPS;
use constants::palette::{PUNCH_PARTICLE_COLOR, hex_color};

use crate::engine::camera::follow_camera::FollowCamera;
use crate::engine::core::random::CityRng;
use crate::engine::player::controller::Player;

pub const PARTICLES_PER_PUNCH: usize = 250;

const CONE_ANGLE: f32 = PI / 12.0;
const MIN_THETA: f32 = 1e-4;
const MAX_SPEED: f32 = 2.0;
const SHRINK_PER_FRAME: f32 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct PunchParticle {
    pub position: Vec3,
    /// Per reference frame.
    pub velocity: Vec3,
    /// Seconds left.
    pub lifetime: f32,
    pub size: f32,
}

impl PunchParticle {
    /// Specks near the cone axis fly fast and die young; specks at the rim
    /// drift slowly and linger.
    pub fn spawn(origin: Vec3, direction: Vec3, rng: &mut impl Rng) -> Self {
        let theta = (rng.random::<f32>() * CONE_ANGLE).max(MIN_THETA);
        let phi = rng.random::<f32>() * TAU;
        let local = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
        let axis = direction.normalize_or(Vec3::NEG_Z);
        let heading = Quat::from_rotation_arc(Vec3::Y, axis) * local;

        let speed = (rng.random_range(0.001..0.2) * (CONE_ANGLE / theta)).min(MAX_SPEED);
        let lifetime = rng.random_range(0.1..0.5) * (theta / CONE_ANGLE);

        Self {
            position: origin,
            velocity: heading * speed,
            lifetime,
            size: 0.2 + rng.random::<f32>() * 0.6,
        }
    }

    /// Advances by `delta_secs`; false once the speck has expired.
    pub fn update(&mut self, delta_secs: f32) -> bool {
        let frames = delta_secs * REFERENCE_FPS;
        self.position += self.velocity * frames;
        self.lifetime -= delta_secs;
        self.size *= SHRINK_PER_FRAME.powf(frames);
        self.lifetime > 0.0
    }

    pub fn opacity(&self) -> f32 {
        self.lifetime.clamp(0.0, 1.0)
    }
}

#[derive(Component, Debug, Default)]
pub struct PunchSpray {
    pub particles: Vec<PunchParticle>,
}

impl PunchSpray {
    pub fn punch(&mut self, origin: Vec3, direction: Vec3, rng: &mut impl Rng) {
        self.particles
            .extend((0..PARTICLES_PER_PUNCH).map(|_| PunchParticle::spawn(origin, direction, rng)));
    }

    pub fn update(&mut self, delta_secs: f32) {
        self.particles.retain_mut(|p| p.update(delta_secs));
    }

    /// Quad corners, vertex colours and indices, billboarded on `right`/`up`.
    pub fn quads(&self, right: Vec3, up: Vec3) -> (Vec<[f32; 3]>, Vec<[f32; 4]>, Vec<u32>) {
        let mut positions = Vec::with_capacity(self.particles.len() * 4);
        let mut colors = Vec::with_capacity(self.particles.len() * 4);
        let mut indices = Vec::with_capacity(self.particles.len() * 6);

        for (i, p) in self.particles.iter().enumerate() {
            let r = right * p.size * 0.5;
            let u = up * p.size * 0.5;
            for corner in [p.position - r - u, p.position + r - u, p.position + r + u, p.position - r + u] {
                positions.push(corner.to_array());
                colors.push([1.0, 1.0, 1.0, p.opacity()]);
            }
            let base = i as u32 * 4;
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        (positions, colors, indices)
    }
}

fn spray_mesh(positions: Vec<[f32; 3]>, colors: Vec<[f32; 4]>, indices: Vec<u32>) -> Mesh {
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn spawn_punch_spray(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    // A single transparent degenerate quad until the first punch.
    let placeholder = spray_mesh(vec![[0.0; 3]; 4], vec![[1.0, 1.0, 1.0, 0.0]; 4], vec![0, 1, 2, 0, 2, 3]);
    commands
        .spawn((
            Name::new("Punch Spray"),
            PunchSpray::default(),
            Mesh3d(meshes.add(placeholder)),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: hex_color(PUNCH_PARTICLE_COLOR),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::IDENTITY,
            Visibility::Hidden,
            NoFrustumCulling,
        ))
        .id()
}

/// Left click throws a punch away from the camera.
pub fn punch_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut rng: ResMut<CityRng>,
    players: Query<&Transform, With<Player>>,
    cameras: Query<&FollowCamera>,
    mut sprays: Query<&mut PunchSpray>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let (Ok(player), Ok(rig), Ok(mut spray)) = (players.single(), cameras.single(), sprays.single_mut()) else {
        return;
    };
    let (forward, _) = rig.basis();
    spray.punch(player.translation, -forward, &mut rng.0);
}

pub fn punch_particle_system(
    time: Res<Time>,
    cameras: Query<&Transform, With<FollowCamera>>,
    mut sprays: Query<(&mut PunchSpray, &Mesh3d, &mut Visibility)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let right = *camera.right();
    let up = *camera.up();

    for (mut spray, mesh, mut visibility) in &mut sprays {
        if spray.particles.is_empty() {
            continue;
        }
        spray.update(time.delta_secs());
        if spray.particles.is_empty() {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Visible;
        let (positions, colors, indices) = spray.quads(right, up);
        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            *mesh = spray_mesh(positions, colors, indices);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specks_leave_inside_the_cone() {
        let mut rng = CityRng::from_seed(21).0;
        let direction = Vec3::new(0.0, 0.0, -1.0);
        for _ in 0..500 {
            let p = PunchParticle::spawn(Vec3::ZERO, direction, &mut rng);
            let heading = p.velocity.normalize();
            assert!(heading.angle_between(direction) <= CONE_ANGLE + 1e-3);
            assert!(p.velocity.length() <= MAX_SPEED + 1e-5);
            assert!(p.lifetime >= 0.0 && p.lifetime < 0.5);
            assert!((0.2..0.8).contains(&p.size));
        }
    }

    #[test]
    fn specks_shrink_fade_and_expire() {
        let mut p = PunchParticle {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.1, 0.0, 0.0),
            lifetime: 0.1,
            size: 1.0,
        };
        assert!(p.update(1.0 / 60.0));
        assert!((p.position.x - 0.1).abs() < 1e-5);
        assert!((p.size - 0.95).abs() < 1e-5);
        assert!((p.opacity() - (0.1 - 1.0 / 60.0)).abs() < 1e-5);
        assert!(!p.update(0.2));
        assert_eq!(p.opacity(), 0.0);
    }

    #[test]
    fn a_punch_adds_a_full_burst_and_the_spray_drains() {
        let mut rng = CityRng::from_seed(4).0;
        let mut spray = PunchSpray::default();
        spray.punch(Vec3::new(0.0, 0.5, 0.0), Vec3::X, &mut rng);
        assert_eq!(spray.particles.len(), PARTICLES_PER_PUNCH);

        let (positions, colors, indices) = spray.quads(Vec3::X, Vec3::Y);
        assert_eq!(positions.len(), PARTICLES_PER_PUNCH * 4);
        assert_eq!(colors.len(), positions.len());
        assert_eq!(indices.len(), PARTICLES_PER_PUNCH * 6);

        spray.update(0.6);
        assert!(spray.particles.is_empty());
    }

    #[test]
    fn click_spawns_a_burst() {
        let mut app = App::new();
        app.insert_resource(CityRng::from_seed(2))
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(Update, punch_input_system);
        app.world_mut().spawn((Player::default(), Transform::from_xyz(1.0, 0.5, 2.0)));
        app.world_mut().spawn(FollowCamera::default());
        let spray = app.world_mut().spawn(PunchSpray::default()).id();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();

        let spray = app.world().get::<PunchSpray>(spray).unwrap();
        assert_eq!(spray.particles.len(), PARTICLES_PER_PUNCH);
        assert!(spray.particles.iter().all(|p| p.velocity.z <= 0.0));
    }
}
