//! Free-roam player cube: camera-relative walking, gravity and collision.

use bevy::prelude::*;

use constants::city_layout::GROUND_SIZE;
use constants::day_night::REFERENCE_FPS;
use constants::palette::{PLAYER_COLOR, hex_color};

use crate::engine::camera::follow_camera::FollowCamera;
use crate::engine::scene::placement::CityFootprints;

/// Walking speed in world units per reference frame.
pub const WALK_SPEED: f32 = 0.1;
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 0.5, 0.0);

const VELOCITY_SMOOTHING: f32 = 0.3;
const GRAVITY: f32 = -0.007;
const COLLISION_MARGIN: f32 = 0.5;
const HALF_HEIGHT: f32 = 0.5;

#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct Player {
    /// Per reference frame.
    pub velocity: Vec3,
    pub inside_car: bool,
}

impl Player {
    /// Eases the horizontal velocity towards `target`.
    pub fn steer(&mut self, target: Vec3, frames: f32) {
        let blend = 1.0 - (1.0 - VELOCITY_SMOOTHING).powf(frames);
        self.velocity.x += (target.x - self.velocity.x) * blend;
        self.velocity.z += (target.z - self.velocity.z) * blend;
    }

    /// Moves from `position` and returns where the player ends up.
    ///
    /// A horizontal step into a building is undone. Falling stops on the
    /// ground plane; a step that leaves the plane is undone entirely.
    pub fn step(&mut self, position: Vec3, frames: f32, footprints: &CityFootprints) -> Vec3 {
        let mut next = position;
        next.x += self.velocity.x * frames;
        next.z += self.velocity.z * frames;
        if footprints.blocks_movement(next.x, next.z, COLLISION_MARGIN) {
            next.x = position.x;
            next.z = position.z;
        }

        let gravity = GRAVITY * frames;
        self.velocity.y += gravity;
        next.y += self.velocity.y * frames;

        if !on_ground_plane(next.x, next.z) {
            self.velocity.y -= gravity;
            return position;
        }
        if next.y - HALF_HEIGHT < 0.0 {
            next.y = HALF_HEIGHT;
            self.velocity.y = 0.0;
        }
        next
    }
}

fn on_ground_plane(x: f32, z: f32) -> bool {
    let half = GROUND_SIZE / 2.0;
    x.abs() <= half && z.abs() <= half
}

/// WASD intent: `x` strafes along camera right, `y` moves along camera forward.
pub fn walk_input(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.y -= WALK_SPEED;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.y += WALK_SPEED;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= WALK_SPEED;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += WALK_SPEED;
    }
    input
}

pub fn target_velocity(rig: &FollowCamera, input: Vec2) -> Vec3 {
    let (forward, right) = rig.basis();
    forward * input.y + right * input.x
}

pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player::default(),
            Mesh3d(meshes.add(Cuboid::from_length(1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: hex_color(PLAYER_COLOR),
                ..default()
            })),
            Transform::from_translation(PLAYER_SPAWN),
            Visibility::Visible,
        ))
        .id()
}

pub fn player_movement_system(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    footprints: Res<CityFootprints>,
    cameras: Query<&FollowCamera>,
    mut players: Query<(&mut Player, &mut Transform)>,
) {
    let Ok(rig) = cameras.single() else {
        return;
    };
    let frames = time.delta_secs() * REFERENCE_FPS;
    let target = target_velocity(rig, walk_input(&keyboard));

    for (mut player, mut transform) in &mut players {
        if player.inside_car {
            continue;
        }
        transform.rotation = Quat::from_rotation_y(rig.yaw);
        player.steer(target, frames);
        transform.translation = player.step(transform.translation, frames, &footprints);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::placement::BuildingFootprint;
    use std::time::Duration;

    #[test]
    fn w_walks_away_from_the_camera() {
        let rig = FollowCamera::default();
        let v = target_velocity(&rig, Vec2::new(0.0, -WALK_SPEED));
        assert!((v - Vec3::new(0.0, 0.0, -0.1)).length() < 1e-6);
        let strafe = target_velocity(&rig, Vec2::new(WALK_SPEED, 0.0));
        assert!((strafe - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn steering_eases_by_thirty_percent_per_frame() {
        let mut player = Player::default();
        player.steer(Vec3::new(1.0, 0.0, -1.0), 1.0);
        assert!((player.velocity.x - 0.3).abs() < 1e-6);
        assert!((player.velocity.z + 0.3).abs() < 1e-6);
        player.steer(Vec3::new(1.0, 0.0, -1.0), 2.0);
        assert!((player.velocity.x - 0.3 - 0.7 * 0.51).abs() < 1e-5);
    }

    #[test]
    fn buildings_block_horizontal_steps() {
        let footprints = CityFootprints(vec![BuildingFootprint::new(2.0, 0.0, 2.0, 30.0, 2.0)]);
        let mut player = Player {
            velocity: Vec3::new(0.6, 0.0, 0.0),
            inside_car: false,
        };
        let next = player.step(Vec3::new(0.0, 0.5, 0.0), 1.0, &footprints);
        assert_eq!(next.x, 0.0);
        assert_eq!(next.y, 0.5);
    }

    #[test]
    fn gravity_pulls_down_until_the_ground() {
        let footprints = CityFootprints::default();
        let mut player = Player::default();
        let mut position = Vec3::new(0.0, 3.0, 0.0);
        position = player.step(position, 1.0, &footprints);
        assert!((position.y - (3.0 - 0.007)).abs() < 1e-6);
        for _ in 0..200 {
            position = player.step(position, 1.0, &footprints);
        }
        assert_eq!(position.y, 0.5);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn walking_off_the_world_edge_is_undone() {
        let footprints = CityFootprints::default();
        let mut player = Player {
            velocity: Vec3::new(0.5, 0.0, 0.0),
            inside_car: false,
        };
        let start = Vec3::new(249.8, 0.5, 0.0);
        assert_eq!(player.step(start, 1.0, &footprints), start);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn system_walks_and_stays_put_inside_a_car() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<CityFootprints>()
            .add_systems(Update, player_movement_system);
        app.world_mut().spawn(FollowCamera::default());
        let walker = app
            .world_mut()
            .spawn((Player::default(), Transform::from_translation(PLAYER_SPAWN)))
            .id();
        let driver = app
            .world_mut()
            .spawn((
                Player {
                    velocity: Vec3::ZERO,
                    inside_car: true,
                },
                Transform::from_xyz(3.0, 0.77, 3.0),
            ))
            .id();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        for _ in 0..10 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(1.0 / 60.0));
            app.update();
        }

        let walked = app.world().get::<Transform>(walker).unwrap().translation;
        assert!(walked.z < -0.3);
        assert_eq!(walked.y, 0.5);
        let parked = app.world().get::<Transform>(driver).unwrap().translation;
        assert_eq!(parked, Vec3::new(3.0, 0.77, 3.0));
    }

    #[test]
    fn a_seated_player_neither_turns_nor_gathers_speed() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<CityFootprints>()
            .add_systems(Update, player_movement_system);
        app.world_mut().spawn(FollowCamera {
            yaw: 0.5,
            ..default()
        });
        let driver = app
            .world_mut()
            .spawn((
                Player {
                    velocity: Vec3::ZERO,
                    inside_car: true,
                },
                Transform::from_xyz(3.0, 0.77, 3.0),
            ))
            .id();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(1.0 / 60.0));
        app.update();

        assert_eq!(app.world().get::<Player>(driver).unwrap().velocity, Vec3::ZERO);
        assert_eq!(app.world().get::<Transform>(driver).unwrap().rotation, Quat::IDENTITY);
    }
}
