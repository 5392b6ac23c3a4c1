use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
    window::{CursorGrabMode, PrimaryWindow},
};

use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

use crate::constants::render_settings::neon_bloom;
use crate::engine::assets::city_config::CityConfig;
use crate::engine::player::controller::Player;

const LOOK_SENSITIVITY: f32 = 0.003;
const PITCH_LIMIT: f32 = 1.0;
const ZOOM_PER_PIXEL: f32 = 0.01;
const ZOOM_PER_LINE: f32 = 1.0;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 50.0;
const MIN_EYE_HEIGHT: f32 = 0.2;

/// Third-person orbit around the player.
///
/// `yaw` and `pitch` place the camera on a sphere of radius `distance`
/// centred on the player; the horizontal forward axis derived from `yaw`
/// also steers walking and punching.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FollowCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl FollowCamera {
    pub fn look(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * LOOK_SENSITIVITY;
        self.pitch = (self.pitch + mouse_delta.y * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive amounts pull the camera back.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance + amount).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Horizontal forward and right axes. Forward points from the player
    /// towards the camera.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        let right = Vec3::Y.cross(forward).normalize();
        (forward, right)
    }

    pub fn eye(&self, target: Vec3) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        let mut eye = target + offset;
        eye.y = eye.y.max(MIN_EYE_HEIGHT);
        eye
    }

    pub fn transform(&self, target: Vec3) -> Transform {
        let (forward, _) = self.basis();
        Transform::from_translation(self.eye(target)).looking_at(target + forward, Vec3::Y)
    }
}

/// Wheel travel converted to camera distance. Scrolling down moves away.
pub fn scroll_to_zoom(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * ZOOM_PER_LINE,
        MouseScrollUnit::Pixel => -y * ZOOM_PER_PIXEL,
    }
}

pub fn spawn_follow_camera(commands: &mut Commands, config: &CityConfig, target: Vec3) -> Entity {
    let rig = FollowCamera::default();
    commands
        .spawn((
            Name::new("Follow Camera"),
            Camera3d::default(),
            Camera {
                hdr: true,
                ..default()
            },
            Tonemapping::TonyMcMapface,
            neon_bloom(config.bloom_intensity, config.bloom_threshold),
            Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                ..default()
            }),
            rig.transform(target),
            rig,
        ))
        .id()
}

/// Click grabs the cursor, Escape gives it back.
pub fn cursor_grab_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left)
        && window.cursor_options.grab_mode == CursorGrabMode::None
    {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

pub fn follow_camera_system(
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    players: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<(&mut FollowCamera, &mut Transform)>,
) {
    let Ok((mut rig, mut camera_transform)) = cameras.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let locked = windows
        .single()
        .is_ok_and(|w| w.cursor_options.grab_mode != CursorGrabMode::None);
    if locked && mouse_delta != Vec2::ZERO {
        rig.look(mouse_delta);
    }

    let zoom: f32 = scroll_events.read().map(|ev| scroll_to_zoom(ev.unit, ev.y)).sum();
    if zoom != 0.0 {
        rig.zoom(zoom);
    }

    if let Ok(player) = players.single() {
        *camera_transform = rig.transform(player.translation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_rig_sits_behind_the_player() {
        let rig = FollowCamera::default();
        assert!(approx(rig.eye(Vec3::ZERO), Vec3::new(0.0, 0.2, 10.0)));
        let (forward, right) = rig.basis();
        assert!(approx(forward, Vec3::Z));
        assert!(approx(right, Vec3::X));
    }

    #[test]
    fn pitch_is_clamped_and_yaw_follows_the_mouse() {
        let mut rig = FollowCamera::default();
        rig.look(Vec2::new(100.0, 1000.0));
        assert!((rig.yaw + 0.3).abs() < 1e-6);
        assert_eq!(rig.pitch, 1.0);
        rig.look(Vec2::new(0.0, -5000.0));
        assert_eq!(rig.pitch, -1.0);
    }

    #[test]
    fn eye_never_drops_below_the_floor() {
        let rig = FollowCamera {
            pitch: -1.0,
            ..default()
        };
        assert_eq!(rig.eye(Vec3::new(0.0, 0.5, 0.0)).y, 0.2);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut rig = FollowCamera::default();
        rig.zoom(scroll_to_zoom(MouseScrollUnit::Pixel, -300.0));
        assert!((rig.distance - 13.0).abs() < 1e-5);
        rig.zoom(scroll_to_zoom(MouseScrollUnit::Line, 100.0));
        assert_eq!(rig.distance, 2.0);
        rig.zoom(scroll_to_zoom(MouseScrollUnit::Line, -100.0));
        assert_eq!(rig.distance, 50.0);
    }

    #[test]
    fn camera_tracks_the_player() {
        let mut app = App::new();
        app.add_event::<MouseMotion>()
            .add_event::<MouseWheel>()
            .add_systems(Update, follow_camera_system);

        app.world_mut()
            .spawn((Player::default(), Transform::from_xyz(4.0, 0.5, -2.0)));
        let camera = app
            .world_mut()
            .spawn((FollowCamera::default(), Transform::IDENTITY))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(approx(transform.translation, Vec3::new(4.0, 0.5, 8.0)));
        let looking = *transform.forward();
        assert!(looking.z < -0.9);
    }

    #[test]
    fn click_locks_the_cursor_and_escape_frees_it() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, cursor_grab_system);
        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        let cursor = &app.world().get::<Window>(window).unwrap().cursor_options;
        assert_eq!(cursor.grab_mode, CursorGrabMode::Locked);
        assert!(!cursor.visible);

        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().clear();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        let cursor = &app.world().get::<Window>(window).unwrap().cursor_options;
        assert_eq!(cursor.grab_mode, CursorGrabMode::None);
        assert!(cursor.visible);
    }
}
