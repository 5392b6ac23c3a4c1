//! Traffic: figure-of-eight flight paths and flickering headlights.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::TRAFFIC_HALF_RANGE;
use constants::render_settings::LUMENS_PER_LIGHT_UNIT;

use crate::engine::core::random::CityRng;
use crate::engine::render::light_beam::LightBeamMaterial;
use crate::engine::scene::vehicle_model::{Headlight, Vehicle, VehicleKit, spawn_vehicle};
use crate::engine::systems::day_night::NightAlpha;
use crate::engine::systems::flicker::FlickerState;

const PATH_RATE: f32 = 0.5;
const PATH_HALF_WIDTH: f32 = 25.0;
const PATH_HALF_DEPTH: f32 = 15.0;
const HEADING_LOOKAHEAD: f32 = 0.01;

/// Marks vehicles that fly their path. The parked car lacks it.
#[derive(Component)]
pub struct PathFollower;

fn path_point(anchor: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        anchor.x + t.sin() * PATH_HALF_WIDTH,
        anchor.y,
        anchor.z + (t * 0.7).sin() * PATH_HALF_DEPTH,
    )
}

pub fn vehicle_path(anchor: Vec3, phase: f32, elapsed: f32) -> Vec3 {
    path_point(anchor, elapsed * PATH_RATE + phase)
}

/// Position on the path with the nose (+Z) turned towards where the car goes next.
pub fn vehicle_pose(vehicle: &Vehicle, elapsed: f32) -> Transform {
    let here = vehicle_path(vehicle.anchor, vehicle.phase, elapsed);
    let ahead = vehicle_path(vehicle.anchor, vehicle.phase + HEADING_LOOKAHEAD, elapsed) - here;
    let yaw = ahead.x.atan2(ahead.z);
    Transform::from_translation(here).with_rotation(Quat::from_rotation_y(yaw))
}

pub fn vehicle_path_system(
    time: Res<Time>,
    mut vehicles: Query<(&Vehicle, &mut Transform), With<PathFollower>>,
) {
    let elapsed = time.elapsed_secs();
    for (vehicle, mut transform) in &mut vehicles {
        *transform = vehicle_pose(vehicle, elapsed);
    }
}

/// Beam opacity for a flicker level under the current night weight.
pub fn beam_intensity(flicker: &FlickerState, night: f32) -> f32 {
    night * flicker.level()
}

pub fn headlight_system(
    time: Res<Time>,
    night: Res<NightAlpha>,
    mut rng: ResMut<CityRng>,
    mut headlights: Query<(&Headlight, &mut FlickerState, &mut SpotLight)>,
    beams: Query<&MeshMaterial3d<LightBeamMaterial>>,
    mut beam_materials: ResMut<Assets<LightBeamMaterial>>,
) {
    let elapsed = time.elapsed_secs();
    for (headlight, mut flicker, mut spot) in &mut headlights {
        let current = flicker.update(elapsed, &mut rng.0);
        spot.intensity = current * night.0 * LUMENS_PER_LIGHT_UNIT;

        let Ok(beam) = beams.get(headlight.beam) else {
            continue;
        };
        let target = beam_intensity(&flicker, night.0);
        let stale = beam_materials
            .get(&beam.0)
            .is_some_and(|m| (m.intensity() - target).abs() > 1e-3);
        if stale {
            if let Some(material) = beam_materials.get_mut(&beam.0) {
                material.set_intensity(target);
            }
        }
    }
}

/// Spawns the flying traffic and returns how many cars were placed.
pub fn spawn_traffic(
    commands: &mut Commands,
    beam_materials: &mut Assets<LightBeamMaterial>,
    kit: &VehicleKit,
    count: usize,
    rng: &mut impl Rng,
) -> usize {
    for _ in 0..count {
        let position = Vec3::new(
            (rng.random::<f32>() - 0.5) * TRAFFIC_HALF_RANGE * 2.0,
            20.0 + rng.random::<f32>() * 50.0,
            (rng.random::<f32>() - 0.5) * TRAFFIC_HALF_RANGE * 2.0,
        );
        let phase = rng.random::<f32>() * TAU;
        let car = spawn_vehicle(commands, beam_materials, kit, position, phase, rng);
        commands.entity(car).insert(PathFollower);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn vehicle(phase: f32) -> Vehicle {
        Vehicle {
            anchor: Vec3::new(5.0, 40.0, -10.0),
            phase,
            speed: 12.0,
        }
    }

    #[test]
    fn path_stays_within_its_box_at_fixed_height() {
        let v = vehicle(1.3);
        for i in 0..1000 {
            let p = vehicle_path(v.anchor, v.phase, i as f32 * 0.05);
            assert_eq!(p.y, 40.0);
            assert!((p.x - 5.0).abs() <= 25.0 + 1e-4);
            assert!((p.z + 10.0).abs() <= 15.0 + 1e-4);
        }
        assert_eq!(vehicle_path(v.anchor, 0.0, 0.0), v.anchor);
    }

    #[test]
    fn nose_points_along_the_direction_of_travel() {
        let v = vehicle(0.0);
        for elapsed in [0.0, 1.7, 4.2, 9.9] {
            let pose = vehicle_pose(&v, elapsed);
            let next = vehicle_path(v.anchor, v.phase, elapsed + 0.02);
            let travel = (next - pose.translation).normalize();
            let nose = pose.rotation * Vec3::Z;
            assert!(nose.dot(travel) > 0.99, "elapsed {elapsed}");
        }
    }

    #[test]
    fn beam_follows_night_and_flicker_level() {
        let mut rng = CityRng::from_seed(1).0;
        let mut flicker = FlickerState::new(0.8, &mut rng);
        assert_eq!(beam_intensity(&flicker, 0.0), 0.0);
        assert_eq!(beam_intensity(&flicker, 1.0), 1.0);
        flicker.current = 0.4;
        assert!((beam_intensity(&flicker, 0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn only_path_followers_move() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, vehicle_path_system);
        let flying = app
            .world_mut()
            .spawn((vehicle(0.0), PathFollower, Transform::default()))
            .id();
        let parked = app
            .world_mut()
            .spawn((vehicle(0.0), Transform::from_xyz(3.0, 0.77, 3.0)))
            .id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(2));
        app.update();

        let expected = vehicle_path(Vec3::new(5.0, 40.0, -10.0), 0.0, 2.0);
        let moved = app.world().get::<Transform>(flying).unwrap().translation;
        assert!(moved.distance(expected) < 1e-4);
        let still = app.world().get::<Transform>(parked).unwrap().translation;
        assert_eq!(still, Vec3::new(3.0, 0.77, 3.0));
    }

    #[test]
    fn headlights_are_dark_by_day() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(NightAlpha(0.0))
            .insert_resource(CityRng::from_seed(8))
            .init_resource::<Assets<LightBeamMaterial>>()
            .add_systems(Update, headlight_system);

        let material = app
            .world_mut()
            .resource_mut::<Assets<LightBeamMaterial>>()
            .add(LightBeamMaterial::new(0.7));
        let beam = app.world_mut().spawn(MeshMaterial3d(material.clone())).id();
        let flicker = FlickerState::new(0.8, &mut CityRng::from_seed(2).0);
        let light = app
            .world_mut()
            .spawn((Headlight { beam }, flicker, SpotLight::default()))
            .id();

        app.update();
        assert_eq!(app.world().get::<SpotLight>(light).unwrap().intensity, 0.0);
        let beams = app.world().resource::<Assets<LightBeamMaterial>>();
        assert_eq!(beams.get(&material).unwrap().intensity(), 0.0);

        app.insert_resource(NightAlpha(1.0));
        app.update();
        let spot = app.world().get::<SpotLight>(light).unwrap();
        assert!((spot.intensity - 0.8 * LUMENS_PER_LIGHT_UNIT).abs() < 1.0);
    }
}
