//! Disco balls: mirror-tiled spheres with a breathing point light and four
//! colour-shifted spotlights, dark until dusk.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, PI};

use bevy::prelude::*;
use rand::Rng;

use constants::city_layout::PROP_SCATTER_HALF_RANGE;
use constants::day_night::{NIGHT_PROPS_THRESHOLD, REFERENCE_FPS};
use constants::palette::{NEON_COLORS, hex_color, hue_cycle, neon_hue, scaled_emissive};
use constants::render_settings::{EMISSIVE_SCALE, LUMENS_PER_LIGHT_UNIT};

use crate::engine::render::ad_texture::rainbow_image;
use crate::engine::scene::placement::{BuildingFootprint, sample_open_position};
use crate::engine::systems::day_night::NightAlpha;

const GLOW_INTENSITY: f32 = 8.0;
const GLOW_RANGE: f32 = 50.0;
const SPOT_INTENSITY: f32 = 5.0;
const SPOT_RANGE: f32 = 40.0;
const TILE_STRENGTH: f32 = 1.5;
const SPOT_DIRECTIONS: [Vec3; 4] = [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z];

/// Surface finish, chosen by a 1-based variant number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoFinish {
    Chrome,
    Glass,
    Gloss,
    Rainbow,
    Lacquered,
    Plain,
}

impl DiscoFinish {
    pub fn from_variant(variant: u32) -> Self {
        match variant {
            1 => Self::Chrome,
            2 => Self::Glass,
            3 => Self::Gloss,
            4 => Self::Rainbow,
            5 => Self::Lacquered,
            _ => Self::Plain,
        }
    }

    pub fn tile_count(self) -> usize {
        match self {
            Self::Rainbow | Self::Lacquered => 20,
            _ => 40,
        }
    }

    fn material(self, rainbow: Option<Handle<Image>>) -> StandardMaterial {
        let grey = hex_color(0x888888);
        match self {
            Self::Chrome => StandardMaterial {
                base_color: grey,
                perceptual_roughness: 0.0,
                metallic: 1.0,
                ..default()
            },
            Self::Glass => StandardMaterial {
                base_color: Color::WHITE,
                specular_transmission: 0.5,
                perceptual_roughness: 0.05,
                ior: 1.5,
                thickness: 0.5,
                clearcoat: 1.0,
                clearcoat_perceptual_roughness: 0.1,
                ..default()
            },
            Self::Gloss => StandardMaterial {
                base_color: Color::WHITE,
                perceptual_roughness: 0.1,
                reflectance: 1.0,
                ..default()
            },
            Self::Rainbow => StandardMaterial {
                base_color_texture: rainbow,
                perceptual_roughness: 0.3,
                metallic: 0.8,
                ..default()
            },
            Self::Lacquered => StandardMaterial {
                base_color: grey,
                perceptual_roughness: 0.1,
                metallic: 1.0,
                emissive: scaled_emissive(hex_color(0x222222), EMISSIVE_SCALE),
                clearcoat: 1.0,
                clearcoat_perceptual_roughness: 0.0,
                ..default()
            },
            Self::Plain => StandardMaterial {
                base_color: grey,
                perceptual_roughness: 0.2,
                metallic: 1.0,
                ..default()
            },
        }
    }
}

/// Fibonacci-style spiral of unit directions covering the sphere.
pub fn mirror_tile_directions(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / count as f32).acos();
            let theta = (count as f32 * PI).sqrt() * phi;
            Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
        })
        .collect()
}

/// Hue of spotlight `index`, spaced a quarter turn from its neighbour.
pub fn spot_hue(hue: f32, index: usize) -> f32 {
    (hue + index as f32 * 0.25) % 1.0
}

pub fn tile_strength(elapsed: f32, index: usize, night: f32) -> f32 {
    let shimmer = (elapsed * 0.5 + index as f32 * 0.1).sin() * 0.5 + 1.0;
    TILE_STRENGTH * shimmer * night
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct DiscoBall {
    pub rest_height: f32,
    /// Radians per reference frame.
    pub rotation_speed: f32,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub color_change_speed: f32,
    pub spin: Vec2,
    pub lit: bool,
    pub hue: f32,
    pub breathing: f32,
    pub night: f32,
}

impl DiscoBall {
    pub fn new(rest_height: f32, rng: &mut impl Rng) -> Self {
        Self {
            rest_height,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.01,
            float_speed: 0.2 + rng.random::<f32>() * 0.4,
            float_amplitude: 0.8 + rng.random::<f32>() * 1.2,
            color_change_speed: 0.2 + rng.random::<f32>() * 0.3,
            spin: Vec2::ZERO,
            lit: false,
            hue: 0.0,
            breathing: 0.0,
            night: 0.0,
        }
    }

    /// Advances the ball. Returns the new height, or `None` by day when the
    /// ball only switches its lights off and otherwise stays put.
    pub fn animate(&mut self, elapsed: f32, frames: f32, night: f32) -> Option<f32> {
        self.night = night;
        if night < NIGHT_PROPS_THRESHOLD {
            self.lit = false;
            return None;
        }

        self.lit = true;
        self.breathing = 0.5 + 0.5 * (elapsed * 2.0).sin();
        self.spin.y += self.rotation_speed * frames;
        self.spin.x += self.rotation_speed * 0.7 * frames;
        self.hue = hue_cycle(elapsed * self.color_change_speed);
        Some(self.rest_height + (elapsed * self.float_speed).sin() * self.float_amplitude)
    }

    pub fn glow_intensity(&self) -> f32 {
        if self.lit {
            GLOW_INTENSITY * self.breathing * self.night
        } else {
            0.0
        }
    }

    pub fn spot_intensity(&self) -> f32 {
        if self.lit {
            SPOT_INTENSITY * self.breathing * self.night
        } else {
            0.0
        }
    }
}

#[derive(Component)]
pub struct DiscoGlow;

#[derive(Component, Debug, Clone, Copy)]
pub struct DiscoSpot {
    pub index: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MirrorTile {
    pub index: usize,
    pub base_color: Color,
}

/// Places up to `count` balls clear of buildings, cycling through the five
/// finishes. Returns how many were placed.
#[allow(clippy::too_many_arguments)]
pub fn spawn_disco_balls(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    footprints: &[BuildingFootprint],
    count: usize,
    shadows: bool,
    rng: &mut impl Rng,
) -> usize {
    let tile_mesh = meshes.add(Cuboid::new(0.4, 0.4, 0.05));
    let mut rainbow = None;
    let mut placed = 0;

    for i in 0..count {
        let finish = DiscoFinish::from_variant(i as u32 % 5 + 1);
        let Some(spot) = sample_open_position(rng, PROP_SCATTER_HALF_RANGE, footprints) else {
            warn!("No open ground left for a disco ball, skipping it");
            continue;
        };
        let height = 15.0 + rng.random::<f32>() * 10.0;
        let ball = DiscoBall::new(height, rng);
        let base_color = hex_color(NEON_COLORS[rng.random_range(0..NEON_COLORS.len())]);
        let secondary_color = hex_color(NEON_COLORS[rng.random_range(0..NEON_COLORS.len())]);
        let radius = 2.0 + rng.random::<f32>();

        let texture = (finish == DiscoFinish::Rainbow)
            .then(|| rainbow.get_or_insert_with(|| images.add(rainbow_image())).clone());

        let tiles: Vec<(Vec3, Color)> = mirror_tile_directions(finish.tile_count())
            .into_iter()
            .map(|dir| {
                let hex = NEON_COLORS[rng.random_range(0..NEON_COLORS.len())];
                (dir * radius, hex_color(hex))
            })
            .collect();

        commands
            .spawn((
                ball,
                Mesh3d(meshes.add(Sphere::new(radius).mesh().uv(32, 32))),
                MeshMaterial3d(materials.add(finish.material(texture))),
                Transform::from_xyz(spot.x, height, spot.y),
            ))
            .with_children(|ball| {
                ball.spawn((
                    DiscoGlow,
                    PointLight {
                        color: base_color,
                        intensity: 0.0,
                        range: GLOW_RANGE,
                        shadows_enabled: shadows,
                        ..default()
                    },
                ));

                for (index, direction) in SPOT_DIRECTIONS.into_iter().enumerate() {
                    ball.spawn((
                        DiscoSpot { index },
                        SpotLight {
                            color: secondary_color,
                            intensity: 0.0,
                            range: SPOT_RANGE,
                            outer_angle: FRAC_PI_4,
                            inner_angle: FRAC_PI_8,
                            ..default()
                        },
                        Transform::default().looking_at(direction * 10.0, Vec3::Y),
                    ));
                }

                for (index, (position, color)) in tiles.into_iter().enumerate() {
                    ball.spawn((
                        MirrorTile {
                            index,
                            base_color: color,
                        },
                        Mesh3d(tile_mesh.clone()),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color: color,
                            emissive: scaled_emissive(color, TILE_STRENGTH * EMISSIVE_SCALE),
                            perceptual_roughness: 0.1,
                            metallic: 0.9,
                            ..default()
                        })),
                        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
                    ));
                }
            });
        placed += 1;
    }
    placed
}

pub fn disco_ball_system(
    time: Res<Time>,
    night: Res<NightAlpha>,
    mut balls: Query<(&mut DiscoBall, &mut Transform)>,
    mut glows: Query<(&ChildOf, &mut PointLight), With<DiscoGlow>>,
    mut spots: Query<(&ChildOf, &DiscoSpot, &mut SpotLight)>,
    tiles: Query<(&ChildOf, &MirrorTile, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let elapsed = time.elapsed_secs();
    let frames = time.delta_secs() * REFERENCE_FPS;

    for (mut ball, mut transform) in &mut balls {
        if let Some(height) = ball.animate(elapsed, frames, night.0) {
            transform.translation.y = height;
            transform.rotation = Quat::from_euler(EulerRot::XYZ, ball.spin.x, ball.spin.y, 0.0);
        }
    }

    for (child_of, mut light) in &mut glows {
        let Ok((ball, _)) = balls.get(child_of.parent()) else {
            continue;
        };
        light.intensity = ball.glow_intensity() * LUMENS_PER_LIGHT_UNIT;
        if ball.lit {
            light.color = neon_hue(ball.hue);
        }
    }

    for (child_of, spot, mut light) in &mut spots {
        let Ok((ball, _)) = balls.get(child_of.parent()) else {
            continue;
        };
        light.intensity = ball.spot_intensity() * LUMENS_PER_LIGHT_UNIT;
        if ball.lit {
            light.color = neon_hue(spot_hue(ball.hue, spot.index));
        }
    }

    for (child_of, tile, material) in &tiles {
        let Ok((ball, _)) = balls.get(child_of.parent()) else {
            continue;
        };
        if !ball.lit {
            continue;
        }
        let strength = tile_strength(elapsed, tile.index, ball.night);
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = scaled_emissive(tile.base_color, strength * EMISSIVE_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::random::CityRng;
    use std::time::Duration;

    #[test]
    fn tile_directions_are_unit_and_spread() {
        let dirs = mirror_tile_directions(40);
        assert_eq!(dirs.len(), 40);
        for d in &dirs {
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
        // first tile sits at the -Z pole
        assert!((dirs[0] - Vec3::NEG_Z).length() < 1e-5);
        assert!(dirs.iter().any(|d| d.z > 0.9));
    }

    #[test]
    fn finishes_follow_variant_numbers() {
        assert_eq!(DiscoFinish::from_variant(1), DiscoFinish::Chrome);
        assert_eq!(DiscoFinish::from_variant(4), DiscoFinish::Rainbow);
        assert_eq!(DiscoFinish::from_variant(9), DiscoFinish::Plain);
        assert_eq!(DiscoFinish::Rainbow.tile_count(), 20);
        assert_eq!(DiscoFinish::Lacquered.tile_count(), 20);
        assert_eq!(DiscoFinish::Glass.tile_count(), 40);
    }

    #[test]
    fn spot_hues_wrap() {
        assert!((spot_hue(0.9, 1) - 0.15).abs() < 1e-6);
        assert_eq!(spot_hue(0.0, 0), 0.0);
    }

    #[test]
    fn tile_strength_scales_with_night() {
        assert_eq!(tile_strength(1.0, 3, 0.0), 0.0);
        let full = tile_strength(0.0, 0, 1.0);
        assert!((full - 1.5).abs() < 1e-6);
    }

    #[test]
    fn daytime_turns_lights_off_and_keeps_pose() {
        let mut rng = CityRng::from_seed(3).0;
        let mut ball = DiscoBall::new(20.0, &mut rng);
        assert_eq!(ball.animate(5.0, 1.0, 0.0), None);
        assert!(!ball.lit);
        assert_eq!(ball.glow_intensity(), 0.0);
        assert_eq!(ball.spot_intensity(), 0.0);
        assert_eq!(ball.spin, Vec2::ZERO);
    }

    #[test]
    fn system_drives_child_lights() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(NightAlpha(1.0))
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, disco_ball_system);

        let mut rng = CityRng::from_seed(21).0;
        let ball = app
            .world_mut()
            .spawn((DiscoBall::new(20.0, &mut rng), Transform::from_xyz(0.0, 20.0, 0.0)))
            .id();
        let glow_id = app
            .world_mut()
            .spawn((DiscoGlow, PointLight::default(), ChildOf(ball)))
            .id();
        let spot_id = app
            .world_mut()
            .spawn((DiscoSpot { index: 2 }, SpotLight::default(), ChildOf(ball)))
            .id();

        // breathing peaks at pi/4 seconds
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(FRAC_PI_4));
        app.update();

        let glow = app.world().get::<PointLight>(glow_id).unwrap();
        assert!((glow.intensity - 8.0 * LUMENS_PER_LIGHT_UNIT).abs() < 10.0);
        let spot = app.world().get::<SpotLight>(spot_id).unwrap();
        assert!((spot.intensity - 5.0 * LUMENS_PER_LIGHT_UNIT).abs() < 10.0);

        app.insert_resource(NightAlpha(0.0));
        app.update();
        assert_eq!(app.world().get::<PointLight>(glow_id).unwrap().intensity, 0.0);
        assert_eq!(app.world().get::<SpotLight>(spot_id).unwrap().intensity, 0.0);
    }

    fn tile_emissive(app: &App, material: &Handle<StandardMaterial>) -> LinearRgba {
        app.world()
            .resource::<Assets<StandardMaterial>>()
            .get(material)
            .unwrap()
            .emissive
    }

    #[test]
    fn tiles_glow_at_night_and_hold_still_by_day() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(NightAlpha(1.0))
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, disco_ball_system);

        let base_color = Color::srgb(1.0, 0.0, 1.0);
        let material = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let mut rng = CityRng::from_seed(8).0;
        let ball = app
            .world_mut()
            .spawn((DiscoBall::new(18.0, &mut rng), Transform::from_xyz(0.0, 18.0, 0.0)))
            .id();
        app.world_mut().spawn((
            MirrorTile {
                index: 0,
                base_color,
            },
            MeshMaterial3d(material.clone()),
            ChildOf(ball),
        ));

        // at t = 0 the shimmer sits at its midpoint
        app.update();
        let night_glow = tile_emissive(&app, &material);
        assert_eq!(
            night_glow,
            scaled_emissive(base_color, TILE_STRENGTH * EMISSIVE_SCALE)
        );

        app.insert_resource(NightAlpha(0.0));
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(2));
        app.update();
        assert_eq!(tile_emissive(&app, &material), night_glow);
    }
}
