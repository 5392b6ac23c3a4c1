use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use constants::city_layout::PARKED_CAR_POSITION;

use crate::engine::assets::city_config::CityConfig;
use crate::engine::assets::surface_textures::SurfaceTextures;
use crate::engine::camera::follow_camera::spawn_follow_camera;
use crate::engine::core::random::CityRng;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::player::controller::{PLAYER_SPAWN, spawn_player};
use crate::engine::player::interaction::{
    Interactable, InteractableKind, spawn_interaction_pointer,
};
use crate::engine::player::punch::spawn_punch_spray;
use crate::engine::render::light_beam::LightBeamMaterial;
use crate::engine::scene::building_plan::{BuildingPlan, plan_city};
use crate::engine::scene::buildings::{BuildingKit, spawn_building};
use crate::engine::scene::ground::spawn_ground;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::placement::CityFootprints;
use crate::engine::scene::vehicle_model::{VehicleKit, spawn_vehicle};
use crate::engine::systems::advertisement::{AdClock, AdMaterials};
use crate::engine::systems::day_night::{DayNightCycle, NightAlpha};
use crate::engine::systems::decorative_cubes::spawn_decorative_cubes;
use crate::engine::systems::disco_balls::spawn_disco_balls;
use crate::engine::systems::rain::spawn_rain;
use crate::engine::systems::smoke::spawn_smoke;
use crate::engine::systems::vehicles::spawn_traffic;

const PARKED_CAR_PHASE: f32 = 1.0;

/// What the generator actually placed. Props that found no open ground are
/// not counted.
#[derive(Resource, Serialize, Debug, Clone, PartialEq)]
pub struct CityStats {
    pub seed: u64,
    /// True when the config file was missing or invalid and defaults were used.
    pub default_config: bool,
    pub buildings: usize,
    pub vehicles: usize,
    pub decorative_cubes: usize,
    pub disco_balls: usize,
    pub rain_drops: usize,
}

pub fn create_city_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    config: Option<Res<CityConfig>>,
    textures: Option<Res<SurfaceTextures>>,
    mut rng: ResMut<CityRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut beam_materials: ResMut<Assets<LightBeamMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if loading_progress.city_generated {
        return;
    }
    let (Some(config), Some(textures)) = (config, textures) else {
        return;
    };

    let mut stats = generate_city(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut beam_materials,
        &mut images,
        &config,
        &textures,
        &mut rng.0,
    );
    stats.default_config = loading_progress.used_default_config;

    info!(
        "✓ City generated (seed {}): {} buildings, {} vehicles, {} cubes, {} disco balls, {} rain drops",
        stats.seed,
        stats.buildings,
        stats.vehicles,
        stats.decorative_cubes,
        stats.disco_balls,
        stats.rain_drops
    );
    commands.insert_resource(stats);
    loading_progress.city_generated = true;
}

/// Spawns the whole scene and inserts the runtime resources that drive it.
#[allow(clippy::too_many_arguments)]
pub fn generate_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    beam_materials: &mut Assets<LightBeamMaterial>,
    images: &mut Assets<Image>,
    config: &CityConfig,
    textures: &SurfaceTextures,
    rng: &mut impl Rng,
) -> CityStats {
    let plans = plan_city(config, rng);
    let footprints = CityFootprints(plans.iter().map(BuildingPlan::footprint).collect());

    spawn_lighting(commands, meshes, materials);
    spawn_ground(commands, meshes, materials, textures, config.puddle_count, rng);

    let ads = AdMaterials::create(images, materials);
    let building_kit = BuildingKit::new(meshes, materials, textures.brick.clone(), ads.clone());
    for plan in &plans {
        spawn_building(commands, meshes, materials, &building_kit, plan);
        if plan.emits_smoke {
            let top = Vec3::new(plan.x, plan.footprint().top_y, plan.z);
            spawn_smoke(commands, meshes, materials, top, rng);
        }
    }
    commands.insert_resource(ads);

    let vehicle_kit = VehicleKit::new(meshes, materials);
    let traffic = spawn_traffic(
        commands,
        beam_materials,
        &vehicle_kit,
        config.traffic_vehicle_count,
        rng,
    );
    let parked = spawn_vehicle(
        commands,
        beam_materials,
        &vehicle_kit,
        Vec3::from_array(PARKED_CAR_POSITION),
        PARKED_CAR_PHASE,
        rng,
    );
    commands.entity(parked).insert((
        Name::new("Parked Car"),
        Interactable {
            kind: InteractableKind::Car,
        },
    ));
    spawn_interaction_pointer(commands, meshes, materials, parked);

    let decorative_cubes = spawn_decorative_cubes(
        commands,
        meshes,
        materials,
        &footprints.0,
        config.decorative_cube_count,
        rng,
    );
    let disco_balls = spawn_disco_balls(
        commands,
        meshes,
        materials,
        images,
        &footprints.0,
        config.disco_ball_count,
        config.disco_shadows,
        rng,
    );
    spawn_rain(commands, meshes, materials, config.rain_drop_count, rng);

    spawn_player(commands, meshes, materials);
    spawn_punch_spray(commands, meshes, materials);
    spawn_follow_camera(commands, config, PLAYER_SPAWN);

    commands.insert_resource(footprints);
    commands.insert_resource(DayNightCycle::new(
        config.day_night_cycle_secs,
        config.start_phase,
    ));
    commands.insert_resource(NightAlpha::default());
    commands.insert_resource(AdClock::default());

    CityStats {
        seed: config.seed,
        default_config: false,
        buildings: plans.len(),
        vehicles: traffic + 1,
        decorative_cubes,
        disco_balls,
        rain_drops: config.rain_drop_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::follow_camera::FollowCamera;
    use crate::engine::player::controller::Player;
    use crate::engine::scene::buildings::Building;
    use crate::engine::scene::vehicle_model::Vehicle;
    use crate::engine::systems::vehicles::PathFollower;

    fn small_config() -> CityConfig {
        CityConfig {
            seed: 7,
            building_grid_radius: 2,
            building_probability: 0.5,
            traffic_vehicle_count: 4,
            decorative_cube_count: 3,
            disco_ball_count: 2,
            rain_drop_count: 50,
            puddle_count: 4,
            ..default()
        }
    }

    fn generate(config: &CityConfig) -> (World, CityStats) {
        let mut world = World::new();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut beams = Assets::<LightBeamMaterial>::default();
        let mut images = Assets::<Image>::default();
        let textures = SurfaceTextures::default();
        let mut rng = CityRng::from_seed(config.seed);

        let stats = {
            let mut commands = world.commands();
            generate_city(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut beams,
                &mut images,
                config,
                &textures,
                &mut rng.0,
            )
        };
        world.flush();
        (world, stats)
    }

    fn count<C: Component>(world: &mut World) -> usize {
        world.query::<&C>().iter(world).count()
    }

    #[test]
    fn counts_match_what_was_spawned() {
        let config = small_config();
        let (mut world, stats) = generate(&config);

        assert_eq!(stats.seed, 7);
        assert_eq!(count::<Building>(&mut world), stats.buildings);
        assert_eq!(count::<Vehicle>(&mut world), stats.vehicles);
        assert_eq!(count::<PathFollower>(&mut world), 4);
        assert_eq!(count::<Player>(&mut world), 1);
        assert_eq!(count::<FollowCamera>(&mut world), 1);
        assert_eq!(stats.rain_drops, 50);
        assert!(stats.decorative_cubes <= 3);

        assert!(world.contains_resource::<CityFootprints>());
        assert!(world.contains_resource::<DayNightCycle>());
        assert!(world.contains_resource::<AdMaterials>());
    }

    #[test]
    fn parked_car_is_the_only_interactable_and_stays_put() {
        let (mut world, _) = generate(&small_config());
        let mut parked = world.query_filtered::<(&Interactable, &Transform), Without<PathFollower>>();
        let cars: Vec<_> = parked.iter(&world).collect();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].0.kind, InteractableKind::Car);
        assert_eq!(cars[0].1.translation, Vec3::new(3.0, 0.77, 3.0));
    }

    #[test]
    fn same_seed_same_skyline() {
        let config = small_config();
        let skyline = |world: &mut World| -> Vec<(f32, f32, f32)> {
            world
                .query::<&Building>()
                .iter(world)
                .map(|b| (b.footprint.x, b.footprint.z, b.footprint.top_y))
                .collect()
        };
        let (mut a, stats_a) = generate(&config);
        let (mut b, stats_b) = generate(&config);
        assert_eq!(stats_a, stats_b);
        assert_eq!(skyline(&mut a), skyline(&mut b));
    }

    #[test]
    fn stats_report_a_default_config_fallback() {
        let mut app = App::new();
        app.insert_resource(LoadingProgress {
            config_loaded: true,
            used_default_config: true,
            textures_loaded: true,
            ..default()
        })
        .insert_resource(small_config())
        .insert_resource(SurfaceTextures::default())
        .insert_resource(CityRng::from_seed(7))
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<Assets<LightBeamMaterial>>()
        .init_resource::<Assets<Image>>()
        .add_systems(Update, create_city_when_ready);

        app.update();

        assert!(app.world().resource::<LoadingProgress>().city_generated);
        let stats = app.world().resource::<CityStats>();
        assert!(stats.default_config);
        assert_eq!(stats.seed, 7);
    }
}
