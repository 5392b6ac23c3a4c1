use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::constants::path::CITY_CONFIG_EXTENSION;
// Crate engine modules
use crate::engine::assets::city_config::CityConfig;
use crate::engine::assets::surface_textures::{check_texture_loading, start_texture_loading};
use crate::engine::camera::follow_camera::{cursor_grab_system, follow_camera_system};
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::player::controller::player_movement_system;
use crate::engine::player::interaction::{interaction_pointer_system, interaction_system};
use crate::engine::player::punch::{punch_input_system, punch_particle_system};
use crate::engine::render::light_beam::LightBeamMaterial;
use crate::engine::systems::{
    advertisement::advertisement_system,
    day_night::{day_night_keyboard_system, day_night_system},
    decorative_cubes::decorative_cube_system,
    disco_balls::disco_ball_system,
    fps_tracking::{day_night_notification_system, fps_notification_system},
    rain::rain_system,
    smoke::smoke_system,
    vehicles::{headlight_system, vehicle_path_system},
};
// Loading
use crate::engine::loading::city_creator::create_city_when_ready;
use crate::engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcPlugin;
// Transitions
use crate::engine::core::app_state::{transition_to_generating, transition_to_running};

#[cfg(not(target_arch = "wasm32"))]
use crate::constants::render_settings::FPS_TEXT_SIZE;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers CityConfig as a loadable asset type from `*.city.json` files.
        .add_plugins(JsonAssetPlugin::<CityConfig>::new(&[CITY_CONFIG_EXTENSION]))
        .add_plugins(MaterialPlugin::<LightBeamMaterial>::default())
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>();

    // State-based system scheduling
    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_config_system,
                start_texture_loading,
                check_texture_loading,
                transition_to_generating,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (create_city_when_ready, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Generating)),
        );

    // The night weight is published first; every animator reads it.
    let scene_systems = (
        (day_night_keyboard_system, day_night_system).chain(),
        (
            vehicle_path_system,
            headlight_system,
            decorative_cube_system,
            disco_ball_system,
            rain_system,
            smoke_system,
            advertisement_system,
        ),
    )
        .chain();

    // Camera follows the moved player; billboards face the moved camera.
    let player_systems = (
        cursor_grab_system,
        interaction_system,
        player_movement_system,
        follow_camera_system,
        punch_input_system,
        punch_particle_system,
        interaction_pointer_system,
    )
        .chain();

    let notification_systems = (fps_notification_system, day_night_notification_system);

    app.add_systems(
        Update,
        (scene_systems, player_systems, notification_systems).run_if(in_state(AppState::Running)),
    );

    // Add the FPS overlay and its update system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, create_native_overlays)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

// Native builds draw their own FPS readout; the web host shows it instead.
#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: FPS_TEXT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_overlay_spawns_one_fps_readout() {
        let mut app = App::new();
        app.add_systems(Startup, create_native_overlays);
        app.update();

        let world = app.world_mut();
        let texts: Vec<String> = world
            .query_filtered::<&Text, With<FpsText>>()
            .iter(world)
            .map(|t| t.0.clone())
            .collect();
        assert_eq!(texts, vec!["FPS: ".to_string()]);
    }
}
