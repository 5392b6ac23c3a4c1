use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::CITY_CONFIG_PATH;
use crate::engine::assets::city_config::CityConfig;
use crate::engine::core::random::CityRng;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<CityConfig>>,
}

pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading city config from: {}", CITY_CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(CITY_CONFIG_PATH));
}

/// Waits for the config asset, validates it, and publishes it with a seeded RNG.
/// A missing or invalid file falls back to the built-in defaults.
pub fn load_config_system(
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<CityConfig>>,
) {
    if loading_progress.config_loaded {
        return;
    }

    let Some(ref handle) = config_loader.handle else {
        return;
    };

    let resolved = if let Some(config) = configs.get(handle) {
        Some(accept_or_default(config))
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("City config failed to load ({err}), using defaults");
        Some((CityConfig::default(), true))
    } else {
        None
    };

    if let Some((config, used_default)) = resolved {
        info!("✓ City config ready (seed {})", config.seed);
        commands.insert_resource(CityRng::from_seed(config.seed));
        commands.insert_resource(config);
        loading_progress.config_loaded = true;
        loading_progress.used_default_config = used_default;
    }
}

/// Returns the config to run with and whether defaults replaced it.
pub fn accept_or_default(config: &CityConfig) -> (CityConfig, bool) {
    match config.validate() {
        Ok(()) => (config.clone(), false),
        Err(err) => {
            warn!("Invalid city config: {err}; using defaults");
            (CityConfig::default(), true)
        }
    }
}
