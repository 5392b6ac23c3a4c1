use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub used_default_config: bool,
    pub textures_loaded: bool,
    pub city_generated: bool,
}
