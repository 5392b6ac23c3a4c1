use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Generating,
    Running,
}

#[derive(Component)]
pub struct FpsText;

pub fn transition_to_generating(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.config_loaded && loading_progress.textures_loaded {
        info!("→ Config ready, transitioning to Generating state");
        next_state.set(AppState::Generating);
    }
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.city_generated {
        info!("→ City generated, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
