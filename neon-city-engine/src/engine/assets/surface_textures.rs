use bevy::asset::LoadState;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;

use crate::engine::assets::city_config::CityConfig;
use crate::engine::loading::progress::LoadingProgress;

/// Optional surface textures named by the config. A slot whose file fails to
/// load is cleared so the surface falls back to a flat colour.
#[derive(Resource, Default, Debug, Clone)]
pub struct SurfaceTextures {
    pub brick: Option<Handle<Image>>,
    pub concrete: Option<Handle<Image>>,
    pub concrete_normal: Option<Handle<Image>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    Pending,
    Ready,
    Failed,
}

impl SurfaceTextures {
    pub fn load(config: &CityConfig, asset_server: &AssetServer) -> Self {
        let load = |path: &Option<String>, is_srgb: bool| {
            path.as_ref().map(|p| {
                info!("Loading surface texture: {p}");
                load_repeating(asset_server, p, is_srgb)
            })
        };
        Self {
            brick: load(&config.brick_texture, true),
            concrete: load(&config.concrete_texture, true),
            concrete_normal: load(&config.concrete_normal_texture, false),
        }
    }

    /// Clears failed slots and reports whether every slot has settled.
    pub fn settle(&mut self, status: impl Fn(&Handle<Image>) -> TextureStatus) -> bool {
        let mut settled = true;
        for (name, slot) in [
            ("brick", &mut self.brick),
            ("concrete", &mut self.concrete),
            ("concrete normal", &mut self.concrete_normal),
        ] {
            let Some(handle) = slot else {
                continue;
            };
            match status(handle) {
                TextureStatus::Ready => {}
                TextureStatus::Pending => settled = false,
                TextureStatus::Failed => {
                    warn!("Failed to load {name} texture, using a flat colour");
                    *slot = None;
                }
            }
        }
        settled
    }
}

pub fn repeat_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        address_mode_w: ImageAddressMode::Repeat,
        ..ImageSamplerDescriptor::linear()
    }
}

fn load_repeating(asset_server: &AssetServer, path: &str, is_srgb: bool) -> Handle<Image> {
    asset_server.load_with_settings(path.to_owned(), move |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = is_srgb;
        settings.sampler = ImageSampler::Descriptor(repeat_sampler());
    })
}

pub fn start_texture_loading(
    mut commands: Commands,
    loading_progress: Res<LoadingProgress>,
    config: Option<Res<CityConfig>>,
    textures: Option<Res<SurfaceTextures>>,
    asset_server: Res<AssetServer>,
) {
    if !loading_progress.config_loaded || textures.is_some() {
        return;
    }
    let Some(config) = config else {
        return;
    };
    commands.insert_resource(SurfaceTextures::load(&config, &asset_server));
}

pub fn check_texture_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    textures: Option<ResMut<SurfaceTextures>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.textures_loaded {
        return;
    }
    let Some(mut textures) = textures else {
        return;
    };

    let settled = textures.settle(|handle| match asset_server.load_state(handle.id()) {
        LoadState::Loaded => TextureStatus::Ready,
        LoadState::Failed(_) => TextureStatus::Failed,
        _ => TextureStatus::Pending,
    });

    if settled {
        info!("✓ Surface textures settled");
        loading_progress.textures_loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(n: u128) -> Handle<Image> {
        Handle::weak_from_u128(n)
    }

    #[test]
    fn empty_slots_settle_immediately() {
        let mut textures = SurfaceTextures::default();
        assert!(textures.settle(|_| TextureStatus::Pending));
    }

    #[test]
    fn pending_slot_blocks_and_failed_slot_is_cleared() {
        let brick = handle(1);
        let concrete = handle(2);
        let mut textures = SurfaceTextures {
            brick: Some(brick.clone()),
            concrete: Some(concrete.clone()),
            concrete_normal: None,
        };

        let settled = textures.settle(|h| {
            if *h == brick {
                TextureStatus::Pending
            } else {
                TextureStatus::Failed
            }
        });
        assert!(!settled);
        assert!(textures.concrete.is_none());
        assert_eq!(textures.brick, Some(brick));

        assert!(textures.settle(|_| TextureStatus::Ready));
    }
}
