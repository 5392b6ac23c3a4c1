//! Scrolling advertisement banners.
//!
//! All banners share one text material and one image material, so a single
//! UV offset per frame scrolls every building's ad at once.

use bevy::math::Affine2;
use bevy::prelude::*;

use crate::engine::render::ad_texture::{banner_image, image_panel};

/// Fraction of a banner's height given to the text strip.
pub const TEXT_STRIP_SHARE: f32 = 0.3;

#[derive(Resource, Debug, Clone)]
pub struct AdMaterials {
    pub text: Handle<StandardMaterial>,
    pub image: Handle<StandardMaterial>,
}

impl AdMaterials {
    pub fn create(images: &mut Assets<Image>, materials: &mut Assets<StandardMaterial>) -> Self {
        let text = materials.add(StandardMaterial {
            base_color_texture: Some(images.add(banner_image())),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        let image = materials.add(StandardMaterial {
            base_color_texture: Some(images.add(image_panel())),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        Self { text, image }
    }
}

/// Seconds of banner animation, advanced only while the city runs.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct AdClock(pub f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdScroll {
    pub text_offset: f32,
    pub image_offset: f32,
    pub glow: f32,
}

pub fn ad_scroll(t: f32) -> AdScroll {
    AdScroll {
        text_offset: (-t * 0.1).rem_euclid(1.0),
        image_offset: (-t * 0.05).rem_euclid(1.0),
        glow: 0.7 + 0.3 * (t * 2.0).sin(),
    }
}

pub fn advertisement_system(
    time: Res<Time>,
    mut clock: ResMut<AdClock>,
    ads: Res<AdMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    clock.0 += time.delta_secs();
    let scroll = ad_scroll(clock.0);

    if let Some(text) = materials.get_mut(&ads.text) {
        text.uv_transform = Affine2::from_translation(Vec2::new(scroll.text_offset, 0.0));
        text.base_color = Color::srgb(scroll.glow, scroll.glow, scroll.glow);
    }
    if let Some(image) = materials.get_mut(&ads.image) {
        image.uv_transform = Affine2::from_translation(Vec2::new(scroll.image_offset, 0.0));
    }
}
