use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
};

use crate::constants::path::LIGHT_BEAM_SHADER_PATH;

/// Warm white of a halogen beam.
pub const BEAM_TINT: Vec3 = Vec3::new(1.0, 0.95, 0.8);

/// Volumetric headlight cone, blended additively and faded at both ends.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct LightBeamMaterial {
    /// rgb: tint, a: intensity in `[0, 1]`
    #[uniform(0)]
    pub params: Vec4,
}

impl LightBeamMaterial {
    pub fn new(intensity: f32) -> Self {
        Self {
            params: BEAM_TINT.extend(intensity),
        }
    }

    pub fn intensity(&self) -> f32 {
        self.params.w
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.params.w = intensity.clamp(0.0, 1.0);
    }
}

impl Material for LightBeamMaterial {
    fn fragment_shader() -> ShaderRef {
        LIGHT_BEAM_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // Seen from inside or outside the cone.
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_is_clamped() {
        let mut beam = LightBeamMaterial::new(0.7);
        assert_eq!(beam.intensity(), 0.7);
        beam.set_intensity(3.0);
        assert_eq!(beam.intensity(), 1.0);
        beam.set_intensity(-1.0);
        assert_eq!(beam.intensity(), 0.0);
        assert_eq!(beam.params.truncate(), BEAM_TINT);
    }
}
