use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded generator behind every procedural decision, so a seed reproduces
/// the same city and the same headlight flicker schedule.
#[derive(Resource)]
pub struct CityRng(pub ChaCha8Rng);

impl CityRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for CityRng {
    fn default() -> Self {
        Self::from_seed(0)
    }
}
