/// City configuration, relative to the asset root.
pub const CITY_CONFIG_PATH: &str = "config/neon_city.city.json";

/// File extension the JSON loader claims for city configs.
pub const CITY_CONFIG_EXTENSION: &str = "city.json";

pub const LIGHT_BEAM_SHADER_PATH: &str = "shaders/light_beam.wgsl";
