/// Half extent used when scattering props across the city (cubes, disco balls).
pub const PROP_SCATTER_HALF_RANGE: f32 = 200.0;

/// Ground plane edge length.
pub const GROUND_SIZE: f32 = 500.0;

/// Half extent of the area puddles are scattered over.
pub const PUDDLE_SCATTER_HALF_RANGE: f32 = 100.0;

/// Half extent of the rain volume in X and Z.
pub const RAIN_HALF_RANGE: f32 = 100.0;
pub const RAIN_CEILING: f32 = 200.0;

/// Half extent of the area traffic anchors are spread over.
pub const TRAFFIC_HALF_RANGE: f32 = 150.0;

/// Upper bound on windows generated for a single building.
pub const MAX_WINDOWS_PER_BUILDING: usize = 300;

/// Spacing between window slots on a facade.
pub const WINDOW_SPACING: f32 = 2.0;

/// Extra radius added around a building when keeping props clear of it.
pub const FOOTPRINT_CLEARANCE: f32 = 2.0;

/// Attempts before an open-space sample gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;

/// Distance at which the player can enter a car.
pub const INTERACT_DISTANCE: f32 = 3.0;

/// Where the enterable car is parked.
pub const PARKED_CAR_POSITION: [f32; 3] = [3.0, 0.77, 3.0];
