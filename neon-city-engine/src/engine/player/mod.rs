//! The walkable player: movement, punches and getting in and out of cars.

/// Player component, WASD movement, gravity and building collision.
pub mod controller;

/// Car entry/exit and the floating pointer over reachable cars.
pub mod interaction;

/// Cone-shaped punch particle spray.
pub mod punch;
