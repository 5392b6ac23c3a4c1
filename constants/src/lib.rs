//! Shared tuning tables for the neon city.
//!
//! Colour palettes, city layout dimensions, day/night timing and the scale
//! factors that map scene intensities onto physical light units.

pub mod city_layout;
pub mod day_night;
pub mod palette;
pub mod render_settings;
