//! Engine-local constants that depend on Bevy types.

pub mod path;
pub mod render_settings;
