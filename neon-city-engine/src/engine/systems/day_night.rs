//! Phase-driven day/night interpolation.
//!
//! A single timer walks through dawn, day, dusk and night. Every frame it
//! derives the day and night weights, moves the sun and moon along a
//! parabolic arc, blends the sky and ambient light, and publishes the night
//! weight for the other animators.

use bevy::prelude::*;

use constants::day_night::{
    ARC_HALF_SPAN, ARC_PEAK_HEIGHT, DAY_AMBIENT, HIDDEN_BODY_Y, MOON_INTENSITY, NIGHT_AMBIENT,
    SUN_INTENSITY,
};
use constants::palette::{DAY_SKY_COLOR, NIGHT_SKY_COLOR, hex_color};
use constants::render_settings::{AMBIENT_BRIGHTNESS_PER_UNIT, LUX_PER_DIRECTIONAL_UNIT};

use crate::engine::scene::lighting::CelestialBody;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DayNightCycle {
    pub timer: f32,
    pub cycle_length: f32,
    pub paused: bool,
}

impl DayNightCycle {
    pub fn new(cycle_length: f32, start_phase: f32) -> Self {
        let mut cycle = Self {
            timer: 0.0,
            cycle_length,
            paused: false,
        };
        cycle.set_phase(start_phase);
        cycle
    }

    pub fn advance(&mut self, delta_secs: f32) {
        if self.paused {
            return;
        }
        self.timer += delta_secs;
        if self.timer >= self.cycle_length {
            self.timer = self.timer.rem_euclid(self.cycle_length);
        }
    }

    /// Position in the cycle, in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.timer / self.cycle_length
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.timer = phase.rem_euclid(1.0) * self.cycle_length;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(constants::day_night::DEFAULT_CYCLE_SECS, 0.0)
    }
}

/// Night weight in `[0, 1]`, written only by [`day_night_system`].
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct NightAlpha(pub f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayNightAlpha {
    pub day: f32,
    pub night: f32,
}

/// Dawn ramps day in over the first quarter, dusk ramps night in over the
/// third. The two weights always sum to one.
pub fn day_night_alpha(phase: f32) -> DayNightAlpha {
    if phase < 0.25 {
        let t = phase / 0.25;
        DayNightAlpha {
            day: t,
            night: 1.0 - t,
        }
    } else if phase < 0.5 {
        DayNightAlpha {
            day: 1.0,
            night: 0.0,
        }
    } else if phase < 0.75 {
        let t = (phase - 0.5) / 0.25;
        DayNightAlpha {
            day: 1.0 - t,
            night: t,
        }
    } else {
        DayNightAlpha {
            day: 0.0,
            night: 1.0,
        }
    }
}

/// Arc from horizon to horizon for `t` in `[0, 1]`, peaking overhead.
pub fn parabola_position(t: f32) -> Vec3 {
    let x = -ARC_HALF_SPAN + 2.0 * ARC_HALF_SPAN * t;
    let y = ARC_PEAK_HEIGHT - x * x / (2.0 * ARC_HALF_SPAN);
    Vec3::new(x, y, 0.0)
}

pub fn ambient_intensity(alpha: DayNightAlpha) -> f32 {
    DAY_AMBIENT * alpha.day + NIGHT_AMBIENT * alpha.night
}

/// Linear-space blend of the day and night skies.
pub fn sky_color(alpha: DayNightAlpha) -> Color {
    let day = hex_color(DAY_SKY_COLOR).to_linear();
    let night = hex_color(NIGHT_SKY_COLOR).to_linear();
    Color::linear_rgb(
        day.red * alpha.day + night.red * alpha.night,
        day.green * alpha.day + night.green * alpha.night,
        day.blue * alpha.day + night.blue * alpha.night,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

impl BodyState {
    fn hidden() -> Self {
        Self {
            position: Vec3::new(0.0, HIDDEN_BODY_Y, 0.0),
            intensity: 0.0,
            visible: false,
        }
    }
}

/// The sun crosses the sky in the first half of the cycle, the moon in the second.
pub fn body_state(body: CelestialBody, phase: f32, alpha: DayNightAlpha) -> BodyState {
    let half = phase * 2.0;
    match body {
        CelestialBody::Sun if half < 1.0 => BodyState {
            position: parabola_position(half),
            intensity: SUN_INTENSITY * alpha.day,
            visible: true,
        },
        CelestialBody::Moon if half >= 1.0 => BodyState {
            position: parabola_position(half - 1.0),
            intensity: MOON_INTENSITY * alpha.night,
            visible: true,
        },
        _ => BodyState::hidden(),
    }
}

pub fn day_night_system(
    time: Res<Time>,
    mut cycle: ResMut<DayNightCycle>,
    mut night_alpha: ResMut<NightAlpha>,
    mut ambient: ResMut<AmbientLight>,
    mut clear_color: ResMut<ClearColor>,
    mut bodies: Query<(&CelestialBody, &mut Transform, &mut DirectionalLight)>,
) {
    cycle.advance(time.delta_secs());
    let phase = cycle.phase();
    let alpha = day_night_alpha(phase);

    ambient.brightness = ambient_intensity(alpha) * AMBIENT_BRIGHTNESS_PER_UNIT;
    clear_color.0 = sky_color(alpha);
    night_alpha.0 = alpha.night;

    for (body, mut transform, mut light) in &mut bodies {
        let state = body_state(*body, phase, alpha);
        if state.visible {
            *transform = Transform::from_translation(state.position).looking_at(Vec3::ZERO, Vec3::Y);
        } else {
            transform.translation = state.position;
        }
        light.illuminance = state.intensity * LUX_PER_DIRECTIONAL_UNIT;
    }
}

/// P pauses the cycle, N jumps to midnight, M jumps to noon.
pub fn day_night_keyboard_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut cycle: ResMut<DayNightCycle>,
) {
    if keyboard.just_pressed(KeyCode::KeyP) {
        cycle.toggle_pause();
        info!("Day/night cycle paused: {}", cycle.paused);
    }
    if keyboard.just_pressed(KeyCode::KeyN) {
        cycle.set_phase(0.875);
        info!("Skipped to night");
    }
    if keyboard.just_pressed(KeyCode::KeyM) {
        cycle.set_phase(0.375);
        info!("Skipped to noon");
    }
}
