//! Headlight flicker: a slow fade down, then a slow fade back up, at random
//! intervals. Driven by elapsed seconds so it runs the same at any frame rate.

use bevy::prelude::*;
use rand::Rng;

/// Dimmed level a fade-out settles on when it does not go fully dark.
const DIM_LEVEL: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickerPhase {
    Idle,
    FadingOut,
    FadingIn,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct FlickerState {
    pub phase: FlickerPhase,
    pub original_intensity: f32,
    pub current: f32,
    pub next_flicker: f32,
    fade_start: f32,
    fade_duration: f32,
    start_intensity: f32,
    end_intensity: f32,
}

impl FlickerState {
    pub fn new(original_intensity: f32, rng: &mut impl Rng) -> Self {
        Self {
            phase: FlickerPhase::Idle,
            original_intensity,
            current: original_intensity,
            next_flicker: 2.0 + rng.random::<f32>() * 3.0,
            fade_start: 0.0,
            fade_duration: 0.0,
            start_intensity: original_intensity,
            end_intensity: original_intensity,
        }
    }

    /// Advances to `elapsed` seconds and returns the current intensity.
    pub fn update(&mut self, elapsed: f32, rng: &mut impl Rng) -> f32 {
        if self.phase == FlickerPhase::Idle && elapsed > self.next_flicker {
            let target = if rng.random::<f32>() < 0.5 {
                DIM_LEVEL.min(self.original_intensity)
            } else {
                0.0
            };
            self.begin_fade(FlickerPhase::FadingOut, target, elapsed, rng);
        }

        if self.phase == FlickerPhase::Idle {
            return self.current;
        }

        let progress = (elapsed - self.fade_start) / self.fade_duration;
        if progress >= 1.0 {
            self.current = self.end_intensity;
            match self.phase {
                FlickerPhase::FadingOut => {
                    self.begin_fade(FlickerPhase::FadingIn, self.original_intensity, elapsed, rng);
                }
                _ => {
                    self.phase = FlickerPhase::Idle;
                    self.next_flicker = elapsed + 2.0 + rng.random::<f32>() * 3.0;
                }
            }
        } else {
            let progress = progress.max(0.0);
            self.current =
                self.start_intensity + (self.end_intensity - self.start_intensity) * progress;
        }
        self.current
    }

    /// Current output as a fraction of the undimmed intensity.
    pub fn level(&self) -> f32 {
        if self.original_intensity > 0.0 {
            self.current / self.original_intensity
        } else {
            0.0
        }
    }

    fn begin_fade(&mut self, phase: FlickerPhase, target: f32, elapsed: f32, rng: &mut impl Rng) {
        self.phase = phase;
        self.fade_start = elapsed;
        self.fade_duration = 5.0 + rng.random::<f32>() * 5.0;
        self.start_intensity = self.current;
        self.end_intensity = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::random::CityRng;

    #[test]
    fn starts_idle_at_full_intensity() {
        let mut rng = CityRng::from_seed(3).0;
        let flicker = FlickerState::new(0.8, &mut rng);
        assert_eq!(flicker.phase, FlickerPhase::Idle);
        assert_eq!(flicker.current, 0.8);
        assert!((2.0..5.0).contains(&flicker.next_flicker));
        assert_eq!(flicker.level(), 1.0);
    }

    #[test]
    fn stays_idle_until_the_scheduled_flicker() {
        let mut rng = CityRng::from_seed(3).0;
        let mut flicker = FlickerState::new(0.8, &mut rng);
        let before = flicker.next_flicker - 0.01;
        assert_eq!(flicker.update(before, &mut rng), 0.8);
        assert_eq!(flicker.phase, FlickerPhase::Idle);
    }

    #[test]
    fn full_cycle_dims_then_recovers() {
        let mut rng = CityRng::from_seed(11).0;
        let mut flicker = FlickerState::new(0.8, &mut rng);
        let start = flicker.next_flicker + 0.01;
        flicker.update(start, &mut rng);
        assert_eq!(flicker.phase, FlickerPhase::FadingOut);

        let mut t = start;
        let mut lowest = f32::MAX;
        while flicker.phase != FlickerPhase::FadingIn {
            t += 0.1;
            lowest = lowest.min(flicker.update(t, &mut rng));
        }
        assert!(lowest == 0.0 || (lowest - 0.3).abs() < 1e-6);

        while flicker.phase != FlickerPhase::Idle {
            t += 0.1;
            flicker.update(t, &mut rng);
        }
        assert_eq!(flicker.current, 0.8);
        assert!(flicker.next_flicker >= t + 2.0);
    }

    #[test]
    fn output_stays_between_zero_and_original() {
        let mut rng = CityRng::from_seed(2077).0;
        let mut flicker = FlickerState::new(0.8, &mut rng);
        for frame in 0..60 * 120 {
            let current = flicker.update(frame as f32 / 60.0, &mut rng);
            assert!((0.0..=0.8).contains(&current), "frame {frame}: {current}");
        }
    }
}
