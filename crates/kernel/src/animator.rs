use glam::Vec2;
use serde::{Deserialize, Serialize};
use skyflight_input::PointerPosition;
use std::f32::consts::TAU;

use crate::config::{AngleMode, AnimatorConfig};

/// Animated values written into the scene every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatedState {
    /// Airplane position in the XY plane.
    pub plane_position: Vec2,
    /// Propeller rotation about its local X axis.
    pub propeller_angle: f32,
    /// Sea rotation about Z.
    pub sea_angle: f32,
    /// Cloud ring rotation about Z.
    pub sky_angle: f32,
}

impl Default for AnimatedState {
    fn default() -> Self {
        Self {
            plane_position: Vec2::new(0.0, 100.0),
            propeller_angle: 0.0,
            sea_angle: 0.0,
            sky_angle: 0.0,
        }
    }
}

/// Maps pointer input to object placement and advances the rotations.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    config: AnimatorConfig,
}

impl Animator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.config.angle_mode = mode;
    }

    /// Where the airplane goes for a given pointer position.
    pub fn target_position(&self, pointer: PointerPosition) -> Vec2 {
        Vec2::new(
            self.config.horizontal.apply(pointer.x),
            self.config.vertical.apply(pointer.y),
        )
    }

    /// Produce the next frame's state from the pointer and the previous state.
    pub fn advance(&self, pointer: PointerPosition, prev: &AnimatedState) -> AnimatedState {
        let next = AnimatedState {
            plane_position: self.target_position(pointer),
            propeller_angle: self.turn(prev.propeller_angle, self.config.propeller_step),
            sea_angle: self.turn(prev.sea_angle, self.config.sea_step),
            sky_angle: self.turn(prev.sky_angle, self.config.sky_step),
        };
        tracing::trace!(
            x = next.plane_position.x,
            y = next.plane_position.y,
            propeller = next.propeller_angle,
            "animator step"
        );
        next
    }

    fn turn(&self, angle: f32, step: f32) -> f32 {
        let next = angle + step;
        match self.config.angle_mode {
            AngleMode::Unbounded => next,
            AngleMode::Wrapped => {
                // rem_euclid rounds tiny negative sums up to exactly TAU.
                let r = next.rem_euclid(TAU);
                if r >= TAU { 0.0 } else { r }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(animator: &Animator, pointer: PointerPosition, frames: usize) -> AnimatedState {
        let mut state = AnimatedState::default();
        for _ in 0..frames {
            state = animator.advance(pointer, &state);
        }
        state
    }

    #[test]
    fn centered_pointer_hits_range_midpoints() {
        let a = Animator::default();
        let p = a.target_position(PointerPosition::CENTER);
        assert_eq!(p, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn pointer_extremes_clamp_to_target_bounds() {
        let a = Animator::default();
        assert_eq!(
            a.target_position(PointerPosition::new(-1.0, 1.0)),
            Vec2::new(-100.0, 175.0)
        );
        assert_eq!(
            a.target_position(PointerPosition::new(1.0, -1.0)),
            Vec2::new(100.0, 25.0)
        );
    }

    #[test]
    fn position_snaps_without_easing() {
        let a = Animator::default();
        let start = AnimatedState::default();
        let next = a.advance(PointerPosition::new(0.75, 0.75), &start);
        assert_eq!(next.plane_position, Vec2::new(100.0, 175.0));
    }

    #[test]
    fn propeller_accumulates_per_frame() {
        let a = Animator::default();
        let frames = 100;
        let s = run(&a, PointerPosition::CENTER, frames);
        assert!((s.propeller_angle - frames as f32 * 0.3).abs() < 1e-3);
        assert!((s.sea_angle - frames as f32 * 0.005).abs() < 1e-4);
        assert!((s.sky_angle - frames as f32 * 0.01).abs() < 1e-4);
        assert_eq!(s.plane_position, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn unbounded_mode_grows_past_full_turn() {
        let a = Animator::default();
        let s = run(&a, PointerPosition::CENTER, 50);
        assert!(s.propeller_angle > TAU);
    }

    #[test]
    fn wrapped_mode_stays_within_full_turn() {
        let a = Animator::new(AnimatorConfig {
            angle_mode: AngleMode::Wrapped,
            ..AnimatorConfig::default()
        });
        let frames = 1000;
        let s = run(&a, PointerPosition::CENTER, frames);
        for angle in [s.propeller_angle, s.sea_angle, s.sky_angle] {
            assert!((0.0..TAU).contains(&angle));
        }
        let expected = (frames as f32 * 0.3).rem_euclid(TAU);
        let diff = (s.propeller_angle - expected).abs();
        assert!(diff < 1e-2 || (TAU - diff) < 1e-2);
    }

    #[test]
    fn wrapped_mode_handles_negative_steps() {
        let a = Animator::new(AnimatorConfig {
            sky_step: -1e-8,
            sea_step: -0.005,
            propeller_step: -7.0,
            angle_mode: AngleMode::Wrapped,
            ..AnimatorConfig::default()
        });
        let mut s = a.advance(PointerPosition::CENTER, &AnimatedState::default());
        for angle in [s.propeller_angle, s.sea_angle, s.sky_angle] {
            assert!((0.0..TAU).contains(&angle), "angle {angle} escaped [0, TAU)");
        }
        for _ in 0..500 {
            s = a.advance(PointerPosition::CENTER, &s);
            for angle in [s.propeller_angle, s.sea_angle, s.sky_angle] {
                assert!((0.0..TAU).contains(&angle), "angle {angle} escaped [0, TAU)");
            }
        }
    }

    #[test]
    fn unbounded_mode_follows_negative_steps() {
        let a = Animator::new(AnimatorConfig {
            sea_step: -0.5,
            ..AnimatorConfig::default()
        });
        let s = run(&a, PointerPosition::CENTER, 20);
        assert!((s.sea_angle + 10.0).abs() < 1e-4);
    }

    #[test]
    fn non_finite_pointer_lands_inside_bounds() {
        let a = Animator::default();
        let nan = a.target_position(PointerPosition::new(f32::NAN, f32::NAN));
        assert_eq!(nan, Vec2::new(-100.0, 25.0));
        let inf = a.target_position(PointerPosition::new(f32::INFINITY, f32::NEG_INFINITY));
        assert_eq!(inf, Vec2::new(100.0, 25.0));
    }

    #[test]
    fn advance_is_deterministic() {
        let a = Animator::default();
        let prev = AnimatedState::default();
        let p = PointerPosition::new(0.3, -0.2);
        assert_eq!(a.advance(p, &prev), a.advance(p, &prev));
    }
}
