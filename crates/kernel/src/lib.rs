//! Animation kernel: pointer-driven placement and fixed-rate rotations.
//!
//! # Invariants
//! - `Animator::advance` is pure with respect to its inputs.
//! - Placement snaps to the remapped pointer every frame; no easing.
//! - Angles accumulate without bound unless `AngleMode::Wrapped` is chosen.

pub mod animator;
pub mod config;
pub mod remap;

pub use animator::{AnimatedState, Animator};
pub use config::{AngleMode, AnimatorConfig, ConfigError};
pub use remap::{RangeMap, remap};
