//! Shared types for the skyflight workspace.

mod types;

pub use types::{Color, Palette, Transform};
