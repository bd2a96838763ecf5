use serde::{Deserialize, Serialize};
use skyflight_common::Color;

/// Orthographic frustum and map resolution of a directional shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            left: -400.0,
            right: 400.0,
            top: 400.0,
            bottom: -400.0,
            near: 1.0,
            far: 1000.0,
            map_size: 2048,
        }
    }
}

/// Light sources. Position comes from the owning node's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Sky-to-ground gradient ambient light.
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    /// Parallel rays shining from the node position toward the origin.
    Directional {
        color: Color,
        intensity: f32,
        cast_shadow: bool,
        shadow: ShadowCamera,
    },
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match self {
            Self::Hemisphere { intensity, .. } | Self::Directional { intensity, .. } => *intensity,
        }
    }
}
