use serde::{Deserialize, Serialize};
use skyflight_common::Color;

use crate::graph::SceneError;

/// Primitive shape of a mesh, in local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Axis-aligned box centered on the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Cylinder along local Y, centered on the origin.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => {
                if !(positive(width) && positive(height) && positive(depth)) {
                    return Err(SceneError::InvalidGeometry(format!(
                        "box dimensions must be positive, got {width}x{height}x{depth}"
                    )));
                }
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
            } => {
                let radius_ok = |r: f32| r.is_finite() && r >= 0.0;
                if !radius_ok(radius_top)
                    || !radius_ok(radius_bottom)
                    || radius_top.max(radius_bottom) <= 0.0
                {
                    return Err(SceneError::InvalidGeometry(format!(
                        "cylinder radii must be non-negative and not both zero, got {radius_top}/{radius_bottom}"
                    )));
                }
                if !positive(height) {
                    return Err(SceneError::InvalidGeometry(format!(
                        "cylinder height must be positive, got {height}"
                    )));
                }
                if radial_segments < 3 || height_segments < 1 {
                    return Err(SceneError::InvalidGeometry(format!(
                        "cylinder needs >= 3 radial and >= 1 height segments, got {radial_segments}/{height_segments}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Surface appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    /// 1.0 is opaque.
    pub opacity: f32,
    /// One normal per face instead of smoothed normals.
    pub flat_shading: bool,
}

impl Material {
    pub fn flat(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            flat_shading: true,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Drawable payload of a mesh node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Casts and receives shadows.
    pub fn shadowed(mut self) -> Self {
        self.cast_shadow = true;
        self.receive_shadow = true;
        self
    }
}
