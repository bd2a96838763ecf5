use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
///
/// Rotation is stored as Euler angles in radians, applied in XYZ order, so
/// that animated parts can accumulate an angle on a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    /// Rotation as a quaternion (XYZ Euler order).
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Local matrix: translation * rotation * scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// A 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels in `[0, 1]`, sRGB-encoded.
    pub fn to_rgb(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, alpha]
    }

    /// Channels converted to linear space, for sRGB render targets.
    pub fn to_linear_rgb(self) -> [f32; 3] {
        self.to_rgb().map(srgb_to_linear)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// The flat-shaded palette the scene is painted with.
pub struct Palette;

impl Palette {
    pub const RED: Color = Color(0xf25346);
    pub const WHITE: Color = Color(0xd8d0d1);
    pub const PINK: Color = Color(0x59322e);
    pub const BROWN: Color = Color(0xf5986e);
    pub const DARK_BROWN: Color = Color(0x23190f);
    pub const BLUE: Color = Color(0x68c3c0);
    /// Fog and background.
    pub const SKY: Color = Color(0xf7d9aa);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_applies_scale_then_translation() {
        let t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0)).with_uniform_scale(2.0);
        let p = t.matrix().transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert!((p - Vec3::new(12.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn transform_rotation_about_z() {
        let t = Transform::default().with_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn color_channels() {
        let c = Palette::RED;
        assert_eq!((c.r(), c.g(), c.b()), (0xf2, 0x53, 0x46));
        assert_eq!(Color::WHITE.to_rgb(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_rgba(0.5), [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(c.to_string(), "#f25346");
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Color::BLACK.to_linear_rgb(), [0.0, 0.0, 0.0]);
        let w = Color::WHITE.to_linear_rgb();
        assert!(w.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
