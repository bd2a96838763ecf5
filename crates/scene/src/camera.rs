use glam::{Mat4, Vec3};

/// Fixed perspective camera looking down -Z.
///
/// Only the aspect ratio changes after construction (on resize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 100.0, 200.0),
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn with_aspect(aspect: f32) -> Self {
        let mut cam = Self::default();
        cam.set_aspect(aspect);
        cam
    }

    /// Ignores non-finite or non-positive ratios.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 100.0, 200.0));
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn point_in_front_projects_inside_clip_volume() {
        let cam = PerspectiveCamera::default();
        let clip = cam.view_projection() * Vec3::new(0.0, 100.0, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn set_aspect_rejects_garbage() {
        let mut cam = PerspectiveCamera::with_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect, 2.0);
    }
}
