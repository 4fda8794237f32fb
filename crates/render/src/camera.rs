use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking from `position` at `target`.
///
/// Shared read-only by every drawable during a frame. Fields are public so the
/// viewport can follow window resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub fov_degrees: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            width: 800.0,
            height: 600.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 4.0, 20.0),
            target: Vec3::ZERO,
        }
    }
}

impl Camera {
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Pixel-space projection for screen overlays, origin at bottom-left.
    pub fn screen_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, 0.0, self.height, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert!(cam.position.y > 0.0);
        assert!((cam.aspect() - 4.0 / 3.0).abs() < 1e-6);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let cam = Camera::default();
        let clip = cam.view_projection() * cam.target.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn screen_projection_maps_corners() {
        let cam = Camera::default();
        let p = cam.screen_projection();
        let top_right = p.project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert!((top_right.x - 1.0).abs() < 1e-6);
        assert!((top_right.y - 1.0).abs() < 1e-6);
        let origin = p.project_point3(Vec3::ZERO);
        assert!((origin.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport(1600, 0);
        assert_eq!(cam.height, 1.0);
        cam.set_viewport(1600, 800);
        assert_eq!(cam.aspect(), 2.0);
    }
}
