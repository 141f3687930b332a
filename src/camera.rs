// camera.rs — perspective camera at the centre of the panorama sphere

use crate::config::CameraConfig;
use glam::{Mat4, Quat};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view, degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, self.near, self.far)
    }

    /// The camera never translates, so the view matrix is just the inverse
    /// of the orientation.
    pub fn view_projection(&self, aspect: f32, rotation: Quat) -> Mat4 {
        self.projection(aspect) * Mat4::from_quat(rotation.inverse())
    }
}

impl From<&CameraConfig> for PerspectiveCamera {
    fn from(c: &CameraConfig) -> Self {
        Self {
            fov_deg: c.fov.clamp(1.0, 179.0),
            near: c.near,
            far: c.far,
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}
