// orbit.rs — drag-to-look controller (yaw / pitch accumulation)

use crate::config::OrbitConfig;
use glam::Quat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub dead_zone: f32,
    pub degrees_per_pixel: f32,
    pub pitch_limit: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self::from(&OrbitConfig::default())
    }
}

impl From<&OrbitConfig> for OrbitSettings {
    fn from(c: &OrbitConfig) -> Self {
        Self {
            dead_zone: c.dead_zone,
            degrees_per_pixel: c.degrees_per_pixel,
            pitch_limit: c.pitch_limit.abs(),
        }
    }
}

/// Accumulated look direction driven by pointer drags.
///
/// Each axis keeps its own reference coordinate. The reference only moves
/// once that axis has travelled past the dead zone, so slow motion is not
/// lost: it stays pending until the total delta crosses the threshold.
#[derive(Debug, Clone)]
pub struct OrbitController {
    settings: OrbitSettings,
    yaw: f32,
    pitch: f32,
    last_x: f32,
    last_y: f32,
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            yaw: 0.0,
            pitch: 0.0,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    /// Yaw in degrees. Unbounded; wraps naturally through the rotation.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, always within `[-pitch_limit, pitch_limit]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn reference(&self) -> (f32, f32) {
        (self.last_x, self.last_y)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.last_x = x;
        self.last_y = y;
    }

    /// Returns true if yaw or pitch moved.
    pub fn pointer_drag(&mut self, x: f32, y: f32) -> bool {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        let mut changed = false;

        if dx.abs() > self.settings.dead_zone {
            self.yaw -= dx * self.settings.degrees_per_pixel;
            self.last_x = x;
            changed = true;
        }
        if dy.abs() > self.settings.dead_zone {
            self.pitch += dy * self.settings.degrees_per_pixel;
            self.last_y = y;
            changed = true;
        }

        let limit = self.settings.pitch_limit;
        self.pitch = self.pitch.clamp(-limit, limit);
        changed
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Camera orientation: yaw about the vertical axis is the outer (parent)
    /// rotation, pitch about the camera's own horizontal axis is the inner one.
    ///
    /// Positive yaw turns the view right; positive pitch tilts it up.
    pub fn rotation(&self) -> Quat {
        let yaw = Quat::from_rotation_y(-self.yaw.to_radians());
        let pitch = Quat::from_rotation_x(self.pitch.to_radians());
        yaw * pitch
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn pressed_at(x: f32, y: f32) -> OrbitController {
        let mut orbit = OrbitController::default();
        orbit.pointer_down(x, y);
        orbit
    }

    #[test]
    fn drag_past_dead_zone_turns_yaw() {
        let mut orbit = pressed_at(100.0, 100.0);
        assert!(orbit.pointer_drag(105.0, 100.0));
        assert_relative_eq!(orbit.yaw(), -0.5);
        assert_eq!(orbit.reference().0, 105.0);
        assert_eq!(orbit.pitch(), 0.0);
    }

    #[test]
    fn drag_inside_dead_zone_is_ignored() {
        let mut orbit = pressed_at(100.0, 100.0);
        assert!(!orbit.pointer_drag(102.0, 100.0));
        assert_eq!(orbit.yaw(), 0.0);
        assert_eq!(orbit.reference(), (100.0, 100.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut orbit = pressed_at(0.0, 0.0);
        assert!(!orbit.pointer_drag(3.0, -3.0));
        assert_eq!((orbit.yaw(), orbit.pitch()), (0.0, 0.0));
    }

    #[test]
    fn slow_motion_accumulates_until_threshold() {
        let mut orbit = pressed_at(0.0, 0.0);
        orbit.pointer_drag(2.0, 0.0);
        orbit.pointer_drag(3.0, 0.0);
        assert_eq!(orbit.yaw(), 0.0);
        orbit.pointer_drag(4.0, 0.0);
        assert_relative_eq!(orbit.yaw(), -0.4);
        assert_eq!(orbit.reference().0, 4.0);
    }

    #[test]
    fn axes_track_their_reference_independently() {
        let mut orbit = pressed_at(0.0, 0.0);
        orbit.pointer_drag(10.0, 2.0);
        assert_relative_eq!(orbit.yaw(), -1.0);
        assert_eq!(orbit.pitch(), 0.0);
        assert_eq!(orbit.reference(), (10.0, 0.0));

        orbit.pointer_drag(10.0, 5.0);
        assert_relative_eq!(orbit.pitch(), 0.5);
        assert_eq!(orbit.reference(), (10.0, 5.0));
    }

    #[test]
    fn pitch_stays_clamped_for_any_sequence() {
        let mut orbit = pressed_at(0.0, 0.0);
        let moves = [5000.0, -200.0, 12000.0, -40000.0, 7.0, 30000.0];
        let mut y = 0.0;
        for dy in moves {
            y += dy;
            orbit.pointer_drag(0.0, y);
            assert!((-90.0..=90.0).contains(&orbit.pitch()), "pitch {}", orbit.pitch());
        }
        assert_eq!(orbit.pitch(), 90.0);
    }

    #[test]
    fn pointer_down_resets_reference_only() {
        let mut orbit = pressed_at(0.0, 0.0);
        orbit.pointer_drag(50.0, 0.0);
        orbit.pointer_down(500.0, 500.0);
        assert_relative_eq!(orbit.yaw(), -5.0);
        assert_eq!(orbit.reference(), (500.0, 500.0));
        assert!(!orbit.pointer_drag(501.0, 501.0));
    }

    #[test]
    fn reset_returns_to_forward() {
        let mut orbit = pressed_at(0.0, 0.0);
        orbit.pointer_drag(40.0, 40.0);
        orbit.reset();
        assert_eq!((orbit.yaw(), orbit.pitch()), (0.0, 0.0));
        assert_eq!(orbit.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn dragging_right_turns_view_left() {
        let mut orbit = pressed_at(0.0, 0.0);
        orbit.pointer_drag(900.0, 0.0);
        let forward = orbit.rotation() * Vec3::NEG_Z;
        assert_relative_eq!(forward.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_relative_to_yawed_frame() {
        let mut orbit = pressed_at(0.0, 0.0);
        // yaw -90 (view turned left), then look up 45
        orbit.pointer_drag(900.0, 450.0);
        let forward = orbit.rotation() * Vec3::NEG_Z;
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(forward.x, -h, epsilon = 1e-5);
        assert_relative_eq!(forward.y, h, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-5);
        // the horizon stays level: camera right has no vertical component
        let right = orbit.rotation() * Vec3::X;
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-5);
    }
}
