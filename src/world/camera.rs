use glam::Vec3;
use std::f32::consts::PI;

/// Viewer camera plus the orbit target it looks at.
///
/// Orbit input (mouse drag, zoom) is host scaffolding; the movement core
/// only ever reads the view direction and rigidly drags both points after
/// the character, so the user's orbit angle and distance survive every
/// frame untouched.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub pos: Vec3,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn new(pos: Vec3, target: Vec3) -> OrbitCamera {
        OrbitCamera { pos, target }
    }

    /// Unit vector from the eye towards the orbit target.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.pos).normalize_or_zero()
    }

    /// Yaw (about +Y) that faces a model at `point` away from the camera,
    /// i.e. the heading the character should settle on when walking
    /// straight forward.
    #[inline]
    pub fn yaw_towards(&self, point: Vec3) -> f32 {
        (self.pos.x - point.x).atan2(self.pos.z - point.z) + PI
    }

    /// Rigid follow: shift the eye on the ground plane only, keeping the
    /// eye height so a falling character does not drag the view down.
    pub fn follow(&mut self, delta: Vec3) {
        self.pos.x += delta.x;
        self.pos.z += delta.z;
    }

    pub fn look_at(&mut self, point: Vec3) {
        self.target = point;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn forward_is_unit_towards_target() {
        let cam = OrbitCamera::new(Vec3::new(0.0, 100.0, 500.0), Vec3::new(0.0, 100.0, 0.0));
        let f = cam.forward();
        assert_abs_diff_eq!(f.length(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn yaw_faces_away_from_camera() {
        // camera due +z of the model → facing away is yaw π + 0 = π
        let cam = OrbitCamera::new(Vec3::new(0.0, 100.0, 500.0), Vec3::ZERO);
        assert_abs_diff_eq!(cam.yaw_towards(Vec3::ZERO), PI, epsilon = 1e-6);

        // camera due +x of the model → atan2(x, z) = π/2, away = 3π/2
        let cam = OrbitCamera::new(Vec3::new(500.0, 100.0, 0.0), Vec3::ZERO);
        assert_abs_diff_eq!(cam.yaw_towards(Vec3::ZERO), PI / 2.0 + PI, epsilon = 1e-6);
    }

    #[test]
    fn follow_keeps_eye_height() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 100.0, 500.0), Vec3::ZERO);
        cam.follow(Vec3::new(10.0, -50.0, 4.0));
        assert_eq!(cam.pos, Vec3::new(10.0, 100.0, 504.0));
    }
}
