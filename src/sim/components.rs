use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::world::Capsule;

/// Facing yaw about +Y, radians.  Zero faces +z (towards a camera parked on
/// the +z axis looking in).
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// The character's collision proxy.  Authoritative for position: the visual
/// transform is re-derived from it after every correction.
#[derive(Debug, Clone, Copy)]
pub struct CapsuleCollider(pub Capsule);

impl CapsuleCollider {
    /// Model origin the visuals track: capsule centre, measured from the
    /// bottom sphere centre so the feet stay planted on the contact point.
    pub fn anchor(&self) -> Vec3 {
        let c = &self.0;
        Vec3::new(
            c.start.x,
            c.start.y - c.radius + c.height() * 0.5,
            c.start.z,
        )
    }
}

/// Where the renderable model currently sits; derived, never integrated.
#[derive(Debug, Clone, Copy)]
pub struct VisualPos(pub Vec3);

/// Normalise an angle into (-π, π].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let mut a = a.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Step `current` towards `target` along the shorter arc, moving at most
/// `max_step` radians.  Never snaps past the cap in a single call.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= max_step {
        wrap_angle(target)
    } else {
        wrap_angle(current + max_step * diff.signum())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn anchor_sits_at_capsule_centre() {
        let collider = CapsuleCollider(Capsule::upright(180.0, 60.0));
        assert_eq!(collider.anchor(), Vec3::new(0.0, 90.0, 0.0));

        let mut sunk = collider;
        sunk.0.translate(Vec3::new(5.0, -20.0, 3.0));
        assert_eq!(sunk.anchor(), Vec3::new(5.0, 70.0, 3.0));
    }

    #[test]
    fn rotation_step_is_capped() {
        let step = 5.0_f32.to_radians();
        let turned = rotate_towards(0.0, PI / 2.0, step);
        assert_abs_diff_eq!(turned, step, epsilon = 1e-6);

        // within the cap: lands exactly on target
        let close = rotate_towards(0.0, 0.5 * step, step);
        assert_abs_diff_eq!(close, 0.5 * step, epsilon = 1e-6);
    }

    #[test]
    fn rotation_takes_shorter_arc() {
        let step = 5.0_f32.to_radians();
        // +170° to -170°: shorter arc is through 180°, i.e. increasing
        let from = 170.0_f32.to_radians();
        let to = -170.0_f32.to_radians();
        let turned = rotate_towards(from, to, step);
        assert_abs_diff_eq!(turned, 175.0_f32.to_radians(), epsilon = 1e-5);

        // and wraps through the seam on the next steps
        let turned = rotate_towards(turned, to, step);
        assert_abs_diff_eq!(turned.abs(), PI, epsilon = 1e-5);
    }
}
