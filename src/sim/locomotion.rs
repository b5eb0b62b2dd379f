//! Ground-speed and fall integration.
//!
//! Units are model-space units per second for speed; the fall channel uses
//! the same frame-rate-coupled accumulation as the speed ramp (one increment
//! per frame, not per second).

use super::input::InputState;

/* ----------------------------------------------------------------- */
/*  Locomotion constants (model units)                               */
/* ----------------------------------------------------------------- */
pub const WALK_MAX_SPEED: f32 = 80.0;
pub const RUN_MAX_SPEED: f32 = 350.0;
pub const GROUND_ACCELERATION: f32 = 3.0;

/// The tri-state the held keys classify into; every per-frame consumer
/// (speed targets, clip selection) branches on this one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gait {
    Idle,
    Walk,
    Run,
}

impl Gait {
    /// Single classification point: any direction key makes us move, the
    /// modifier upgrades the move to a run.
    pub fn classify(input: &InputState) -> Gait {
        if !input.any_direction() {
            Gait::Idle
        } else if input.fast() {
            Gait::Run
        } else {
            Gait::Walk
        }
    }

    /// Name of the animation clip that plays this gait.
    pub fn clip_name(self) -> &'static str {
        match self {
            Gait::Idle => "Idle",
            Gait::Walk => "Walk",
            Gait::Run => "Run",
        }
    }
}

/// Per-character movement scalars, advanced once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionState {
    pub speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub falling_acceleration: f32,
    pub falling_speed: f32,
    pub on_ground: bool,
}

impl LocomotionState {
    /// One frame of integration.  Pure: the caller decides what to do with
    /// the returned value, which keeps the ramp rules testable in isolation.
    ///
    /// Idle zeroes the speed outright (no decay) — deliberate, the ramp-down
    /// branch only shapes the approach to a *lower* positive target.  Above
    /// the target the speed sheds 2× acceleration per frame, so a walk
    /// settles oscillating just around its maximum and a run released into a
    /// walk bleeds off quickly.
    #[must_use]
    pub fn advanced(mut self, gait: Gait) -> LocomotionState {
        match gait {
            Gait::Idle => {
                self.max_speed = 0.0;
                self.acceleration = 0.0;
                self.speed = 0.0;
            }
            Gait::Walk => {
                self.max_speed = WALK_MAX_SPEED;
                self.acceleration = GROUND_ACCELERATION;
            }
            Gait::Run => {
                self.max_speed = RUN_MAX_SPEED;
                self.acceleration = GROUND_ACCELERATION;
            }
        }

        if self.speed < self.max_speed {
            self.speed += self.acceleration;
        } else {
            self.speed -= self.acceleration * 2.0;
        }

        if self.on_ground {
            self.falling_acceleration = 0.0;
            self.falling_speed = 0.0;
        } else {
            self.falling_acceleration += 1.0;
            self.falling_speed += self.falling_acceleration * self.falling_acceleration;
        }
        self
    }

    /// Record this frame's ground-contact outcome.  Landing resets the fall
    /// channel in the same frame the contact arrives.
    pub fn touch_ground(&mut self, grounded: bool) {
        self.on_ground = grounded;
        if grounded {
            self.falling_acceleration = 0.0;
            self.falling_speed = 0.0;
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn keys(ids: &[&str]) -> InputState {
        let mut input = InputState::new();
        for id in ids {
            input.press(id);
        }
        input
    }

    #[test]
    fn classify_tri_state() {
        assert_eq!(Gait::classify(&keys(&[])), Gait::Idle);
        assert_eq!(Gait::classify(&keys(&["shift"])), Gait::Idle);
        assert_eq!(Gait::classify(&keys(&["w"])), Gait::Walk);
        assert_eq!(Gait::classify(&keys(&["a", "s"])), Gait::Walk);
        assert_eq!(Gait::classify(&keys(&["w", "shift"])), Gait::Run);
    }

    #[test]
    fn walk_ramps_then_oscillates_around_max() {
        let mut loco = LocomotionState {
            on_ground: true,
            ..Default::default()
        };
        // strict +3 ramp while below the cap
        for frame in 1..=26 {
            loco = loco.advanced(Gait::Walk);
            assert_abs_diff_eq!(loco.speed, (frame as f32) * 3.0);
        }
        // 78 → 81 overshoots, then the 2× release kicks in
        loco = loco.advanced(Gait::Walk);
        assert_abs_diff_eq!(loco.speed, 81.0);
        loco = loco.advanced(Gait::Walk);
        assert_abs_diff_eq!(loco.speed, 75.0);
        // bounded forever after: never runs away from the cap
        for _ in 0..100 {
            loco = loco.advanced(Gait::Walk);
            assert!(loco.speed > 70.0 && loco.speed < 85.0);
        }
    }

    #[test]
    fn idle_zeroes_speed_immediately() {
        let mut loco = LocomotionState {
            speed: 350.0,
            on_ground: true,
            ..Default::default()
        };
        loco = loco.advanced(Gait::Idle);
        assert_abs_diff_eq!(loco.speed, 0.0);
        // and stays pinned at zero, no negative oscillation
        for _ in 0..10 {
            loco = loco.advanced(Gait::Idle);
            assert_abs_diff_eq!(loco.speed, 0.0);
        }
    }

    #[test]
    fn fall_accumulates_squares_of_frame_count() {
        let mut loco = LocomotionState::default(); // airborne
        for n in 1..=10 {
            loco = loco.advanced(Gait::Idle);
            assert_abs_diff_eq!(loco.falling_acceleration, n as f32);
        }
        // Σ i² for i = 1..10
        assert_abs_diff_eq!(loco.falling_speed, 385.0);
    }

    #[test]
    fn landing_resets_fall_channel_same_frame() {
        let mut loco = LocomotionState::default();
        for _ in 0..30 {
            loco = loco.advanced(Gait::Walk);
        }
        assert!(loco.falling_speed > 0.0);

        loco.touch_ground(true);
        assert_abs_diff_eq!(loco.falling_acceleration, 0.0);
        assert_abs_diff_eq!(loco.falling_speed, 0.0);
        assert!(loco.on_ground);

        // leaving the ground does not clear anything retroactively
        loco.touch_ground(false);
        assert_abs_diff_eq!(loco.falling_speed, 0.0);
        loco = loco.advanced(Gait::Walk);
        assert_abs_diff_eq!(loco.falling_acceleration, 1.0);
        assert_abs_diff_eq!(loco.falling_speed, 1.0);
    }
}
