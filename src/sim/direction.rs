//! Facing-offset resolution: which way the held keys point, relative to the
//! camera's forward axis.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::input::{InputState, MoveKeys};

/// Priority-ordered rule table, evaluated top-down; the first rule whose
/// keys are all held wins.  Two-key chords sit above their single-key
/// prefixes so `w+a` is not swallowed by the plain `w` rule.
const RULES: [(MoveKeys, f32); 8] = [
    (MoveKeys::FORWARD.union(MoveKeys::LEFT), FRAC_PI_4),
    (MoveKeys::FORWARD.union(MoveKeys::RIGHT), -FRAC_PI_4),
    (MoveKeys::FORWARD, 0.0),
    (MoveKeys::BACK.union(MoveKeys::LEFT), FRAC_PI_4 + FRAC_PI_2),
    (MoveKeys::BACK.union(MoveKeys::RIGHT), -FRAC_PI_4 - FRAC_PI_2),
    (MoveKeys::BACK, PI),
    (MoveKeys::LEFT, FRAC_PI_2),
    (MoveKeys::RIGHT, -FRAC_PI_2),
];

/// Maps the held-key set to an offset angle (radians) around the vertical
/// axis, camera-forward being zero.  When no directional key is held the
/// previous offset is returned, so the character keeps facing the way it
/// last moved.
#[derive(Default, Clone, Copy, Debug)]
pub struct DirectionResolver {
    last: f32,
}

impl DirectionResolver {
    pub fn new() -> DirectionResolver {
        DirectionResolver::default()
    }

    pub fn resolve(&mut self, input: &InputState) -> f32 {
        for (keys, offset) in RULES {
            if input.held().contains(keys) {
                self.last = offset;
                return offset;
            }
        }
        self.last
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn offset_for(keys: &[&str]) -> f32 {
        let mut input = InputState::new();
        for k in keys {
            input.press(k);
        }
        DirectionResolver::new().resolve(&input)
    }

    #[test]
    fn eight_way_table() {
        assert_abs_diff_eq!(offset_for(&["w"]), 0.0);
        assert_abs_diff_eq!(offset_for(&["w", "a"]), FRAC_PI_4);
        assert_abs_diff_eq!(offset_for(&["w", "d"]), -FRAC_PI_4);
        assert_abs_diff_eq!(offset_for(&["s"]), PI);
        assert_abs_diff_eq!(offset_for(&["s", "a"]), FRAC_PI_4 + FRAC_PI_2);
        assert_abs_diff_eq!(offset_for(&["s", "d"]), -FRAC_PI_4 - FRAC_PI_2);
        assert_abs_diff_eq!(offset_for(&["a"]), FRAC_PI_2);
        assert_abs_diff_eq!(offset_for(&["d"]), -FRAC_PI_2);
    }

    #[test]
    fn forward_beats_back_when_both_held() {
        assert_abs_diff_eq!(offset_for(&["w", "s"]), 0.0);
        assert_abs_diff_eq!(offset_for(&["w", "s", "a"]), FRAC_PI_4);
    }

    #[test]
    fn opposed_strafe_resolves_left() {
        // a+d: the left rule sits above the right rule
        assert_abs_diff_eq!(offset_for(&["a", "d"]), FRAC_PI_2);
    }

    #[test]
    fn modifier_alone_is_not_directional() {
        assert_abs_diff_eq!(offset_for(&["shift"]), 0.0);
    }

    #[test]
    fn retains_last_offset_after_release() {
        let mut input = InputState::new();
        let mut resolver = DirectionResolver::new();

        input.press("s");
        assert_abs_diff_eq!(resolver.resolve(&input), PI);

        input.release("s");
        assert_abs_diff_eq!(resolver.resolve(&input), PI);
        // …and keeps retaining it on later idle frames
        assert_abs_diff_eq!(resolver.resolve(&input), PI);

        input.press("d");
        assert_abs_diff_eq!(resolver.resolve(&input), -FRAC_PI_2);
        input.release("d");
        assert_abs_diff_eq!(resolver.resolve(&input), -FRAC_PI_2);
    }
}
