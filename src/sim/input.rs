//! Held-key state.
//!
//! Key events only ever mutate this set; all movement consequences are
//! re-derived from it once per frame, so event delivery can never race the
//! frame update.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::collections::HashMap;

bitflags! {
    /// Movement keys the core cares about.  Anything else on the keyboard
    /// belongs to the host and is ignored here.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MoveKeys: u8 {
        const FORWARD = 0x01; // w
        const BACK    = 0x02; // s
        const LEFT    = 0x04; // a
        const RIGHT   = 0x08; // d
        const FAST    = 0x10; // shift
    }
}

impl MoveKeys {
    pub const DIRECTIONAL: MoveKeys = MoveKeys::FORWARD
        .union(MoveKeys::BACK)
        .union(MoveKeys::LEFT)
        .union(MoveKeys::RIGHT);
}

static BY_ID: Lazy<HashMap<&'static str, MoveKeys>> = Lazy::new(|| {
    HashMap::from([
        ("w", MoveKeys::FORWARD),
        ("s", MoveKeys::BACK),
        ("a", MoveKeys::LEFT),
        ("d", MoveKeys::RIGHT),
        ("shift", MoveKeys::FAST),
    ])
});

/// Which movement keys are currently held, keyed by the host's lower-cased
/// key identifiers.
#[derive(Default, Clone, Copy, Debug)]
pub struct InputState {
    held: MoveKeys,
}

impl InputState {
    pub fn new() -> InputState {
        InputState::default()
    }

    /// Record a key transition.  Identifiers are matched case-insensitively;
    /// unknown keys are ignored.
    pub fn set(&mut self, id: &str, held: bool) {
        let flag = match BY_ID.get(id) {
            Some(f) => *f,
            None => match BY_ID.get(id.to_ascii_lowercase().as_str()) {
                Some(f) => *f,
                None => return,
            },
        };
        self.held.set(flag, held);
    }

    #[inline]
    pub fn press(&mut self, id: &str) {
        self.set(id, true);
    }

    #[inline]
    pub fn release(&mut self, id: &str) {
        self.set(id, false);
    }

    #[inline]
    pub fn held(&self) -> MoveKeys {
        self.held
    }

    /// Any of w/a/s/d down?
    #[inline]
    pub fn any_direction(&self) -> bool {
        self.held.intersects(MoveKeys::DIRECTIONAL)
    }

    /// Modifier for the run gait.
    #[inline]
    pub fn fast(&self) -> bool {
        self.held.contains(MoveKeys::FAST)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
