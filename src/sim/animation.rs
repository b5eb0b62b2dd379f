//! Clip playback and gait-driven crossfades.
//!
//! The [`Mixer`] is the playable side: one action per registered clip, each
//! with a play flag, looping clip time and a fade-controlled weight.  The
//! [`AnimationSelector`] sits on top and turns gait changes into exactly one
//! fade-out/fade-in pair per transition.

use std::collections::HashMap;

use super::locomotion::Gait;

/// Crossfade window for gait transitions, in clip-time units (seconds).
pub const CROSSFADE: f32 = 0.5;

/// A named animation clip as decoded from the character pack.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
}

/// Index of an action inside its [`Mixer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionHandle(usize);

/// Linear weight ramp towards `target`, finished when the weight arrives.
#[derive(Clone, Copy, Debug)]
struct Fade {
    target: f32,
    rate: f32, // signed weight units per second
}

#[derive(Debug)]
struct Action {
    clip: Clip,
    time: f32,
    weight: f32,
    playing: bool,
    fade: Option<Fade>,
}

/// Minimal animation mixer: registered clip actions, advanced once per
/// frame with the frame's Δt.
#[derive(Default, Debug)]
pub struct Mixer {
    actions: Vec<Action>,
}

impl Mixer {
    pub fn new() -> Mixer {
        Mixer::default()
    }

    /// Register a playable action for `clip`.  Fresh actions are stopped
    /// and weightless until played/faded in.
    pub fn clip_action(&mut self, clip: Clip) -> ActionHandle {
        self.actions.push(Action {
            clip,
            time: 0.0,
            weight: 0.0,
            playing: false,
            fade: None,
        });
        ActionHandle(self.actions.len() - 1)
    }

    pub fn play(&mut self, h: ActionHandle) {
        self.actions[h.0].playing = true;
    }

    /// Rewind the clip to its first frame.
    pub fn reset(&mut self, h: ActionHandle) {
        self.actions[h.0].time = 0.0;
    }

    /// Ramp the weight from wherever it is up to 1 over `window` seconds.
    pub fn fade_in(&mut self, h: ActionHandle, window: f32) {
        self.schedule_fade(h, 1.0, window);
    }

    /// Ramp the weight down to 0; the action stops when it gets there.
    pub fn fade_out(&mut self, h: ActionHandle, window: f32) {
        self.schedule_fade(h, 0.0, window);
    }

    fn schedule_fade(&mut self, h: ActionHandle, target: f32, window: f32) {
        let action = &mut self.actions[h.0];
        if window <= 0.0 || (action.weight - target).abs() < f32::EPSILON {
            action.weight = target;
            action.fade = None;
            if target == 0.0 {
                action.playing = false;
            }
            return;
        }
        action.fade = Some(Fade {
            target,
            rate: (target - action.weight) / window,
        });
    }

    /// Step all clip times and fades by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for action in &mut self.actions {
            if action.playing && action.clip.duration > 0.0 {
                action.time = (action.time + dt) % action.clip.duration;
            }
            if let Some(fade) = action.fade {
                action.weight += fade.rate * dt;
                let arrived = if fade.rate >= 0.0 {
                    action.weight >= fade.target
                } else {
                    action.weight <= fade.target
                };
                if arrived {
                    action.weight = fade.target;
                    action.fade = None;
                    if fade.target == 0.0 {
                        action.playing = false;
                    }
                }
            }
        }
    }

    #[inline]
    pub fn weight(&self, h: ActionHandle) -> f32 {
        self.actions[h.0].weight
    }

    #[inline]
    pub fn is_playing(&self, h: ActionHandle) -> bool {
        self.actions[h.0].playing
    }

    #[inline]
    pub fn clip_time(&self, h: ActionHandle) -> f32 {
        self.actions[h.0].time
    }
}

/// Names of the clips every character asset must ship.
const REQUIRED_CLIPS: [Gait; 3] = [Gait::Idle, Gait::Walk, Gait::Run];

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The loaded asset and the locomotion logic disagree about clip names.
    /// There is no sane fallback: playing nothing would silently desync the
    /// visuals from the movement state.
    #[error("animation clip `{0}` missing from loaded character")]
    MissingClip(&'static str),
}

/// Chooses the active clip from the gait and drives crossfades on change.
#[derive(Debug)]
pub struct AnimationSelector {
    /// Clip-name → action lookup, built once at install time.
    by_name: HashMap<String, ActionHandle>,
    current: Gait,
}

impl AnimationSelector {
    /// Registers every decoded clip with the mixer and starts `Idle`.
    /// Fails if any of the required gait clips is absent.
    pub fn new(mixer: &mut Mixer, clips: &[Clip]) -> Result<AnimationSelector, AnimationError> {
        let mut by_name = HashMap::with_capacity(clips.len());
        for clip in clips {
            let handle = mixer.clip_action(clip.clone());
            by_name.insert(clip.name.clone(), handle);
        }
        for gait in REQUIRED_CLIPS {
            if !by_name.contains_key(gait.clip_name()) {
                return Err(AnimationError::MissingClip(gait.clip_name()));
            }
        }

        let idle = by_name[Gait::Idle.clip_name()];
        mixer.play(idle);
        mixer.fade_in(idle, 0.0); // full weight from the first frame
        Ok(AnimationSelector {
            by_name,
            current: Gait::Idle,
        })
    }

    #[inline]
    pub fn current(&self) -> Gait {
        self.current
    }

    #[inline]
    pub fn handle(&self, name: &str) -> Option<ActionHandle> {
        self.by_name.get(name).copied()
    }

    /// Crossfade to `gait`'s clip if it differs from the active one; a
    /// matching gait issues nothing and the clip keeps playing.
    pub fn retarget(&mut self, mixer: &mut Mixer, gait: Gait) {
        if gait == self.current {
            return;
        }
        let previous = self.by_name[self.current.clip_name()];
        let next = self.by_name[gait.clip_name()];

        mixer.fade_out(previous, CROSSFADE);
        mixer.reset(next);
        mixer.fade_in(next, CROSSFADE);
        mixer.play(next);

        self.current = gait;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn stock_clips() -> Vec<Clip> {
        [("Idle", 2.5), ("Walk", 1.0), ("Run", 0.6)]
            .into_iter()
            .map(|(name, duration)| Clip {
                name: name.into(),
                duration,
            })
            .collect()
    }

    #[test]
    fn missing_required_clip_is_fatal() {
        let mut mixer = Mixer::new();
        let clips = vec![
            Clip {
                name: "Idle".into(),
                duration: 1.0,
            },
            Clip {
                name: "Walk".into(),
                duration: 1.0,
            },
        ];
        let err = AnimationSelector::new(&mut mixer, &clips).unwrap_err();
        assert!(matches!(err, AnimationError::MissingClip("Run")));
    }

    #[test]
    fn starts_on_idle_at_full_weight() {
        let mut mixer = Mixer::new();
        let selector = AnimationSelector::new(&mut mixer, &stock_clips()).unwrap();
        let idle = selector.handle("Idle").unwrap();
        assert!(mixer.is_playing(idle));
        assert_abs_diff_eq!(mixer.weight(idle), 1.0);
        assert_eq!(selector.current(), Gait::Idle);
    }

    #[test]
    fn transition_crossfades_over_window() {
        let mut mixer = Mixer::new();
        let mut selector = AnimationSelector::new(&mut mixer, &stock_clips()).unwrap();
        let idle = selector.handle("Idle").unwrap();
        let walk = selector.handle("Walk").unwrap();

        selector.retarget(&mut mixer, Gait::Walk);
        assert!(mixer.is_playing(walk));
        assert_abs_diff_eq!(mixer.clip_time(walk), 0.0); // restarted

        // halfway through the 0.5 s window
        mixer.advance(0.25);
        assert_abs_diff_eq!(mixer.weight(idle), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(mixer.weight(walk), 0.5, epsilon = 1e-5);

        // window complete: old clip fully out and stopped
        mixer.advance(0.25);
        assert_abs_diff_eq!(mixer.weight(idle), 0.0);
        assert_abs_diff_eq!(mixer.weight(walk), 1.0);
        assert!(!mixer.is_playing(idle));
        assert!(mixer.is_playing(walk));
    }

    #[test]
    fn repeated_gait_issues_no_new_transition() {
        let mut mixer = Mixer::new();
        let mut selector = AnimationSelector::new(&mut mixer, &stock_clips()).unwrap();
        let idle = selector.handle("Idle").unwrap();
        let walk = selector.handle("Walk").unwrap();

        // establish Walk as the active clip
        selector.retarget(&mut mixer, Gait::Walk);
        mixer.advance(0.6);
        assert_abs_diff_eq!(mixer.weight(walk), 1.0);

        // releasing all keys crossfades to Idle exactly once…
        selector.retarget(&mut mixer, Gait::Idle);
        mixer.advance(0.25);
        assert_abs_diff_eq!(mixer.weight(idle), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(mixer.weight(walk), 0.5, epsilon = 1e-5);
        let idle_time = mixer.clip_time(idle);

        // …a later idle frame issues nothing: the running fade continues
        // and the incoming clip is not restarted
        selector.retarget(&mut mixer, Gait::Idle);
        mixer.advance(0.1);
        assert_abs_diff_eq!(mixer.weight(idle), 0.7, epsilon = 1e-5);
        assert_abs_diff_eq!(mixer.weight(walk), 0.3, epsilon = 1e-5);
        assert!(mixer.clip_time(idle) > idle_time);
    }

    #[test]
    fn clip_time_loops_on_duration() {
        let mut mixer = Mixer::new();
        let h = mixer.clip_action(Clip {
            name: "Walk".into(),
            duration: 1.0,
        });
        mixer.play(h);
        mixer.advance(0.75);
        mixer.advance(0.75);
        assert_abs_diff_eq!(mixer.clip_time(h), 0.5, epsilon = 1e-5);
    }
}
