mod animation;
mod components;
mod controller;
mod direction;
mod input;
mod locomotion;

pub use animation::{ActionHandle, AnimationError, AnimationSelector, CROSSFADE, Clip, Mixer};
pub use components::{CapsuleCollider, Heading, VisualPos, rotate_towards, wrap_angle};
pub use controller::{CharacterPose, MAX_TURN_STEP, MovementController};
pub use direction::DirectionResolver;
pub use input::{InputState, MoveKeys};
pub use locomotion::{
    GROUND_ACCELERATION, Gait, LocomotionState, RUN_MAX_SPEED, WALK_MAX_SPEED,
};
