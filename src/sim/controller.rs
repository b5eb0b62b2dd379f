//! Per-frame movement orchestration.
//!
//! Owns the ECS world and everything per-character; the host hands it a
//! timestamp, the held keys and the camera once per frame.  Order inside a
//! frame: animation retarget → locomotion integration → capsule translate →
//! collision correct → visual/heading/camera mirror.

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use super::animation::{AnimationError, AnimationSelector, Clip, Mixer};
use super::components::{CapsuleCollider, Heading, VisualPos, rotate_towards};
use super::direction::DirectionResolver;
use super::input::InputState;
use super::locomotion::{Gait, LocomotionState};
use crate::world::{Aabb, Capsule, Contact, Octree, OrbitCamera};

/// Facing correction cap, radians per frame (5°).
pub const MAX_TURN_STEP: f32 = 5.0 * std::f32::consts::PI / 180.0;

/// Everything owned by the loaded character: its entity plus the animation
/// machinery keyed to its clip map.
struct CharacterRig {
    entity: Entity,
    mixer: Mixer,
    selector: AnimationSelector,
}

/// Snapshot of the character for rendering / debug overlays.
#[derive(Clone, Copy, Debug)]
pub struct CharacterPose {
    pub position: Vec3,
    pub heading: f32,
    pub radius: f32,
    pub on_ground: bool,
}

/// Composes input, locomotion, collision and animation into a new character
/// pose each frame and mirrors that pose onto the camera.
pub struct MovementController {
    world: World,
    rig: Option<CharacterRig>,
    octree: Option<Octree>,
    resolver: DirectionResolver,
    previous_time: Option<f32>,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementController {
    pub fn new() -> MovementController {
        MovementController {
            world: World::new(),
            rig: None,
            octree: None,
            resolver: DirectionResolver::new(),
            previous_time: None,
        }
    }

    /// Install a finished character load: size the capsule from the model
    /// bounds, build the clip map and spawn the character entity.  Replaces
    /// any previously installed character.
    ///
    /// Fails (fatally, per the asset contract) when a required clip is
    /// missing from `clips`.
    pub fn install_character(
        &mut self,
        bounds: Aabb,
        clips: &[Clip],
    ) -> Result<(), AnimationError> {
        let mut mixer = Mixer::new();
        let selector = AnimationSelector::new(&mut mixer, clips)?;

        let size = bounds.size();
        let collider = CapsuleCollider(Capsule::upright(size.y, size.z));
        let spawn_pos = collider.anchor();

        if let Some(old) = self.rig.take() {
            let _ = self.world.despawn(old.entity);
        }
        let entity = self.world.spawn((
            Heading(0.0),
            LocomotionState::default(),
            collider,
            VisualPos(spawn_pos),
        ));
        self.rig = Some(CharacterRig {
            entity,
            mixer,
            selector,
        });
        log::info!(
            "character installed: capsule h={:.1} r={:.1}, {} clips",
            size.y,
            size.z * 0.5,
            clips.len()
        );
        Ok(())
    }

    /// Install the environment's collision structure.  Until this happens
    /// every query reports "no contact" and the character free-falls.
    pub fn install_environment(&mut self, octree: Octree) {
        self.octree = Some(octree);
    }

    #[inline]
    pub fn character_ready(&self) -> bool {
        self.rig.is_some()
    }

    #[inline]
    pub fn environment_ready(&self) -> bool {
        self.octree.is_some()
    }

    pub fn environment_bounds(&self) -> Option<Aabb> {
        self.octree.as_ref().and_then(|o| o.bounds())
    }

    /// Current pose snapshot, absent until the character is installed.
    pub fn pose(&self) -> Option<CharacterPose> {
        let rig = self.rig.as_ref()?;
        let mut query = self
            .world
            .query_one::<(&VisualPos, &Heading, &CapsuleCollider, &LocomotionState)>(rig.entity)
            .ok()?;
        let (visual, heading, collider, loco) = query.get()?;
        Some(CharacterPose {
            position: visual.0,
            heading: heading.0,
            radius: collider.0.radius,
            on_ground: loco.on_ground,
        })
    }

    /// One frame.  `time` is seconds from an arbitrary monotonic origin;
    /// the first call only establishes the time reference.
    pub fn update(&mut self, time: f32, input: &InputState, camera: &mut OrbitCamera) {
        let dt = self.frame_delta(time);

        // not-yet-ready: skip all movement until the character exists
        let Some(rig) = self.rig.as_mut() else {
            return;
        };

        rig.mixer.advance(dt);
        let gait = Gait::classify(input);
        rig.selector.retarget(&mut rig.mixer, gait);

        if dt <= 0.0 {
            return;
        }

        let offset = self.resolver.resolve(input);

        let Ok((heading, loco, collider, visual)) = self.world.query_one_mut::<(
            &mut Heading,
            &mut LocomotionState,
            &mut CapsuleCollider,
            &mut VisualPos,
        )>(rig.entity) else {
            return;
        };

        *loco = loco.advanced(gait);

        // movement heading: camera forward flattened to the ground while
        // grounded, tipped a fixed unit downward while airborne, then swung
        // by the key offset
        let mut walk_dir = camera.forward();
        walk_dir.y = if loco.on_ground { 0.0 } else { -1.0 };
        let walk_dir = Quat::from_rotation_y(offset) * walk_dir.normalize_or_zero();

        let velocity = Vec3::new(
            walk_dir.x * loco.speed,
            walk_dir.y * loco.falling_speed,
            walk_dir.z * loco.speed,
        );

        // capsule moves first, unconditionally; the query corrects it after
        let step = velocity * dt;
        if step.is_finite() {
            collider.0.translate(step);
        }

        let contact = self
            .octree
            .as_ref()
            .and_then(|octree| octree.capsule_intersect(&collider.0));
        resolve_contact(&mut collider.0, contact.as_ref(), loco);

        // the capsule is authoritative; visuals, heading and camera follow
        let previous = visual.0;
        visual.0 = collider.anchor();

        let target_yaw = camera.yaw_towards(visual.0) + offset;
        heading.0 = rotate_towards(heading.0, target_yaw, MAX_TURN_STEP);

        camera.follow(visual.0 - previous);
        camera.look_at(visual.0);
    }

    /// Δt since the previous call, clamped so a first frame, a regressing
    /// clock or a NaN timestamp can never reach the integrators.
    fn frame_delta(&mut self, time: f32) -> f32 {
        let dt = match self.previous_time {
            Some(previous) => time - previous,
            None => 0.0,
        };
        self.previous_time = Some(time);
        if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
    }
}

/// Apply one frame's collision outcome: push the capsule out of penetration
/// and record ground contact (which also resets the fall channel).
fn resolve_contact(capsule: &mut Capsule, contact: Option<&Contact>, loco: &mut LocomotionState) {
    match contact {
        Some(c) => {
            capsule.translate(c.normal * c.depth);
            loco.touch_ground(true);
        }
        None => loco.touch_ground(false),
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
