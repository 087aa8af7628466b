//! Stick joint state machine
//!
//! A projectile that sticks into a target is held by a slider joint along its
//! facing axis. The joint survives a short grace period unconditionally, then
//! is torn down as soon as the projectile slides past 90% of either travel
//! limit or the target disappears.
//!
//! Teardown checks existence up front instead of relying on the engine to
//! fail: a target removed from the world is an expected way for the
//! attachment to end.

use crate::config::BallisticsConfig;
use crate::foundation::logging::{debug, warn};
use crate::foundation::math::Vec2;
use crate::physics::{BodyHandle, JointHandle, PhysicsError, PhysicsWorld, SliderJointDef};

/// Attachment state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentState {
    /// No joint
    Detached,
    /// Joint exists and holds the projectile
    Attached,
}

/// Everything needed to create a stick joint
#[derive(Debug, Clone, Copy)]
pub struct AttachRequest {
    /// Projectile body
    pub projectile: BodyHandle,
    /// Struck body
    pub target: BodyHandle,
    /// Joint anchor (the projectile position)
    pub anchor: Vec2,
    /// Slide axis (the projectile facing)
    pub axis: Vec2,
    /// Long-axis visual extent of the projectile, in simulation units
    pub extent: f32,
}

/// How a release went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Release {
    /// Collision with the target was restored
    pub collision_restored: bool,
    /// The joint was removed by us (false if it was already gone)
    pub joint_removed: bool,
}

impl Release {
    /// Whether both halves of the teardown found what they expected
    pub fn is_clean(&self) -> bool {
        self.collision_restored && self.joint_removed
    }
}

/// Stick joint owned by one projectile
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    joint: Option<JointHandle>,
    target: Option<BodyHandle>,
    grace_timer: f32,
}

impl Attachment {
    /// Current state
    pub fn state(&self) -> AttachmentState {
        if self.joint.is_some() {
            AttachmentState::Attached
        } else {
            AttachmentState::Detached
        }
    }

    /// Whether a joint currently holds the projectile
    pub fn is_attached(&self) -> bool {
        self.joint.is_some()
    }

    /// The stick joint, if any
    pub fn joint(&self) -> Option<JointHandle> {
        self.joint
    }

    /// The body the projectile is stuck to, if any
    pub fn target(&self) -> Option<BodyHandle> {
        self.target
    }

    /// Grace time left before auto-release checks start
    pub fn grace_remaining(&self) -> f32 {
        self.grace_timer
    }

    /// Create the stick joint
    ///
    /// Returns `Ok(false)` without touching the world if a joint already exists.
    pub fn attach<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        request: &AttachRequest,
        config: &BallisticsConfig,
    ) -> Result<bool, PhysicsError> {
        if self.joint.is_some() {
            debug!("Ignoring attach to {:?}: already attached", request.target);
            return Ok(false);
        }

        let limit = request.extent * config.stick_limit_fraction;
        let joint = world.create_slider_joint(SliderJointDef {
            body_a: request.target,
            body_b: request.projectile,
            anchor: request.anchor,
            axis: request.axis,
            lower_limit: -limit,
            upper_limit: limit,
            max_motor_force: config.stick_motor_max_force,
        })?;

        if let Err(e) = world.ignore_collision_with(request.projectile, request.target) {
            // Never leave a joint behind without its collision ignore
            let _ = world.remove_joint(joint);
            return Err(e);
        }

        self.joint = Some(joint);
        self.target = Some(request.target);
        self.grace_timer = config.stick_grace_duration;

        debug!("Attached {:?} to {:?} with limits ±{limit}", request.projectile, request.target);
        Ok(true)
    }

    /// Per-tick check, returns the release report if the joint was torn down
    pub fn tick<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        projectile: BodyHandle,
        dt: f32,
        config: &BallisticsConfig,
    ) -> Option<Release> {
        let joint = self.joint?;

        if !world.joint_exists(joint) {
            return Some(self.release(world, projectile));
        }

        if self.grace_timer > 0.0 {
            self.grace_timer -= dt;
            return None;
        }

        let (translation, (lower, upper)) = world.joint_translation(joint).zip(world.joint_limits(joint))?;
        let threshold = config.stick_release_fraction;
        if translation < lower * threshold || translation > upper * threshold {
            debug!("Stick joint {joint:?} exceeded its travel limit ({translation})");
            return Some(self.release(world, projectile));
        }

        None
    }

    /// Tear the joint down and restore collision with the target
    ///
    /// Missing bodies or joints are logged and skipped; the attachment always
    /// ends up detached.
    pub fn release<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, projectile: BodyHandle) -> Release {
        let mut report = Release::default();

        if let Some(target) = self.target.take() {
            if world.body_exists(target) && world.body_exists(projectile) {
                match world.restore_collision_with(projectile, target) {
                    Ok(()) => report.collision_restored = true,
                    Err(e) => warn!("Failed to restore collision with stick target: {e}"),
                }
            } else {
                warn!("Stick target {target:?} was removed before the joint was released");
            }
        }

        if let Some(joint) = self.joint.take() {
            if world.joint_exists(joint) {
                match world.remove_joint(joint) {
                    Ok(()) => report.joint_removed = true,
                    Err(e) => warn!("Failed to remove stick joint: {e}"),
                }
            } else {
                warn!("Stick joint {joint:?} was already removed");
            }
        }

        self.grace_timer = 0.0;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDesc, CollisionCategory, CollisionShape, SandboxWorld};
    use approx::assert_relative_eq;

    struct Rig {
        world: SandboxWorld,
        projectile: BodyHandle,
        target: BodyHandle,
        config: BallisticsConfig,
    }

    fn rig() -> Rig {
        let mut world = SandboxWorld::new();
        let target = world.add_body(BodyDesc::fixed(
            CollisionShape::rectangle(1.0, 4.0),
            Vec2::new(5.0, 0.0),
            CollisionCategory::WALL,
        ));
        let projectile =
            world.add_body(BodyDesc::dynamic(CollisionShape::circle(0.05), Vec2::new(4.5, 0.0), 1.0));
        Rig {
            world,
            projectile,
            target,
            config: BallisticsConfig::default(),
        }
    }

    fn request(rig: &Rig) -> AttachRequest {
        AttachRequest {
            projectile: rig.projectile,
            target: rig.target,
            anchor: Vec2::new(4.5, 0.0),
            axis: Vec2::new(1.0, 0.0),
            extent: 1.0,
        }
    }

    #[test]
    fn test_attach_sets_limits_and_ignores_target() {
        let mut rig = rig();
        let mut attachment = Attachment::default();

        let req = request(&rig);
        assert!(attachment.attach(&mut rig.world, &req, &rig.config).unwrap());

        let joint = attachment.joint().unwrap();
        let (lower, upper) = rig.world.joint_limits(joint).unwrap();
        assert_relative_eq!(lower, -0.3);
        assert_relative_eq!(upper, 0.3);
        assert!(rig.world.is_ignoring(rig.projectile, rig.target));
        assert_relative_eq!(attachment.grace_remaining(), 1.0);
        assert_eq!(attachment.state(), AttachmentState::Attached);
    }

    #[test]
    fn test_second_attach_is_noop() {
        let mut rig = rig();
        let mut attachment = Attachment::default();
        let req = request(&rig);

        attachment.attach(&mut rig.world, &req, &rig.config).unwrap();
        let first = attachment.joint();

        assert!(!attachment.attach(&mut rig.world, &req, &rig.config).unwrap());
        assert_eq!(attachment.joint(), first);
        assert_eq!(rig.world.joint_count(), 1);
    }

    #[test]
    fn test_no_release_during_grace_period() {
        let mut rig = rig();
        let mut attachment = Attachment::default();
        let req = request(&rig);
        attachment.attach(&mut rig.world, &req, &rig.config).unwrap();

        // Far past the limit, but the grace timer still runs
        rig.world.set_transform(rig.projectile, Vec2::new(3.0, 0.0), 0.0);
        assert!(attachment.tick(&mut rig.world, rig.projectile, 0.5, &rig.config).is_none());
        assert!(attachment.is_attached());
    }

    #[test]
    fn test_release_past_ninety_percent_after_grace() {
        let mut rig = rig();
        let mut attachment = Attachment::default();
        let req = request(&rig);
        attachment.attach(&mut rig.world, &req, &rig.config).unwrap();

        // Expire the grace timer
        assert!(attachment.tick(&mut rig.world, rig.projectile, 1.0, &rig.config).is_none());

        // Slid 0.25 back, inside 90% of the 0.3 limit
        rig.world.set_transform(rig.projectile, Vec2::new(4.25, 0.0), 0.0);
        assert!(attachment.tick(&mut rig.world, rig.projectile, 0.1, &rig.config).is_none());

        // Slid 0.28 back, past 90% of the limit
        rig.world.set_transform(rig.projectile, Vec2::new(4.22, 0.0), 0.0);
        let release = attachment.tick(&mut rig.world, rig.projectile, 0.1, &rig.config).unwrap();

        assert!(release.is_clean());
        assert!(!attachment.is_attached());
        assert!(!rig.world.is_ignoring(rig.projectile, rig.target));
        assert_eq!(rig.world.joint_count(), 0);
    }

    #[test]
    fn test_release_after_target_removed() {
        let mut rig = rig();
        let mut attachment = Attachment::default();
        let req = request(&rig);
        attachment.attach(&mut rig.world, &req, &rig.config).unwrap();

        rig.world.remove_body(rig.target);
        let release = attachment.tick(&mut rig.world, rig.projectile, 0.1, &rig.config).unwrap();

        assert!(!release.collision_restored);
        assert!(!release.joint_removed);
        assert_eq!(attachment.state(), AttachmentState::Detached);
        assert!(attachment.target().is_none());
    }
}
