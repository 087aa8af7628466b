//! Physics collaborator interface
//!
//! The ballistics core never integrates bodies itself. Everything it needs from
//! the physics engine goes through [`PhysicsWorld`], which a game implements
//! over its engine of choice (see [`super::sandbox::SandboxWorld`] for the
//! in-crate implementation used by tests and the demo).
//!
//! All calls happen on the simulation thread; implementations are not required
//! to be `Sync`.

use thiserror::Error;

use super::collision::CollisionShape;
use super::collision_layers::CollisionCategory;
use super::handles::{BodyHandle, JointHandle, TargetKind};
use crate::foundation::math::Vec2;

/// Errors reported by fallible physics operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The body was removed from the world
    #[error("body {0:?} does not exist")]
    BodyNotFound(BodyHandle),

    /// The joint was removed from the world (usually together with a body)
    #[error("joint {0:?} does not exist")]
    JointNotFound(JointHandle),

    /// Joint definition rejected by the engine
    #[error("invalid joint: {0}")]
    InvalidJoint(String),
}

/// Fixture data reported for every ray intersection and contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureInfo {
    /// Body owning the fixture
    pub body: BodyHandle,
    /// Sensor fixtures report overlaps but never register hits
    pub is_sensor: bool,
    /// Collision categories the fixture belongs to
    pub categories: CollisionCategory,
    /// Fixture belongs to a carried item (held weapon, worn gear)
    pub is_carried_item: bool,
    /// What the owning body represents
    pub target: TargetKind,
}

/// A single ray/fixture intersection as reported by the engine
///
/// Engines report these in broad-phase order, not sorted by `fraction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Fixture that was crossed
    pub fixture: FixtureInfo,
    /// Intersection point in the frame the ray was cast in
    pub point: Vec2,
    /// Surface normal at the intersection
    pub normal: Vec2,
    /// Position along the ray, 0 at start and 1 at end
    pub fraction: f32,
}

/// What the ray visitor wants the engine to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayCastControl {
    /// Skip this fixture and keep going
    Ignore,
    /// Keep this fixture and keep going
    Continue,
    /// Stop the query
    Terminate,
}

/// A physical contact delivered by the engine's narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Body that initiated the contact (the one the core may have registered)
    pub body: BodyHandle,
    /// Fixture that was struck
    pub other: FixtureInfo,
    /// Contact normal
    pub normal: Vec2,
}

/// Definition of a sliding (prismatic) joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderJointDef {
    /// Body the joint is anchored to (the struck body)
    pub body_a: BodyHandle,
    /// Body sliding along the axis (the projectile)
    pub body_b: BodyHandle,
    /// World anchor point
    pub anchor: Vec2,
    /// Slide axis, unit length
    pub axis: Vec2,
    /// Lower translation limit
    pub lower_limit: f32,
    /// Upper translation limit
    pub upper_limit: f32,
    /// Motor force cap
    pub max_motor_force: f32,
}

/// Everything the ballistics core needs from the physics engine
pub trait PhysicsWorld {
    /// Whether the body is still in the world
    fn body_exists(&self, body: BodyHandle) -> bool;

    /// Whether the joint is still in the world
    fn joint_exists(&self, joint: JointHandle) -> bool;

    /// What the body represents (its user data)
    fn target_kind(&self, body: BodyHandle) -> TargetKind;

    /// Shape of the body's main fixture
    fn shape(&self, body: BodyHandle) -> Option<CollisionShape>;

    /// Body position in its own reference frame
    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Body rotation in radians
    fn rotation(&self, body: BodyHandle) -> Option<f32>;

    /// Body mass
    fn mass(&self, body: BodyHandle) -> f32;

    /// Current linear velocity
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;

    /// Overwrite the linear velocity
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Teleport the body
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, rotation: f32);

    /// Apply an instantaneous impulse at the center of mass
    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Enable or disable simulation of the body
    fn set_enabled(&mut self, body: BodyHandle, enabled: bool);

    /// Toggle continuous collision detection
    fn set_bullet(&mut self, body: BodyHandle, bullet: bool);

    /// Whether continuous collision detection is on
    fn is_bullet(&self, body: BodyHandle) -> bool;

    /// Replace the body's collision category and mask
    fn set_collision_filter(
        &mut self,
        body: BodyHandle,
        categories: CollisionCategory,
        collides_with: CollisionCategory,
    );

    /// Cast a ray from `start` to `end`, calling `visit` for every fixture crossed
    ///
    /// Order of visits is engine-defined.
    fn ray_cast(
        &self,
        start: Vec2,
        end: Vec2,
        visit: &mut dyn FnMut(&RayIntersection) -> RayCastControl,
    );

    /// Stop `body` from colliding with `other`
    fn ignore_collision_with(&mut self, body: BodyHandle, other: BodyHandle) -> Result<(), PhysicsError>;

    /// Undo [`PhysicsWorld::ignore_collision_with`]
    fn restore_collision_with(&mut self, body: BodyHandle, other: BodyHandle) -> Result<(), PhysicsError>;

    /// Create a sliding joint with limits and an enabled motor
    fn create_slider_joint(&mut self, def: SliderJointDef) -> Result<JointHandle, PhysicsError>;

    /// Current translation along the joint axis
    fn joint_translation(&self, joint: JointHandle) -> Option<f32>;

    /// Lower and upper translation limits
    fn joint_limits(&self, joint: JointHandle) -> Option<(f32, f32)>;

    /// Remove the joint from the world
    fn remove_joint(&mut self, joint: JointHandle) -> Result<(), PhysicsError>;
}
