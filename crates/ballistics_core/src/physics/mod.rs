//! Physics module for collision filtering and the physics collaborator
//!
//! The ballistics core talks to the physics engine through [`PhysicsWorld`].
//! [`SandboxWorld`] is the in-crate implementation used for headless runs.

pub mod collision;
pub mod collision_layers;
pub mod handles;
pub mod sandbox;
pub mod world;

pub use collision::{CollisionShape, RaySegment, SegmentHit};
pub use collision_layers::CollisionCategory;
pub use handles::{BodyHandle, CharacterId, ItemId, JointHandle, LimbId, StructureId, TargetKind, VesselId};
pub use sandbox::{BodyDesc, SandboxWorld};
pub use world::{
    Contact, FixtureInfo, PhysicsError, PhysicsWorld, RayCastControl, RayIntersection, SliderJointDef,
};
