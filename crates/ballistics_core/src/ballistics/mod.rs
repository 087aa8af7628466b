//! Leaf components of projectile resolution
//!
//! Ray queries, the collision filter, the damage bridge and the stick joint
//! state machine. The launch and flight controller in
//! [`crate::projectile`] drives all of them.

pub mod attachment;
pub mod collision_filter;
pub mod damage;
pub mod frames;
pub mod ray_query;

pub use attachment::{AttachRequest, Attachment, AttachmentState, Release};
pub use collision_filter::{ContactSource, Rejection};
pub use damage::{
    AttackProfile, DamageModel, DamageModifier, DamageOutcome, HitOutcome, Impact, Resolution,
};
pub use frames::{Frame, VesselFrames};
pub use ray_query::{CandidateHit, RayQuery};
