//! Collision geometry used by the sandbox world
//!
//! # Module Organization
//!
//! - [`primitives`] - Ray segments, circles and axis-aligned boxes
//! - [`shape`] - Model-space fixture shapes placed into the world on demand

pub mod primitives;
pub mod shape;

pub use primitives::{Aabb, Circle, RaySegment, SegmentHit};
pub use shape::{CollisionShape, WorldSpaceShape};
