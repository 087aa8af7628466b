//! High-level collision shape abstractions
//!
//! Shapes are stored in model space (dimensions only, no position) and placed
//! into the world on demand when a test runs.

use serde::{Deserialize, Serialize};

use super::primitives::{Aabb, Circle, RaySegment, SegmentHit};
use crate::foundation::math::Vec2;

/// Fixture shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Circle of the given radius
    Circle {
        /// Radius
        radius: f32,
    },
    /// Axis-aligned rectangle
    Rectangle {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Vertical capsule: `height` is the distance between the cap centers
    Capsule {
        /// Cap radius
        radius: f32,
        /// Straight section length
        height: f32,
    },
}

impl CollisionShape {
    /// Creates a circular shape
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Creates a rectangular shape
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height }
    }

    /// Place this shape at `position`
    ///
    /// Capsules are tested as their bounding box.
    pub fn to_world_space(&self, position: Vec2) -> WorldSpaceShape {
        match *self {
            Self::Circle { radius } => WorldSpaceShape::Circle(Circle::new(position, radius)),
            Self::Rectangle { width, height } => {
                WorldSpaceShape::Box(Aabb::from_center(position, Vec2::new(width * 0.5, height * 0.5)))
            }
            Self::Capsule { radius, height } => {
                WorldSpaceShape::Box(Aabb::from_center(position, Vec2::new(radius, height * 0.5 + radius)))
            }
        }
    }

    /// Area used to derive a body's mass from its density
    pub fn area(&self) -> f32 {
        match *self {
            Self::Circle { radius } => std::f32::consts::PI * radius * radius,
            Self::Rectangle { width, height } => width * height,
            Self::Capsule { radius, height } => std::f32::consts::PI * radius * radius + 2.0 * radius * height,
        }
    }
}

/// Temporary world-space shape for intersection testing
#[derive(Debug, Clone, Copy)]
pub enum WorldSpaceShape {
    /// Circle
    Circle(Circle),
    /// Axis-aligned box
    Box(Aabb),
}

impl WorldSpaceShape {
    /// Intersect a segment with this shape
    pub fn intersect_segment(&self, segment: &RaySegment) -> Option<SegmentHit> {
        match self {
            Self::Circle(circle) => circle.intersect_segment(segment),
            Self::Box(aabb) => aabb.intersect_segment(segment),
        }
    }
}
