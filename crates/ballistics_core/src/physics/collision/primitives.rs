//! Primitive collision shapes and intersection algorithms
//!
//! Provides 2D primitives (ray segments, circles, boxes) with segment
//! intersection tests that report the hit fraction along the segment.

use crate::foundation::math::Vec2;

/// Starts at most this far inside a shape still count as on its surface
const SURFACE_TOLERANCE: f32 = 1e-4;

/// A finite ray from `start` to `end`
#[derive(Debug, Clone, Copy)]
pub struct RaySegment {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
}

impl RaySegment {
    /// Creates a new segment
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction (`end - start`)
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Get a point along the segment at fraction t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }
}

/// Result of a segment intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Position along the segment in [0, 1]
    pub fraction: f32,
    /// Point of intersection
    pub point: Vec2,
    /// Outward surface normal at the intersection point
    pub normal: Vec2,
}

/// A circle in world space
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    /// Center position
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test segment intersection with this circle
    ///
    /// Segments starting inside the circle do not report a hit. A segment
    /// starting on the surface hits at fraction 0 when it heads inward.
    pub fn intersect_segment(&self, segment: &RaySegment) -> Option<SegmentHit> {
        let d = segment.delta();
        let oc = segment.start - self.center;

        // Solve |start + t*d - center|^2 = radius^2
        let a = d.dot(&d);
        if a <= f32::EPSILON {
            return None;
        }
        let b = 2.0 * oc.dot(&d);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Near root lies behind the start when starting inside or heading out
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if t > 1.0 || t * a.sqrt() < -SURFACE_TOLERANCE {
            return None;
        }

        let fraction = t.max(0.0);
        let point = segment.point_at(fraction);
        let normal = (point - self.center).normalize();
        Some(SegmentHit { fraction, point, normal })
    }
}

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from its center and half extents
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Slab test for segment intersection
    ///
    /// Segments starting inside the box do not report a hit. A segment
    /// starting on a face hits at fraction 0 when it heads into the box.
    pub fn intersect_segment(&self, segment: &RaySegment) -> Option<SegmentHit> {
        let d = segment.delta();
        if d.norm_squared() <= f32::EPSILON {
            return None;
        }
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = 1.0_f32;
        let mut normal = Vec2::zeros();

        for axis in 0..2 {
            let origin = segment.start[axis];
            let dir = d[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            // Entering through the min face means the outward normal points to -axis
            let mut sign = -1.0;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                sign = 1.0;
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec2::zeros();
                normal[axis] = sign;
            }
            t_exit = t_exit.min(t1);

            if t_enter > t_exit {
                return None;
            }
        }

        // Box behind the start, a start inside, or a start on a face heading back out
        if t_enter * d.norm() < -SURFACE_TOLERANCE {
            return None;
        }
        let fraction = t_enter.max(0.0);
        Some(SegmentHit {
            fraction,
            point: segment.point_at(fraction),
            normal,
        })
    }
}
