//! Minimal in-process physics world
//!
//! Implements [`PhysicsWorld`] well enough to drive the ballistics core
//! headlessly: explicit Euler integration, swept contacts for moving bodies,
//! per-pair collision ignores, and slider joints whose translation is measured
//! from the offset at attach time. There is no impulse solver; contacts are
//! reported and the moving body is parked at the contact point.

use std::collections::HashSet;

use slotmap::SlotMap;

use super::collision::{CollisionShape, RaySegment};
use super::collision_layers::CollisionCategory;
use super::handles::{BodyHandle, JointHandle, TargetKind};
use super::world::{
    Contact, FixtureInfo, PhysicsError, PhysicsWorld, RayCastControl, RayIntersection, SliderJointDef,
};
use crate::foundation::math::Vec2;

/// Description used to spawn a sandbox body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Fixture shape
    pub shape: CollisionShape,
    /// Initial position
    pub position: Vec2,
    /// Initial rotation in radians
    pub rotation: f32,
    /// Body mass
    pub mass: f32,
    /// Collision categories
    pub categories: CollisionCategory,
    /// Collision mask
    pub collides_with: CollisionCategory,
    /// Sensor fixture
    pub is_sensor: bool,
    /// Fixture belongs to a carried item
    pub is_carried_item: bool,
    /// User data
    pub target: TargetKind,
    /// Static bodies never integrate
    pub is_static: bool,
}

impl BodyDesc {
    /// Dynamic body with default filtering (collides with everything)
    pub fn dynamic(shape: CollisionShape, position: Vec2, mass: f32) -> Self {
        Self {
            shape,
            position,
            rotation: 0.0,
            mass,
            categories: CollisionCategory::ITEM,
            collides_with: CollisionCategory::all(),
            is_sensor: false,
            is_carried_item: false,
            target: TargetKind::Unknown,
            is_static: false,
        }
    }

    /// Static body (walls, level geometry)
    pub fn fixed(shape: CollisionShape, position: Vec2, categories: CollisionCategory) -> Self {
        Self {
            categories,
            is_static: true,
            ..Self::dynamic(shape, position, 0.0)
        }
    }

    /// Derive the mass from the shape's area
    pub fn with_density(mut self, density: f32) -> Self {
        self.mass = self.shape.area() * density;
        self
    }

    /// Set the user data
    pub fn with_target(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    /// Set the collision categories
    pub fn with_categories(mut self, categories: CollisionCategory) -> Self {
        self.categories = categories;
        self
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mark the fixture as a sensor
    pub fn as_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Mark the fixture as belonging to a carried item
    pub fn as_carried_item(mut self) -> Self {
        self.is_carried_item = true;
        self
    }
}

#[derive(Debug, Clone)]
struct SandboxBody {
    desc: BodyDesc,
    velocity: Vec2,
    enabled: bool,
    bullet: bool,
    ignored: HashSet<BodyHandle>,
}

impl SandboxBody {
    fn fixture_info(&self, handle: BodyHandle) -> FixtureInfo {
        FixtureInfo {
            body: handle,
            is_sensor: self.desc.is_sensor,
            categories: self.desc.categories,
            is_carried_item: self.desc.is_carried_item,
            target: self.desc.target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SandboxJoint {
    def: SliderJointDef,
    rest_offset: f32,
}

/// In-process physics world for tests and headless runs
#[derive(Debug, Default)]
pub struct SandboxWorld {
    bodies: SlotMap<BodyHandle, SandboxBody>,
    joints: SlotMap<JointHandle, SandboxJoint>,
    gravity: Vec2,
}

impl SandboxWorld {
    /// Create an empty world without gravity
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with the given gravity
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Add a body
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.bodies.insert(SandboxBody {
            desc,
            velocity: Vec2::zeros(),
            enabled: true,
            bullet: false,
            ignored: HashSet::new(),
        })
    }

    /// Remove a body together with every joint attached to it
    pub fn remove_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(body).is_none() {
            return;
        }
        self.joints
            .retain(|_, joint| joint.def.body_a != body && joint.def.body_b != body);
        for other in self.bodies.values_mut() {
            other.ignored.remove(&body);
        }
    }

    /// Number of live joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Whether the body is simulated
    pub fn is_enabled(&self, body: BodyHandle) -> bool {
        self.bodies.get(body).is_some_and(|b| b.enabled)
    }

    /// Current category and mask of a body
    pub fn collision_filter(&self, body: BodyHandle) -> Option<(CollisionCategory, CollisionCategory)> {
        self.bodies
            .get(body)
            .map(|b| (b.desc.categories, b.desc.collides_with))
    }

    /// Whether collisions between the two bodies are suppressed
    pub fn is_ignoring(&self, body: BodyHandle, other: BodyHandle) -> bool {
        self.bodies
            .get(body)
            .is_some_and(|b| b.ignored.contains(&other))
    }

    /// Advance the world by `dt` and return the contacts that occurred
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.step_with(dt, &mut |_, _| true)
    }

    /// Advance the world by `dt`, asking `on_contact` about every contact
    ///
    /// Contacts along a body's sweep are offered closest first, with the body
    /// already moved to the contact point. Returning `true` accepts the
    /// contact and parks the body there; `false` lets the body pass through
    /// and the next contact is offered. A body the handler teleports keeps its
    /// new position, and a body the handler pins with a joint stays at the
    /// contact point. Returns the accepted contacts.
    pub fn step_with(
        &mut self,
        dt: f32,
        on_contact: &mut dyn FnMut(&mut Self, Contact) -> bool,
    ) -> Vec<Contact> {
        let followers: HashSet<BodyHandle> = self.joints.values().map(|j| j.def.body_b).collect();
        let mut displacement: Vec<(BodyHandle, Vec2)> = Vec::new();
        let mut accepted = Vec::new();

        let movers: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(handle, body)| body.enabled && !body.desc.is_static && !followers.contains(handle))
            .map(|(handle, _)| handle)
            .collect();

        for handle in movers {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            body.velocity += self.gravity * dt;
            let start = body.desc.position;
            let end = start + body.velocity * dt;
            if (end - start).norm_squared() <= f32::EPSILON {
                continue;
            }

            let mut position = Some(end);
            for (point, contact) in self.sweep(handle, start, end) {
                if let Some(body) = self.bodies.get_mut(handle) {
                    body.desc.position = point;
                }
                let respond = on_contact(self, contact);
                if self.position(handle) != Some(point) {
                    position = None;
                    break;
                }
                if respond {
                    accepted.push(contact);
                }
                if respond || self.is_jointed(handle) {
                    position = Some(point);
                    break;
                }
            }

            if let Some(position) = position {
                if let Some(body) = self.bodies.get_mut(handle) {
                    body.desc.position = position;
                    displacement.push((handle, position - start));
                }
            }
        }

        // Jointed bodies ride along with whatever they are attached to
        for joint in self.joints.values() {
            if let Some(&(_, delta)) = displacement.iter().find(|(h, _)| *h == joint.def.body_a) {
                if let Some(follower) = self.bodies.get_mut(joint.def.body_b) {
                    follower.desc.position += delta;
                }
            }
        }

        accepted
    }

    fn is_jointed(&self, body: BodyHandle) -> bool {
        self.joints.values().any(|joint| joint.def.body_b == body)
    }

    /// Every contact along the segment, closest first
    fn sweep(&self, handle: BodyHandle, start: Vec2, end: Vec2) -> Vec<(Vec2, Contact)> {
        let Some(mover) = self.bodies.get(handle) else {
            return Vec::new();
        };
        let segment = RaySegment::new(start, end);

        let mut hits: Vec<_> = self
            .bodies
            .iter()
            .filter(|(other, body)| {
                *other != handle
                    && body.enabled
                    && !mover.ignored.contains(other)
                    && !body.ignored.contains(&handle)
                    && CollisionCategory::should_collide(
                        mover.desc.categories,
                        mover.desc.collides_with,
                        body.desc.categories,
                        body.desc.collides_with,
                    )
            })
            .filter_map(|(other, body)| {
                body.desc
                    .shape
                    .to_world_space(body.desc.position)
                    .intersect_segment(&segment)
                    .map(|hit| (hit, body.fixture_info(other)))
            })
            .collect();
        hits.sort_by(|(a, _), (b, _)| a.fraction.total_cmp(&b.fraction));

        hits.into_iter()
            .map(|(hit, fixture)| {
                (
                    hit.point,
                    Contact {
                        body: handle,
                        other: fixture,
                        normal: hit.normal,
                    },
                )
            })
            .collect()
    }

    fn joint_axis_offset(&self, def: &SliderJointDef) -> Option<f32> {
        let a = self.bodies.get(def.body_a)?.desc.position;
        let b = self.bodies.get(def.body_b)?.desc.position;
        Some((b - a).dot(&def.axis))
    }
}

impl PhysicsWorld for SandboxWorld {
    fn body_exists(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(body)
    }

    fn joint_exists(&self, joint: JointHandle) -> bool {
        self.joints.contains_key(joint)
    }

    fn target_kind(&self, body: BodyHandle) -> TargetKind {
        self.bodies
            .get(body)
            .map_or(TargetKind::Unknown, |b| b.desc.target)
    }

    fn shape(&self, body: BodyHandle) -> Option<CollisionShape> {
        self.bodies.get(body).map(|b| b.desc.shape)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| b.desc.position)
    }

    fn rotation(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|b| b.desc.rotation)
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.bodies.get(body).map_or(0.0, |b| b.desc.mass)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies.get(body).map_or_else(Vec2::zeros, |b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.velocity = velocity;
        }
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, rotation: f32) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.desc.position = position;
            b.desc.rotation = rotation;
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(body) {
            if b.desc.is_static || b.desc.mass <= 0.0 {
                return;
            }
            b.velocity += impulse / b.desc.mass;
        }
    }

    fn set_enabled(&mut self, body: BodyHandle, enabled: bool) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.enabled = enabled;
        }
    }

    fn set_bullet(&mut self, body: BodyHandle, bullet: bool) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.bullet = bullet;
        }
    }

    fn is_bullet(&self, body: BodyHandle) -> bool {
        self.bodies.get(body).is_some_and(|b| b.bullet)
    }

    fn set_collision_filter(
        &mut self,
        body: BodyHandle,
        categories: CollisionCategory,
        collides_with: CollisionCategory,
    ) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.desc.categories = categories;
            b.desc.collides_with = collides_with;
        }
    }

    fn ray_cast(
        &self,
        start: Vec2,
        end: Vec2,
        visit: &mut dyn FnMut(&RayIntersection) -> RayCastControl,
    ) {
        let segment = RaySegment::new(start, end);

        for (handle, body) in &self.bodies {
            if !body.enabled {
                continue;
            }
            let Some(hit) = body
                .desc
                .shape
                .to_world_space(body.desc.position)
                .intersect_segment(&segment)
            else {
                continue;
            };

            let intersection = RayIntersection {
                fixture: body.fixture_info(handle),
                point: hit.point,
                normal: hit.normal,
                fraction: hit.fraction,
            };
            if visit(&intersection) == RayCastControl::Terminate {
                return;
            }
        }
    }

    fn ignore_collision_with(&mut self, body: BodyHandle, other: BodyHandle) -> Result<(), PhysicsError> {
        if !self.bodies.contains_key(other) {
            return Err(PhysicsError::BodyNotFound(other));
        }
        let b = self.bodies.get_mut(body).ok_or(PhysicsError::BodyNotFound(body))?;
        b.ignored.insert(other);
        self.bodies[other].ignored.insert(body);
        Ok(())
    }

    fn restore_collision_with(&mut self, body: BodyHandle, other: BodyHandle) -> Result<(), PhysicsError> {
        let b = self.bodies.get_mut(body).ok_or(PhysicsError::BodyNotFound(body))?;
        b.ignored.remove(&other);
        let o = self.bodies.get_mut(other).ok_or(PhysicsError::BodyNotFound(other))?;
        o.ignored.remove(&body);
        Ok(())
    }

    fn create_slider_joint(&mut self, def: SliderJointDef) -> Result<JointHandle, PhysicsError> {
        if def.lower_limit > def.upper_limit {
            return Err(PhysicsError::InvalidJoint(format!(
                "lower limit {} exceeds upper limit {}",
                def.lower_limit, def.upper_limit
            )));
        }
        for body in [def.body_a, def.body_b] {
            if !self.bodies.contains_key(body) {
                return Err(PhysicsError::BodyNotFound(body));
            }
        }
        let rest_offset = self.joint_axis_offset(&def).unwrap_or_default();
        Ok(self.joints.insert(SandboxJoint { def, rest_offset }))
    }

    fn joint_translation(&self, joint: JointHandle) -> Option<f32> {
        let joint = self.joints.get(joint)?;
        Some(self.joint_axis_offset(&joint.def)? - joint.rest_offset)
    }

    fn joint_limits(&self, joint: JointHandle) -> Option<(f32, f32)> {
        self.joints
            .get(joint)
            .map(|j| (j.def.lower_limit, j.def.upper_limit))
    }

    fn remove_joint(&mut self, joint: JointHandle) -> Result<(), PhysicsError> {
        self.joints
            .remove(joint)
            .map(|_| ())
            .ok_or(PhysicsError::JointNotFound(joint))
    }
}
