//! Body to projectile lookup for contact dispatch
//!
//! Simulated projectiles register their body when launched. The session's
//! single contact dispatcher looks contacts up here instead of every
//! projectile subscribing to engine callbacks.

use slotmap::SecondaryMap;

use super::ProjectileId;
use crate::physics::BodyHandle;

/// Projectiles currently listening for contacts
#[derive(Debug, Default, Clone)]
pub struct ContactRegistry {
    bodies: SecondaryMap<BodyHandle, ProjectileId>,
}

impl ContactRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Route contacts of `body` to `projectile`
    pub fn register(&mut self, body: BodyHandle, projectile: ProjectileId) {
        self.bodies.insert(body, projectile);
    }

    /// Stop routing contacts of `body`
    pub fn unregister(&mut self, body: BodyHandle) -> Option<ProjectileId> {
        self.bodies.remove(body)
    }

    /// Projectile listening on `body`
    pub fn lookup(&self, body: BodyHandle) -> Option<ProjectileId> {
        self.bodies.get(body).copied()
    }

    /// Whether `body` is registered
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(body)
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
