//! # Ballistics Core
//!
//! Projectile ballistics and collision resolution for a 2D submarine-combat
//! simulation.
//!
//! ## Features
//!
//! - **Two flight modes**: physically simulated launches and instant hitscan rays
//! - **Multi-frame ray queries**: shots are tested against the exterior world
//!   and every vessel interior
//! - **Stick joints**: projectiles embed in what they hit and come loose when
//!   they slide too far
//! - **Engine independent**: physics, damage, status effects and inventory are
//!   traits the game implements
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ballistics_core::prelude::*;
//!
//! struct NoDamage;
//!
//! impl DamageModel for NoDamage {
//!     fn limb_damage(
//!         &mut self,
//!         _: Option<CharacterId>,
//!         _: LimbId,
//!         _: Vec2,
//!         _: f32,
//!         _: &AttackProfile,
//!     ) -> DamageOutcome {
//!         DamageOutcome::default()
//!     }
//!
//!     fn structure_damage(
//!         &mut self,
//!         _: Option<CharacterId>,
//!         _: StructureId,
//!         _: Vec2,
//!         _: f32,
//!         _: &AttackProfile,
//!     ) -> DamageOutcome {
//!         DamageOutcome::default()
//!     }
//! }
//!
//! fn main() -> Result<(), BallisticsError> {
//!     let mut world = SandboxWorld::new();
//!     let body = world.add_body(BodyDesc::dynamic(CollisionShape::circle(0.05), Vec2::zeros(), 1.0));
//!
//!     let mut session = BallisticsSession::new(world, BallisticsConfig::default(), Box::new(NoDamage));
//!     let harpoon = session.spawn_projectile(ItemId(1), body, ProjectileDef::default())?;
//!     session.fire(harpoon, Vec2::new(1.0, 0.0), None)?;
//!     session.step(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod ballistics;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod projectile;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{BallisticsError, Result};
pub use session::BallisticsSession;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        ballistics::{AttackProfile, DamageModel, DamageModifier, DamageOutcome, Frame, HitOutcome},
        collaborators::{ActionType, ErrorSeverity, InventoryHooks, StatusEffects, TelemetrySink},
        config::{BallisticsConfig, Config},
        foundation::math::Vec2,
        physics::{
            BodyDesc, BodyHandle, CharacterId, CollisionCategory, CollisionShape, ItemId, LimbId, PhysicsWorld,
            SandboxWorld, StructureId, TargetKind, VesselId,
        },
        projectile::{FlightMode, FlightState, Projectile, ProjectileDef, ProjectileId, StickPolicy},
        BallisticsError, BallisticsSession,
    };
}
