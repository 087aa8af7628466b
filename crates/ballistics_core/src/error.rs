//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::physics::{ItemId, PhysicsError};
use crate::projectile::{ContainError, ProjectileId};

/// Errors returned by the session API
///
/// Gameplay outcomes (a refused shot, a lost hitscan ray, a stick target that
/// vanished) are not errors and never show up here.
#[derive(Error, Debug)]
pub enum BallisticsError {
    /// The projectile was never spawned or has already been removed
    #[error("Unknown projectile: {0:?}")]
    UnknownProjectile(ProjectileId),

    /// The item already backs a projectile
    #[error("Item already has a projectile: {0:?}")]
    DuplicateItem(ItemId),

    /// Physics collaborator error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Contained item rules were violated
    #[error("Container error: {0}")]
    Contain(#[from] ContainError),
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, BallisticsError>;
