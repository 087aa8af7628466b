//! Projectiles and their launch/flight controller

pub mod contained;
pub mod controller;
pub mod definition;
pub mod registry;

pub use contained::{ContainError, ContainedItem, ContainedItems};
pub use controller::FlightController;
pub use definition::{FlightMode, ProjectileDef, StickPolicy};
pub use registry::ContactRegistry;

use std::collections::HashSet;

use slotmap::new_key_type;

use crate::ballistics::{AttackProfile, Attachment, Frame};
use crate::physics::{BodyHandle, CharacterId, ItemId};

new_key_type! {
    /// Handle to a projectile owned by a session
    pub struct ProjectileId;
}

/// Where a projectile is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    /// Loaded, or spent and lying around
    #[default]
    Idle,
    /// Fired and waiting for its hit
    InFlight,
    /// Held by a stick joint
    Stuck,
    /// Queued for removal
    Resolved,
}

/// A fired (or fireable) weapon item
#[derive(Debug, Clone)]
pub struct Projectile {
    pub(crate) item: ItemId,
    pub(crate) body: BodyHandle,
    pub(crate) def: ProjectileDef,
    pub(crate) stick_policy: StickPolicy,
    pub(crate) ignored_bodies: HashSet<BodyHandle>,
    pub(crate) owner: Option<CharacterId>,
    pub(crate) flight: FlightState,
    pub(crate) active: bool,
    pub(crate) frame: Frame,
    pub(crate) attachment: Attachment,
    pub(crate) contained: ContainedItems,
}

impl Projectile {
    pub(crate) fn new(item: ItemId, body: BodyHandle, def: ProjectileDef) -> Self {
        Self {
            item,
            body,
            stick_policy: def.stick_policy(),
            contained: ContainedItems::with_capacity(def.container_capacity),
            def,
            ignored_bodies: HashSet::new(),
            owner: None,
            flight: FlightState::Idle,
            active: false,
            frame: Frame::Exterior,
            attachment: Attachment::default(),
        }
    }

    /// The weapon item
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// The item's physics body
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Definition the projectile was spawned from
    pub fn definition(&self) -> &ProjectileDef {
        &self.def
    }

    /// Hitscan or simulated
    pub fn mode(&self) -> FlightMode {
        self.def.mode()
    }

    /// Targets the projectile may stick into
    pub fn stick_policy(&self) -> StickPolicy {
        self.stick_policy
    }

    /// Damage profile, with its range already derived
    pub fn attack(&self) -> Option<&AttackProfile> {
        self.def.attack.as_ref()
    }

    /// Bodies this projectile passes through
    pub fn ignored_bodies(&self) -> &HashSet<BodyHandle> {
        &self.ignored_bodies
    }

    /// Character damage is attributed to
    pub fn owner(&self) -> Option<CharacterId> {
        self.owner
    }

    /// Lifecycle state
    pub fn flight_state(&self) -> FlightState {
        self.flight
    }

    /// Whether the per-tick update runs
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frame the projectile's body is simulated in
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Stick joint state
    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    /// Items carried inside
    pub fn contained_items(&self) -> &ContainedItems {
        &self.contained
    }
}
