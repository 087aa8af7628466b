//! Interfaces to the game systems the core calls out to
//!
//! Damage lives next to the bridge in [`crate::ballistics::damage`]. The rest
//! are here together with the no-op defaults a session starts with.

pub mod removal;
pub mod telemetry;

pub use removal::RemovalQueue;
pub use telemetry::{ErrorSeverity, Telemetry, TelemetrySink};

use crate::physics::{CharacterId, ItemId};

/// When a status effect fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Every tick while the projectile is active
    OnActive,
    /// When the projectile is used against a target
    OnUse,
    /// On impact with a target
    OnImpact,
}

/// Status-effect collaborator (fire and forget)
pub trait StatusEffects {
    /// Apply the item's effects tagged with `action`
    fn apply(&mut self, item: ItemId, action: ActionType, dt: f32, character: Option<CharacterId>);
}

/// Inventory collaborator
pub trait InventoryHooks {
    /// Detach the item from whatever container or hand holds it
    fn drop_item(&mut self, item: ItemId);

    /// `item` was placed inside `container`
    fn item_contained(&mut self, container: ItemId, item: ItemId) {
        let _ = (container, item);
    }

    /// `item` was taken out of `container`
    fn item_removed(&mut self, container: ItemId, item: ItemId) {
        let _ = (container, item);
    }
}

/// Collaborator used until the game installs its own
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl StatusEffects for Noop {
    fn apply(&mut self, _item: ItemId, _action: ActionType, _dt: f32, _character: Option<CharacterId>) {}
}

impl InventoryHooks for Noop {
    fn drop_item(&mut self, _item: ItemId) {}
}
