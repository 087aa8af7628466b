//! Identity types for bodies, joints and the game objects behind them

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a rigid body owned by the physics world
    pub struct BodyHandle;

    /// Handle to a joint owned by the physics world
    pub struct JointHandle;
}

macro_rules! game_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);
    };
}

game_id!(
    /// Item entity (the projectile itself, or something it carries)
    ItemId
);
game_id!(
    /// Character that can fire weapons and own projectiles
    CharacterId
);
game_id!(
    /// Single limb of a character's ragdoll
    LimbId
);
game_id!(
    /// Damageable wall or hull section
    StructureId
);
game_id!(
    /// Vessel with its own interior reference frame
    VesselId
);

/// What a physics body represents in the game world
///
/// Resolved once from the body's user data when a candidate is accepted, then
/// matched exhaustively by the damage bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// Outer hull of a vessel; entering it switches reference frames
    Vessel(VesselId),
    /// Character limb
    Limb {
        /// The limb that was struck
        limb: LimbId,
        /// Character owning the limb, if it still exists
        character: Option<CharacterId>,
    },
    /// Damageable structure
    Structure(StructureId),
    /// Loose item body
    Item(ItemId),
    /// Anything else (level geometry, untagged bodies)
    #[default]
    Unknown,
}

impl TargetKind {
    /// Whether this target is a character limb
    pub fn is_limb(&self) -> bool {
        matches!(self, Self::Limb { .. })
    }

    /// Character that should receive status effects for this hit
    pub fn character(&self) -> Option<CharacterId> {
        match self {
            Self::Limb { character, .. } => *character,
            _ => None,
        }
    }
}
