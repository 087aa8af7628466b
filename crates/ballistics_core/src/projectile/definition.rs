//! Per-item projectile definitions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ballistics::damage::AttackProfile;
use crate::config::Config;
use crate::physics::TargetKind;

bitflags! {
    /// Target kinds a projectile may stick into
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StickPolicy: u8 {
        /// Character limbs
        const CHARACTERS = 1 << 0;
        /// Walls and hull sections
        const STRUCTURES = 1 << 1;
        /// Loose items
        const ITEMS = 1 << 2;
        /// Anything at all, including level geometry
        const ANY = 1 << 3;
    }
}

impl StickPolicy {
    /// Whether a hit on `target` may create a stick joint
    pub fn matches(self, target: &TargetKind) -> bool {
        if self.contains(Self::ANY) {
            return true;
        }
        match target {
            TargetKind::Limb { .. } => self.contains(Self::CHARACTERS),
            TargetKind::Structure(_) => self.contains(Self::STRUCTURES),
            TargetKind::Item(_) => self.contains(Self::ITEMS),
            TargetKind::Vessel(_) | TargetKind::Unknown => false,
        }
    }
}

/// How a projectile travels once fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightMode {
    /// Resolved instantly with a ray query
    Hitscan,
    /// Launched as a physics body and resolved on contact
    Simulated,
}

/// Projectile definition as authored in item files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileDef {
    /// Impulse magnitude per unit of body mass applied at launch
    pub launch_impulse: f32,

    /// Resolve with a ray instead of simulating flight
    pub hitscan: bool,

    /// Queue the item for removal once a hit resolves
    pub remove_on_hit: bool,

    /// Older item files use this to mean "stick to anything"
    pub does_stick: bool,

    /// Stick into character limbs
    pub stick_to_characters: bool,

    /// Stick into structures
    pub stick_to_structures: bool,

    /// Stick into loose items
    pub stick_to_items: bool,

    /// Characters may fire this item directly
    pub character_usable: bool,

    /// Long-axis length of the item's sprite, in display units
    pub visual_extent: f32,

    /// Slots for items carried inside the projectile
    pub container_capacity: usize,

    /// Damage dealt on impact
    pub attack: Option<AttackProfile>,
}

impl Default for ProjectileDef {
    fn default() -> Self {
        Self {
            launch_impulse: 10.0,
            hitscan: false,
            remove_on_hit: false,
            does_stick: false,
            stick_to_characters: false,
            stick_to_structures: false,
            stick_to_items: false,
            character_usable: true,
            visual_extent: 0.0,
            container_capacity: 0,
            attack: None,
        }
    }
}

impl Config for ProjectileDef {}

impl ProjectileDef {
    /// Fold the individual stick flags into a policy set
    pub fn stick_policy(&self) -> StickPolicy {
        let mut policy = StickPolicy::empty();
        policy.set(StickPolicy::ANY, self.does_stick);
        policy.set(StickPolicy::CHARACTERS, self.stick_to_characters);
        policy.set(StickPolicy::STRUCTURES, self.stick_to_structures);
        policy.set(StickPolicy::ITEMS, self.stick_to_items);
        policy
    }

    /// Flight mode selected by the definition
    pub fn mode(&self) -> FlightMode {
        if self.hitscan {
            FlightMode::Hitscan
        } else {
            FlightMode::Simulated
        }
    }
}
