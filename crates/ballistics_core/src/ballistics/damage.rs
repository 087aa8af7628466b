//! Damage resolution bridge
//!
//! Turns a confirmed hit into a damage computation against the struck body,
//! applies the side effects every resolved hit shares (secondary effects,
//! spent-projectile filtering, momentum transfer) and decides between
//! deflection, sticking and continuing as debris.

use serde::{Deserialize, Serialize};

use crate::collaborators::{ActionType, StatusEffects};
use crate::config::BallisticsConfig;
use crate::foundation::math::{utils, Vec2};
use crate::physics::{
    BodyHandle, CharacterId, CollisionCategory, CollisionShape, FixtureInfo, ItemId, LimbId, PhysicsWorld,
    StructureId, TargetKind, VesselId,
};
use crate::projectile::StickPolicy;

/// Damage shape of a projectile's impact
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Radius of effect in display units; `<= 0` means derive it from the body shape
    pub range: f32,
    /// Damage dealt to limbs
    pub damage: f32,
    /// Damage dealt to structures
    pub structure_damage: f32,
}

impl AttackProfile {
    /// Fill in an unset range from the projectile's body shape
    pub fn ensure_range(&mut self, shape: &CollisionShape, config: &BallisticsConfig) {
        if self.range <= 0.0 {
            self.range = derive_damage_range(shape, config);
        }
    }
}

/// Damage range implied by a body shape, in display units
pub fn derive_damage_range(shape: &CollisionShape, config: &BallisticsConfig) -> f32 {
    let sim_range = match *shape {
        CollisionShape::Circle { radius } => radius,
        CollisionShape::Capsule { radius, height } => height / 2.0 + radius,
        CollisionShape::Rectangle { width, height } => utils::half_diagonal(width, height),
    };
    config.to_display_units(sim_range)
}

/// A rule on the struck armor or material that altered the attack
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageModifier {
    /// Multiplier applied to the incoming damage
    pub damage_multiplier: f32,
    /// The modifier makes projectiles bounce off
    pub deflects_projectiles: bool,
}

/// Result of a damage computation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DamageOutcome {
    /// Total damage applied
    pub damage: f32,
    /// Modifiers that took part in the computation
    pub applied_modifiers: Vec<DamageModifier>,
}

impl DamageOutcome {
    /// Whether any applied modifier deflects projectiles
    pub fn deflects_projectiles(&self) -> bool {
        self.applied_modifiers.iter().any(|m| m.deflects_projectiles)
    }
}

/// Damage collaborator
///
/// The core trusts whatever these return.
pub trait DamageModel {
    /// Compute and apply damage to a character limb
    fn limb_damage(
        &mut self,
        attacker: Option<CharacterId>,
        limb: LimbId,
        point: Vec2,
        factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome;

    /// Compute and apply damage to a structure
    fn structure_damage(
        &mut self,
        attacker: Option<CharacterId>,
        structure: StructureId,
        point: Vec2,
        factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome;
}

/// Metadata returned for a resolved hit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitOutcome {
    /// Damage reported by the damage collaborator
    pub damage_applied: f32,
    /// Armor deflected the projectile
    pub deflected: bool,
    /// The projectile should attach to the target
    pub stick_eligible: bool,
}

/// What the bridge decided for a candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The candidate is a vessel hull: move into its frame and keep going
    EnterVessel(VesselId),
    /// The hit consumed the shot
    Resolved(HitOutcome),
}

/// The projectile side of a hit
#[derive(Debug, Clone, Copy)]
pub struct Impact<'a> {
    /// Projectile item
    pub item: ItemId,
    /// Projectile body
    pub body: BodyHandle,
    /// Struck fixture
    pub target: &'a FixtureInfo,
    /// Surface normal at the hit, pointing out of the target
    pub normal: Vec2,
    /// Where damage is applied, in world coordinates
    pub point: Vec2,
    /// Character the damage is attributed to
    pub attacker: Option<CharacterId>,
    /// Damage profile, if the projectile deals any
    pub attack: Option<&'a AttackProfile>,
    /// Stick policy of the projectile
    pub stick_policy: StickPolicy,
}

/// Damage factor passed for direct hits
const DIRECT_HIT_FACTOR: f32 = 1.0;

/// Resolve a hit that already passed the collision filter
pub fn resolve<W: PhysicsWorld + ?Sized>(
    world: &mut W,
    damage: &mut dyn DamageModel,
    effects: &mut dyn StatusEffects,
    config: &BallisticsConfig,
    impact: &Impact<'_>,
) -> Resolution {
    let target = impact.target.target;

    let outcome = match (target, impact.attack) {
        (TargetKind::Vessel(vessel), _) => return Resolution::EnterVessel(vessel),
        (TargetKind::Limb { limb, .. }, Some(attack)) => {
            damage.limb_damage(impact.attacker, limb, impact.point, DIRECT_HIT_FACTOR, attack)
        }
        (TargetKind::Structure(structure), Some(attack)) => {
            damage.structure_damage(impact.attacker, structure, impact.point, DIRECT_HIT_FACTOR, attack)
        }
        (TargetKind::Limb { .. } | TargetKind::Structure(_) | TargetKind::Item(_) | TargetKind::Unknown, _) => {
            DamageOutcome::default()
        }
    };

    let character = target.character();
    effects.apply(impact.item, ActionType::OnUse, 1.0, character);
    effects.apply(impact.item, ActionType::OnImpact, 1.0, character);

    world.set_collision_filter(impact.body, CollisionCategory::ITEM, CollisionCategory::SPENT_MASK);

    let velocity = world.linear_velocity(impact.body);
    world.apply_linear_impulse(impact.target.body, velocity * world.mass(impact.body));

    let mut hit = HitOutcome {
        damage_applied: outcome.damage,
        ..HitOutcome::default()
    };

    if outcome.deflects_projectiles() {
        world.set_linear_velocity(impact.body, velocity * config.deflect_velocity_scale);
        hit.deflected = true;
    } else {
        hit.stick_eligible = velocity.dot(&impact.normal) < 0.0 && impact.stick_policy.matches(&target);
        world.set_linear_velocity(impact.body, velocity * config.hit_velocity_scale);
    }

    Resolution::Resolved(hit)
}
