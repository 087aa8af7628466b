//! Scenario tests driving a full session over the sandbox world

mod hitscan;
mod lifecycle;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ballistics::{AttackProfile, DamageModel, DamageModifier, DamageOutcome};
use crate::collaborators::{ActionType, InventoryHooks, StatusEffects};
use crate::config::BallisticsConfig;
use crate::foundation::math::Vec2;
use crate::physics::{
    BodyDesc, BodyHandle, CharacterId, CollisionCategory, CollisionShape, ItemId, LimbId, SandboxWorld,
    StructureId, TargetKind,
};
use crate::session::BallisticsSession;

/// Everything the fake collaborators saw
#[derive(Debug, Default)]
pub struct Record {
    pub limb_hits: Vec<(Option<CharacterId>, LimbId)>,
    pub structure_hits: Vec<StructureId>,
    pub effects: Vec<(ActionType, Option<CharacterId>)>,
    pub dropped: Vec<ItemId>,
    pub contained: Vec<(ItemId, ItemId)>,
}

pub type Log = Rc<RefCell<Record>>;

struct FakeDamage {
    log: Log,
    deflect: bool,
}

impl FakeDamage {
    fn outcome(&self, damage: f32) -> DamageOutcome {
        DamageOutcome {
            damage,
            applied_modifiers: vec![DamageModifier {
                damage_multiplier: 1.0,
                deflects_projectiles: self.deflect,
            }],
        }
    }
}

impl DamageModel for FakeDamage {
    fn limb_damage(
        &mut self,
        attacker: Option<CharacterId>,
        limb: LimbId,
        _point: Vec2,
        _factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome {
        self.log.borrow_mut().limb_hits.push((attacker, limb));
        self.outcome(attack.damage)
    }

    fn structure_damage(
        &mut self,
        _attacker: Option<CharacterId>,
        structure: StructureId,
        _point: Vec2,
        _factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome {
        self.log.borrow_mut().structure_hits.push(structure);
        self.outcome(attack.structure_damage)
    }
}

struct FakeEffects(Log);

impl StatusEffects for FakeEffects {
    fn apply(&mut self, _item: ItemId, action: ActionType, _dt: f32, character: Option<CharacterId>) {
        self.0.borrow_mut().effects.push((action, character));
    }
}

struct FakeInventory(Log);

impl InventoryHooks for FakeInventory {
    fn drop_item(&mut self, item: ItemId) {
        self.0.borrow_mut().dropped.push(item);
    }

    fn item_contained(&mut self, container: ItemId, item: ItemId) {
        self.0.borrow_mut().contained.push((container, item));
    }
}

/// Session over `world` with recording collaborators
pub fn session(world: SandboxWorld, deflect: bool) -> (BallisticsSession<SandboxWorld>, Log) {
    let log = Log::default();
    let session = BallisticsSession::new(
        world,
        BallisticsConfig::default(),
        Box::new(FakeDamage {
            log: Rc::clone(&log),
            deflect,
        }),
    )
    .with_status_effects(Box::new(FakeEffects(Rc::clone(&log))))
    .with_inventory(Box::new(FakeInventory(Rc::clone(&log))));
    (session, log)
}

/// Attack dealing 20 to limbs and 30 to structures
pub fn attack() -> AttackProfile {
    AttackProfile {
        range: 0.0,
        damage: 20.0,
        structure_damage: 30.0,
    }
}

/// Small round projectile body
pub fn projectile_body(world: &mut SandboxWorld, position: Vec2) -> BodyHandle {
    world.add_body(BodyDesc::dynamic(CollisionShape::circle(0.05), position, 1.0))
}

/// 1 x 4 damageable wall centred at `x`
pub fn structure_wall(world: &mut SandboxWorld, x: f32, id: u32) -> BodyHandle {
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 4.0), Vec2::new(x, 0.0), CollisionCategory::WALL)
            .with_target(TargetKind::Structure(StructureId(id))),
    )
}

/// Limb of `character` centred at `x`
pub fn limb(world: &mut SandboxWorld, x: f32, limb: u32, character: u32) -> BodyHandle {
    world.add_body(
        BodyDesc::dynamic(CollisionShape::circle(0.3), Vec2::new(x, 0.0), 5.0)
            .with_categories(CollisionCategory::CHARACTER)
            .with_target(TargetKind::Limb {
                limb: LimbId(limb),
                character: Some(CharacterId(character)),
            }),
    )
}
