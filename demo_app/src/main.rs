//! Shooting range demo
//!
//! Builds a small sandbox range with a bulkhead, a dummy and a docked vessel,
//! then fires a mix of harpoons and rifle rounds down it with some random
//! spread. Run with `RUST_LOG=debug` to follow every hit. An optional first
//! argument names a `.toml` or `.ron` file with ballistics tunables.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ballistics_core::foundation::logging;
use ballistics_core::prelude::*;
use log::{info, trace, warn};
use rand::Rng;

const SHOTS: u32 = 12;
const STEPS_PER_SHOT: u32 = 60;
const DT: f32 = 1.0 / 60.0;

#[derive(Default)]
struct Tally {
    limb_damage: HashMap<LimbId, f32>,
    structure_damage: HashMap<StructureId, f32>,
}

/// Applies damage straight to a shared tally, with a plate that deflects
struct RangeDamage {
    tally: Rc<RefCell<Tally>>,
    armored: StructureId,
}

impl DamageModel for RangeDamage {
    fn limb_damage(
        &mut self,
        _attacker: Option<CharacterId>,
        limb: LimbId,
        _point: Vec2,
        factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome {
        let damage = attack.damage * factor;
        *self.tally.borrow_mut().limb_damage.entry(limb).or_default() += damage;
        DamageOutcome {
            damage,
            applied_modifiers: Vec::new(),
        }
    }

    fn structure_damage(
        &mut self,
        _attacker: Option<CharacterId>,
        structure: StructureId,
        _point: Vec2,
        factor: f32,
        attack: &AttackProfile,
    ) -> DamageOutcome {
        if structure == self.armored {
            return DamageOutcome {
                damage: 0.0,
                applied_modifiers: vec![DamageModifier {
                    damage_multiplier: 0.0,
                    deflects_projectiles: true,
                }],
            };
        }
        let damage = attack.structure_damage * factor;
        *self.tally.borrow_mut().structure_damage.entry(structure).or_default() += damage;
        DamageOutcome {
            damage,
            applied_modifiers: Vec::new(),
        }
    }
}

struct LogSink;

impl TelemetrySink for LogSink {
    fn design_event(&mut self, event_id: &str, value: Option<f64>) {
        trace!("telemetry {event_id} {value:?}");
    }

    fn error_event(&mut self, severity: ErrorSeverity, message: &str) {
        warn!("telemetry {severity:?}: {message}");
    }
}

fn build_range(world: &mut SandboxWorld) {
    // Bulkhead and an armored plate above it
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 6.0), Vec2::new(20.0, 0.0), CollisionCategory::WALL)
            .with_target(TargetKind::Structure(StructureId(1))),
    );
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 3.0), Vec2::new(15.0, 4.5), CollisionCategory::WALL)
            .with_target(TargetKind::Structure(StructureId(2))),
    );

    // Dummy: head and torso
    for (limb, y, radius) in [(0, 1.6, 0.25), (1, 0.6, 0.45)] {
        world.add_body(
            BodyDesc::dynamic(CollisionShape::circle(radius), Vec2::new(10.0, y), 20.0)
                .with_categories(CollisionCategory::CHARACTER)
                .with_target(TargetKind::Limb {
                    limb: LimbId(limb),
                    character: Some(CharacterId(100)),
                }),
        );
    }

    // Hull of a docked vessel below the firing line
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(2.0, 4.0), Vec2::new(12.0, -5.0), CollisionCategory::WALL)
            .with_target(TargetKind::Vessel(VesselId(1))),
    );
}

fn main() -> Result<(), BallisticsError> {
    logging::init();

    let tally = Rc::new(RefCell::new(Tally::default()));
    let damage = Box::new(RangeDamage {
        tally: Rc::clone(&tally),
        armored: StructureId(2),
    });

    let mut world = SandboxWorld::new();
    build_range(&mut world);

    let mut session = match std::env::args().nth(1) {
        Some(path) => BallisticsSession::from_config_file(world, path, damage)?,
        None => BallisticsSession::new(world, BallisticsConfig::default(), damage),
    }
    .with_telemetry(Box::new(LogSink));
    session.add_vessel(VesselId(1), Vec2::new(12.0, -40.0));

    let harpoon = ProjectileDef {
        launch_impulse: 40.0,
        stick_to_characters: true,
        stick_to_structures: true,
        visual_extent: 120.0,
        attack: Some(AttackProfile {
            damage: 35.0,
            structure_damage: 10.0,
            ..AttackProfile::default()
        }),
        ..ProjectileDef::default()
    };
    let rifle_round = ProjectileDef {
        hitscan: true,
        remove_on_hit: true,
        attack: Some(AttackProfile {
            damage: 20.0,
            structure_damage: 5.0,
            ..AttackProfile::default()
        }),
        ..ProjectileDef::default()
    };

    let mut rng = rand::thread_rng();
    for shot in 0..SHOTS {
        let body = session
            .world_mut()
            .add_body(BodyDesc::dynamic(CollisionShape::circle(0.05), Vec2::new(0.0, 0.5), 0.5));
        let def = if shot % 3 == 0 { rifle_round.clone() } else { harpoon.clone() };
        let id = session.spawn_projectile(ItemId(shot), body, def)?;

        let angle: f32 = rng.gen_range(-0.35..0.35);
        session.fire(id, Vec2::new(angle.cos(), angle.sin()), Some(CharacterId(1)))?;

        for _ in 0..STEPS_PER_SHOT {
            session.step(DT);
        }

        if let Some(projectile) = session.projectile(id) {
            let position = session.world().position(body).unwrap_or_else(Vec2::zeros);
            info!(
                "Shot {shot} ({:?}, {:.2} rad): {:?} at ({:.2}, {:.2})",
                projectile.mode(),
                angle,
                projectile.flight_state(),
                position.x,
                position.y
            );
        }

        for item in session.drain_removals() {
            info!("Shot {} removed from the range", item.0);
        }
    }

    let tally = tally.borrow();
    for (limb, damage) in &tally.limb_damage {
        info!("Dummy limb {}: {damage:.1} damage", limb.0);
    }
    for (structure, damage) in &tally.structure_damage {
        info!("Structure {}: {damage:.1} damage", structure.0);
    }
    Ok(())
}
