use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::{attack, limb, projectile_body, session, structure_wall};
use crate::collaborators::{ErrorSeverity, TelemetrySink};
use crate::error::BallisticsError;
use crate::foundation::math::Vec2;
use crate::physics::{
    BodyDesc, CharacterId, CollisionCategory, CollisionShape, Contact, FixtureInfo, ItemId, LimbId,
    PhysicsWorld, SandboxWorld, TargetKind,
};
use crate::projectile::{ContainError, FlightState, ProjectileDef};

const ITEM: ItemId = ItemId(21);

#[derive(Default)]
struct Events {
    design: Vec<String>,
    errors: Vec<(ErrorSeverity, String)>,
}

struct RecordingSink(Rc<RefCell<Events>>);

impl TelemetrySink for RecordingSink {
    fn design_event(&mut self, event_id: &str, _value: Option<f64>) {
        self.0.borrow_mut().design.push(event_id.to_string());
    }

    fn error_event(&mut self, severity: ErrorSeverity, message: &str) {
        self.0.borrow_mut().errors.push((severity, message.to_string()));
    }
}

fn sticky() -> ProjectileDef {
    ProjectileDef {
        stick_to_structures: true,
        visual_extent: 100.0,
        attack: Some(attack()),
        ..ProjectileDef::default()
    }
}

#[test]
fn test_character_cannot_fire_unusable_item() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let def = ProjectileDef {
        character_usable: false,
        ..ProjectileDef::default()
    };
    let id = session.spawn_projectile(ITEM, body, def).unwrap();

    assert!(!session.fire(id, Vec2::new(1.0, 0.0), Some(CharacterId(1))).unwrap());
    assert_eq!(session.projectile(id).unwrap().flight_state(), FlightState::Idle);
    assert!(log.borrow().dropped.is_empty());
    assert_relative_eq!(session.world().linear_velocity(body), Vec2::zeros());

    // Launchers and other non-character firers are fine
    assert!(session.fire(id, Vec2::new(1.0, 0.0), None).unwrap());
    assert_eq!(session.projectile(id).unwrap().flight_state(), FlightState::InFlight);
}

#[test]
fn test_use_item_fires_along_facing() {
    let mut world = SandboxWorld::new();
    let body = world.add_body(
        BodyDesc::dynamic(CollisionShape::circle(0.05), Vec2::zeros(), 2.0).with_rotation(FRAC_PI_2),
    );
    let (mut session, _log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, ProjectileDef::default()).unwrap();

    assert!(session.use_item(id, Some(CharacterId(3))).unwrap());

    assert_relative_eq!(session.world().linear_velocity(body), Vec2::new(0.0, 10.0), epsilon = 1e-5);
    assert_eq!(session.projectile(id).unwrap().owner(), Some(CharacterId(3)));
}

#[test]
fn test_zero_direction_falls_back_to_facing() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, _log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, ProjectileDef::default()).unwrap();

    session.fire(id, Vec2::zeros(), None).unwrap();

    assert_relative_eq!(session.world().linear_velocity(body), Vec2::new(10.0, 0.0));
}

#[test]
fn test_refire_releases_stick_joint() {
    let mut world = SandboxWorld::new();
    let wall = structure_wall(&mut world, 5.0, 1);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (session, _log) = session(world, false);
    let events = Rc::new(RefCell::new(Events::default()));
    let mut session = session.with_telemetry(Box::new(RecordingSink(Rc::clone(&events))));
    let id = session.spawn_projectile(ITEM, body, sticky()).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();
    session.step(0.5);
    assert_eq!(session.world().joint_count(), 1);

    session.fire(id, Vec2::new(-1.0, 0.0), None).unwrap();

    let projectile = session.projectile(id).unwrap();
    assert_eq!(projectile.flight_state(), FlightState::InFlight);
    assert!(!projectile.attachment().is_attached());
    assert_eq!(session.world().joint_count(), 0);
    assert!(!session.world().is_ignoring(body, wall));
    assert_eq!(session.controller().contacts().lookup(body), Some(id));

    let events = events.borrow();
    assert_eq!(
        events.design,
        vec!["Projectile:Fired", "Projectile:Hit", "Projectile:StickReleased", "Projectile:Fired"]
    );
    assert!(events.errors.is_empty());
}

#[test]
fn test_remove_projectile_after_stick_target_vanished() {
    let mut world = SandboxWorld::new();
    let wall = structure_wall(&mut world, 5.0, 1);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (session, _log) = session(world, false);
    let events = Rc::new(RefCell::new(Events::default()));
    let mut session = session.with_telemetry(Box::new(RecordingSink(Rc::clone(&events))));
    let id = session.spawn_projectile(ITEM, body, sticky()).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();
    session.step(0.5);
    session.world_mut().remove_body(wall);

    let removed = session.remove_projectile(id).unwrap();

    assert_eq!(removed.item(), ITEM);
    assert!(!removed.attachment().is_attached());
    assert_eq!(session.world().joint_count(), 0);
    assert!(session.controller().projectile_for_item(ITEM).is_none());
    assert_eq!(events.borrow().errors.len(), 1);
    assert_eq!(events.borrow().errors[0].0, ErrorSeverity::Warning);

    assert!(matches!(
        session.remove_projectile(id),
        Err(BallisticsError::UnknownProjectile(_))
    ));
}

#[test]
fn test_stuck_projectile_released_when_target_removed() {
    let mut world = SandboxWorld::new();
    let wall = structure_wall(&mut world, 5.0, 1);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, _log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, sticky()).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();
    session.step(0.5);
    session.world_mut().remove_body(wall);
    session.update(0.1);

    let projectile = session.projectile(id).unwrap();
    assert_eq!(projectile.flight_state(), FlightState::Idle);
    assert!(!projectile.attachment().is_attached());
}

#[test]
fn test_owner_cleared_when_character_removed() {
    let mut world = SandboxWorld::new();
    limb(&mut world, 3.0, 6, 2);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let def = ProjectileDef {
        attack: Some(attack()),
        ..ProjectileDef::default()
    };
    let id = session.spawn_projectile(ITEM, body, def).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), Some(CharacterId(5))).unwrap();
    assert_eq!(session.projectile(id).unwrap().owner(), Some(CharacterId(5)));

    session.on_character_removed(CharacterId(5));
    assert_eq!(session.projectile(id).unwrap().owner(), None);

    session.step(0.5);
    assert_eq!(log.borrow().limb_hits, vec![(None, LimbId(6))]);
}

#[test]
fn test_contained_items_follow_projectile_on_hit() {
    let mut world = SandboxWorld::new();
    structure_wall(&mut world, 5.0, 1);
    let casing = world.add_body(BodyDesc::dynamic(CollisionShape::circle(0.02), Vec2::new(0.0, -3.0), 0.01));
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let def = ProjectileDef {
        container_capacity: 1,
        ..sticky()
    };
    let id = session.spawn_projectile(ITEM, body, def).unwrap();

    session.contain_item(id, ItemId(22), Some(casing)).unwrap();
    assert_eq!(log.borrow().contained, vec![(ITEM, ItemId(22))]);

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();
    session.step(0.5);

    assert_relative_eq!(session.world().position(casing).unwrap(), Vec2::new(4.5, 0.0));
}

#[test]
fn test_contained_item_rules() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, _log) = session(world, false);
    let def = ProjectileDef {
        container_capacity: 1,
        ..ProjectileDef::default()
    };
    let id = session.spawn_projectile(ITEM, body, def).unwrap();

    assert!(matches!(
        session.contain_item(id, ITEM, None),
        Err(BallisticsError::Contain(ContainError::SelfContainment(_)))
    ));

    session.contain_item(id, ItemId(30), None).unwrap();
    assert!(matches!(
        session.contain_item(id, ItemId(30), None),
        Err(BallisticsError::Contain(ContainError::AlreadyContained(_)))
    ));
    assert!(matches!(
        session.contain_item(id, ItemId(31), None),
        Err(BallisticsError::Contain(ContainError::Full { capacity: 1 }))
    ));

    assert!(session.remove_contained_item(id, ItemId(30)).unwrap());
    assert!(!session.remove_contained_item(id, ItemId(30)).unwrap());
    assert!(session.projectile(id).unwrap().contained_items().is_empty());
}

#[test]
fn test_spawn_rules() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let other = projectile_body(&mut world, Vec2::new(1.0, 0.0));
    let (mut session, _log) = session(world, false);
    let def = ProjectileDef {
        attack: Some(attack()),
        ..ProjectileDef::default()
    };

    let id = session.spawn_projectile(ITEM, body, def.clone()).unwrap();
    // Radius 0.05 in display units
    assert_relative_eq!(session.projectile(id).unwrap().attack().unwrap().range, 5.0);

    assert!(matches!(
        session.spawn_projectile(ITEM, other, def.clone()),
        Err(BallisticsError::DuplicateItem(_))
    ));

    session.world_mut().remove_body(other);
    assert!(matches!(
        session.spawn_projectile(ItemId(99), other, def),
        Err(BallisticsError::Physics(_))
    ));
}

#[test]
fn test_dispatch_contact_routing() {
    let mut world = SandboxWorld::new();
    let sensor = world.add_body(
        BodyDesc::fixed(CollisionShape::circle(1.0), Vec2::new(3.0, 0.0), CollisionCategory::WALL).as_sensor(),
    );
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, _log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, ProjectileDef::default()).unwrap();

    let sensor_fixture = FixtureInfo {
        body: sensor,
        is_sensor: true,
        categories: CollisionCategory::WALL,
        is_carried_item: false,
        target: TargetKind::Unknown,
    };
    let contact = Contact {
        body,
        other: sensor_fixture,
        normal: Vec2::new(-1.0, 0.0),
    };

    // Not launched yet, so nothing listens on the body
    assert!(session.dispatch_contact(contact));

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();
    assert!(!session.dispatch_contact(contact));
    assert_eq!(session.projectile(id).unwrap().flight_state(), FlightState::InFlight);
}
