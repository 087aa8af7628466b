use approx::assert_relative_eq;

use super::{attack, limb, projectile_body, session, structure_wall};
use crate::ballistics::Frame;
use crate::foundation::math::Vec2;
use crate::physics::{
    BodyDesc, CollisionCategory, CollisionShape, ItemId, PhysicsWorld, SandboxWorld, StructureId, TargetKind,
    VesselId,
};
use crate::projectile::{FlightState, ProjectileDef};

const ITEM: ItemId = ItemId(11);

fn hitscan_def() -> ProjectileDef {
    ProjectileDef {
        hitscan: true,
        attack: Some(attack()),
        ..ProjectileDef::default()
    }
}

#[test]
fn test_lost_shot_outdoors_is_queued_for_removal() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();

    assert!(session.fire(id, Vec2::new(1.0, 0.0), None).unwrap());

    let projectile = session.projectile(id).unwrap();
    assert_eq!(projectile.flight_state(), FlightState::Resolved);
    assert!(!projectile.is_active());
    assert!(session.controller().pending_removals().contains(ITEM));
    assert!(log.borrow().limb_hits.is_empty());
    assert!(log.borrow().structure_hits.is_empty());

    // Queued projectiles cannot be fired again
    assert!(!session.fire(id, Vec2::new(1.0, 0.0), None).unwrap());

    assert_eq!(session.drain_removals(), vec![ITEM]);
    assert!(session.projectile(id).is_none());
    assert!(session.controller().projectile_for_item(ITEM).is_none());
}

#[test]
fn test_lost_shot_indoors_is_queued_for_removal() {
    let mut world = SandboxWorld::new();
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    session.add_vessel(VesselId(1), Vec2::new(50.0, 0.0));
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();
    session.place_in_frame(id, Frame::Vessel(VesselId(1))).unwrap();

    session.fire(id, Vec2::new(0.0, 1.0), None).unwrap();

    assert_eq!(session.projectile(id).unwrap().flight_state(), FlightState::Resolved);
    assert!(session.controller().pending_removals().contains(ITEM));
    assert!(log.borrow().effects.is_empty());
}

#[test]
fn test_hitscan_hits_closest_candidate_first() {
    let mut world = SandboxWorld::new();
    // Far wall registered first so body order and distance order disagree
    structure_wall(&mut world, 9.0, 9);
    structure_wall(&mut world, 3.0, 3);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    assert_eq!(log.borrow().structure_hits, vec![StructureId(3)]);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(2.5, 0.0));
    assert_relative_eq!(session.world().linear_velocity(body), Vec2::new(0.5, 0.0));

    let projectile = session.projectile(id).unwrap();
    assert_eq!(projectile.flight_state(), FlightState::Idle);
    assert!(!projectile.is_active());
}

#[test]
fn test_hitscan_skips_ignored_and_carried_candidates() {
    let mut world = SandboxWorld::new();
    let near = structure_wall(&mut world, 3.0, 3);
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(0.5, 0.5), Vec2::new(1.5, 0.0), CollisionCategory::CHARACTER)
            .as_carried_item(),
    );
    structure_wall(&mut world, 9.0, 9);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();
    session.ignore_body(id, near).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    assert_eq!(log.borrow().structure_hits, vec![StructureId(9)]);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(8.5, 0.0));
}

#[test]
fn test_hitscan_passes_vessel_hull_to_target_behind() {
    let mut world = SandboxWorld::new();
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 4.0), Vec2::new(3.0, 0.0), CollisionCategory::WALL)
            .with_target(TargetKind::Vessel(VesselId(1))),
    );
    structure_wall(&mut world, 6.0, 6);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    session.add_vessel(VesselId(1), Vec2::new(100.0, 0.0));
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    let projectile = session.projectile(id).unwrap();
    assert_eq!(log.borrow().structure_hits, vec![StructureId(6)]);
    assert_eq!(projectile.frame(), Frame::Exterior);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(5.5, 0.0));
}

#[test]
fn test_indoor_shot_reaches_exterior_geometry() {
    let mut world = SandboxWorld::new();
    structure_wall(&mut world, 20.0, 4);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    session.add_vessel(VesselId(1), Vec2::new(10.0, 0.0));
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();
    session.place_in_frame(id, Frame::Vessel(VesselId(1))).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    // The exterior copy of the wall is closer once the vessel offset applies,
    // and the hit point comes back in the firing frame
    assert_eq!(log.borrow().structure_hits, vec![StructureId(4)]);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(9.5, 0.0));
}

#[test]
fn test_hitscan_sticks_into_limb() {
    let mut world = SandboxWorld::new();
    let target = limb(&mut world, 4.0, 2, 8);
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    let def = ProjectileDef {
        stick_to_characters: true,
        visual_extent: 50.0,
        ..hitscan_def()
    };
    let id = session.spawn_projectile(ITEM, body, def).unwrap();

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    let projectile = session.projectile(id).unwrap();
    assert_eq!(projectile.flight_state(), FlightState::Stuck);
    assert!(projectile.is_active());
    assert_eq!(projectile.attachment().target(), Some(target));
    assert_eq!(log.borrow().limb_hits.len(), 1);

    let joint = projectile.attachment().joint().unwrap();
    let (lower, upper) = session.world().joint_limits(joint).unwrap();
    assert_relative_eq!(lower, -0.15);
    assert_relative_eq!(upper, 0.15);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(3.7, 0.0), epsilon = 1e-5);
}

#[test]
fn test_vessel_target_behind_full_exterior_candidate_list() {
    let mut world = SandboxWorld::new();
    // Enough ignored walls to fill the exterior cast up to the candidate cap
    let ignored: Vec<_> = (0..25)
        .map(|i| {
            world.add_body(BodyDesc::fixed(
                CollisionShape::rectangle(0.1, 4.0),
                Vec2::new(1.0 + i as f32 * 0.5, 0.0),
                CollisionCategory::WALL,
            ))
        })
        .collect();
    // Interior of a vessel parked 50 units up, so this sits at exterior x = 30
    world.add_body(
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 4.0), Vec2::new(30.0, -50.0), CollisionCategory::WALL)
            .with_target(TargetKind::Structure(StructureId(30))),
    );
    let body = projectile_body(&mut world, Vec2::zeros());
    let (mut session, log) = session(world, false);
    session.add_vessel(VesselId(1), Vec2::new(0.0, 50.0));
    let id = session.spawn_projectile(ITEM, body, hitscan_def()).unwrap();
    for wall in ignored {
        session.ignore_body(id, wall).unwrap();
    }

    session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

    assert_eq!(log.borrow().structure_hits, vec![StructureId(30)]);
    assert_relative_eq!(session.world().position(body).unwrap(), Vec2::new(29.5, 0.0));
    assert_ne!(session.projectile(id).unwrap().flight_state(), FlightState::Resolved);
    assert!(!session.controller().pending_removals().contains(ITEM));
}

#[test]
fn test_remove_on_hit_queues_item_without_sticking() {
    for stick in [true, false] {
        let mut world = SandboxWorld::new();
        structure_wall(&mut world, 5.0, 5);
        let body = projectile_body(&mut world, Vec2::zeros());
        let (mut session, log) = session(world, false);
        let def = ProjectileDef {
            remove_on_hit: true,
            stick_to_structures: stick,
            visual_extent: 100.0,
            ..hitscan_def()
        };
        let id = session.spawn_projectile(ITEM, body, def).unwrap();

        session.fire(id, Vec2::new(1.0, 0.0), None).unwrap();

        let projectile = session.projectile(id).unwrap();
        assert_eq!(log.borrow().structure_hits, vec![StructureId(5)], "stick = {stick}");
        assert_eq!(projectile.flight_state(), FlightState::Resolved, "stick = {stick}");
        assert!(!projectile.attachment().is_attached(), "stick = {stick}");
        assert!(session.controller().pending_removals().contains(ITEM), "stick = {stick}");
        assert_eq!(session.world().joint_count(), 0, "stick = {stick}");
    }
}
