//! Launch and flight controller
//!
//! Owns every projectile of a session and drives them through their
//! lifecycle: firing (simulated launch or hitscan), contact resolution,
//! per-tick updates, and teardown. The physics world is passed into every
//! call that touches it, so the controller can be driven from inside a
//! physics step.

use std::collections::HashMap;

use slotmap::SlotMap;

use super::contained::ContainedItem;
use super::definition::FlightMode;
use super::registry::ContactRegistry;
use super::{FlightState, Projectile, ProjectileDef, ProjectileId};
use crate::ballistics::collision_filter::{self, ContactSource};
use crate::ballistics::damage::{self, DamageModel, HitOutcome, Impact, Resolution};
use crate::ballistics::{AttachRequest, Frame, RayQuery, Release, VesselFrames};
use crate::collaborators::{
    ActionType, ErrorSeverity, InventoryHooks, Noop, RemovalQueue, StatusEffects, Telemetry,
};
use crate::config::BallisticsConfig;
use crate::error::{BallisticsError, Result};
use crate::foundation::logging::{debug, trace, warn};
use crate::foundation::math::{facing, Vec2};
use crate::physics::{
    BodyHandle, CharacterId, CollisionCategory, Contact, FixtureInfo, ItemId, PhysicsError, PhysicsWorld, VesselId,
};

/// What happened to a single contact or ray candidate
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContactOutcome {
    /// Not a valid hit for this projectile
    Filtered,
    /// Entered a vessel and keeps flying
    PassThrough,
    /// The hit consumed the shot
    Resolved {
        stuck: bool,
    },
}

/// Launch/flight controller for every projectile in a session
pub struct FlightController {
    config: BallisticsConfig,
    frames: VesselFrames,
    projectiles: SlotMap<ProjectileId, Projectile>,
    by_item: HashMap<ItemId, ProjectileId>,
    contacts: ContactRegistry,
    removals: RemovalQueue,
    damage: Box<dyn DamageModel>,
    effects: Box<dyn StatusEffects>,
    inventory: Box<dyn InventoryHooks>,
    telemetry: Telemetry,
}

impl FlightController {
    /// Create a controller with no-op status effects and inventory hooks
    pub fn new(config: BallisticsConfig, damage: Box<dyn DamageModel>) -> Self {
        Self {
            config,
            frames: VesselFrames::new(),
            projectiles: SlotMap::with_key(),
            by_item: HashMap::new(),
            contacts: ContactRegistry::new(),
            removals: RemovalQueue::new(),
            damage,
            effects: Box::new(Noop),
            inventory: Box::new(Noop),
            telemetry: Telemetry::default(),
        }
    }

    /// Install the status-effect collaborator
    pub fn set_status_effects(&mut self, effects: Box<dyn StatusEffects>) {
        self.effects = effects;
    }

    /// Install the inventory collaborator
    pub fn set_inventory(&mut self, inventory: Box<dyn InventoryHooks>) {
        self.inventory = inventory;
    }

    /// Install the telemetry front end
    pub fn set_telemetry(&mut self, telemetry: Telemetry) {
        self.telemetry = telemetry;
    }

    /// Session tunables
    pub fn config(&self) -> &BallisticsConfig {
        &self.config
    }

    /// Loaded vessel frames
    pub fn frames(&self) -> &VesselFrames {
        &self.frames
    }

    /// Look up a projectile
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    /// Projectile backed by `item`
    pub fn projectile_for_item(&self, item: ItemId) -> Option<ProjectileId> {
        self.by_item.get(&item).copied()
    }

    /// Every projectile, in a stable order
    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter()
    }

    /// Bodies currently routed to projectiles
    pub fn contacts(&self) -> &ContactRegistry {
        &self.contacts
    }

    /// Items waiting for removal
    pub fn pending_removals(&self) -> &RemovalQueue {
        &self.removals
    }

    /// Register a projectile for `item`, whose physics body is `body`
    ///
    /// An attack without a range gets one derived from the body's shape.
    pub fn spawn<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &W,
        item: ItemId,
        body: BodyHandle,
        mut def: ProjectileDef,
    ) -> Result<ProjectileId> {
        if self.by_item.contains_key(&item) {
            return Err(BallisticsError::DuplicateItem(item));
        }
        let shape = world.shape(body).ok_or(PhysicsError::BodyNotFound(body))?;
        if let Some(attack) = def.attack.as_mut() {
            attack.ensure_range(&shape, &self.config);
        }

        let id = self.projectiles.insert(Projectile::new(item, body, def));
        self.by_item.insert(item, id);
        debug!("Spawned projectile {id:?} for {item:?}");
        Ok(id)
    }

    /// Let the projectile pass through `body` (usually the firer's limbs)
    pub fn ignore_body(&mut self, id: ProjectileId, body: BodyHandle) -> Result<()> {
        self.get_mut(id)?.ignored_bodies.insert(body);
        Ok(())
    }

    /// Record which frame the projectile's body is simulated in
    pub fn place_in_frame(&mut self, id: ProjectileId, frame: Frame) -> Result<()> {
        self.get_mut(id)?.frame = frame;
        Ok(())
    }

    /// Register a vessel at `position` (exterior coordinates)
    pub fn add_vessel(&mut self, vessel: VesselId, position: Vec2) {
        self.frames.insert(vessel, position);
    }

    /// Update a vessel's position, returning false for unknown vessels
    pub fn vessel_moved(&mut self, vessel: VesselId, position: Vec2) -> bool {
        if self.frames.position(vessel).is_none() {
            return false;
        }
        self.frames.insert(vessel, position);
        true
    }

    /// Unload a vessel
    ///
    /// Projectiles still simulated inside it move back to the exterior at
    /// the exterior position they occupied while the vessel was loaded.
    pub fn remove_vessel<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, vessel: VesselId) -> Option<Vec2> {
        let frame = Frame::Vessel(vessel);
        for projectile in self.projectiles.values_mut().filter(|p| p.frame == frame) {
            let body = projectile.body;
            if let Some(position) = world.position(body) {
                let rotation = world.rotation(body).unwrap_or_default();
                world.set_transform(body, self.frames.convert(position, frame, Frame::Exterior), rotation);
            }
            projectile.frame = Frame::Exterior;
            debug!("{:?} left unloaded {vessel:?}", projectile.item);
        }
        self.frames.remove(vessel)
    }

    /// Put an item inside the projectile
    pub fn contain_item(&mut self, id: ProjectileId, item: ItemId, body: Option<BodyHandle>) -> Result<()> {
        let projectile = self.projectiles.get_mut(id).ok_or(BallisticsError::UnknownProjectile(id))?;
        projectile.contained.insert(projectile.item, ContainedItem { item, body })?;
        self.inventory.item_contained(projectile.item, item);
        Ok(())
    }

    /// Take an item out of the projectile
    pub fn remove_contained_item(&mut self, id: ProjectileId, item: ItemId) -> Result<bool> {
        let projectile = self.projectiles.get_mut(id).ok_or(BallisticsError::UnknownProjectile(id))?;
        let removed = projectile.contained.remove(item);
        if removed {
            self.inventory.item_removed(projectile.item, item);
        }
        Ok(removed)
    }

    /// Stop attributing damage to a character that left the world
    pub fn on_character_removed(&mut self, character: CharacterId) {
        for projectile in self.projectiles.values_mut() {
            if projectile.owner == Some(character) {
                projectile.owner = None;
            }
        }
    }

    /// Fire the projectile along `direction`
    ///
    /// Returns `Ok(false)` if `firer` may not use the item or the projectile
    /// is already queued for removal. A zero direction falls back to the
    /// body's facing.
    pub fn fire<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        id: ProjectileId,
        direction: Vec2,
        firer: Option<CharacterId>,
    ) -> Result<bool> {
        let projectile = self.projectiles.get_mut(id).ok_or(BallisticsError::UnknownProjectile(id))?;
        if projectile.flight == FlightState::Resolved {
            debug!("{:?} is queued for removal and cannot be fired", projectile.item);
            return Ok(false);
        }
        if firer.is_some() && !projectile.def.character_usable {
            debug!("{:?} cannot be fired by a character", projectile.item);
            return Ok(false);
        }

        let body = projectile.body;
        if !world.body_exists(body) {
            return Err(PhysicsError::BodyNotFound(body).into());
        }
        let direction = direction
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| facing(world.rotation(body).unwrap_or_default()));

        // Re-firing something still stuck in a target
        if projectile.attachment.is_attached() {
            let release = projectile.attachment.release(world, body);
            report_release(&mut self.telemetry, release);
        }

        projectile.owner = firer;
        self.inventory.drop_item(projectile.item);
        world.set_enabled(body, true);
        projectile.active = true;
        projectile.flight = FlightState::InFlight;

        let mode = projectile.mode();
        debug!("Firing {:?} ({mode:?}) along {direction:?}", projectile.item);
        self.telemetry.design_event("Projectile:Fired", None);

        match mode {
            FlightMode::Simulated => self.launch(world, id, direction),
            FlightMode::Hitscan => self.hitscan(world, id, direction),
        }
        Ok(true)
    }

    /// Fire along the body's current facing
    pub fn use_item<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        id: ProjectileId,
        character: Option<CharacterId>,
    ) -> Result<bool> {
        let body = self.get(id)?.body;
        let rotation = world.rotation(body).ok_or(PhysicsError::BodyNotFound(body))?;
        self.fire(world, id, facing(rotation), character)
    }

    fn launch<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, id: ProjectileId, direction: Vec2) {
        let Some(projectile) = self.projectiles.get(id) else {
            return;
        };
        let body = projectile.body;

        world.apply_linear_impulse(body, direction * projectile.def.launch_impulse * world.mass(body));
        world.set_bullet(body, true);
        world.set_collision_filter(body, CollisionCategory::PROJECTILE, CollisionCategory::HIT_TARGETS);
        self.contacts.register(body, id);
    }

    fn hitscan<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, id: ProjectileId, direction: Vec2) {
        let Some(projectile) = self.projectiles.get(id) else {
            return;
        };
        let (body, item, origin) = (projectile.body, projectile.item, projectile.frame);
        let rotation = world.rotation(body).unwrap_or_default();

        // Not integrated, only read back as the incoming direction
        world.set_linear_velocity(body, direction);

        let start = world.position(body).unwrap_or_else(Vec2::zeros);
        let end = start + direction * self.config.hitscan_range;
        let candidates = RayQuery::new(&*world, self.config.max_ray_candidates).cast_across_frames(
            &self.frames,
            origin,
            start,
            end,
            |fixture| collision_filter::check_fixture(fixture).is_ok(),
        );
        trace!("Hitscan from {start:?} found {} candidates", candidates.len());

        for candidate in &candidates {
            world.set_transform(body, candidate.point, rotation);
            let outcome =
                self.resolve_contact(world, id, &candidate.fixture, candidate.normal, ContactSource::Ray);
            if matches!(outcome, ContactOutcome::Resolved { .. }) {
                return;
            }
        }

        // Nothing along the ray: the shot left the playable area
        if let Some(projectile) = self.projectiles.get_mut(id) {
            projectile.flight = FlightState::Resolved;
            projectile.active = false;
        }
        self.removals.queue(item);
        self.telemetry.design_event("Projectile:ShotLost", None);
        debug!("Hitscan shot of {item:?} hit nothing and is lost");
    }

    /// Route a physics contact to the projectile registered on its body
    ///
    /// Returns whether the engine should apply a collision response. Contacts
    /// on bodies no projectile listens to always get one.
    pub fn dispatch_contact<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, contact: Contact) -> bool {
        let Some(id) = self.contacts.lookup(contact.body) else {
            return true;
        };

        match self.resolve_contact(world, id, &contact.other, contact.normal, ContactSource::Simulated) {
            ContactOutcome::Filtered => false,
            ContactOutcome::PassThrough => true,
            ContactOutcome::Resolved { stuck } => !stuck,
        }
    }

    fn resolve_contact<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        id: ProjectileId,
        fixture: &FixtureInfo,
        normal: Vec2,
        source: ContactSource,
    ) -> ContactOutcome {
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return ContactOutcome::Filtered;
        };
        if projectile.flight != FlightState::InFlight {
            return ContactOutcome::Filtered;
        }
        if !collision_filter::is_eligible(fixture, &projectile.ignored_bodies, source) {
            return ContactOutcome::Filtered;
        }

        let body = projectile.body;
        let position = world.position(body).unwrap_or_else(Vec2::zeros);
        let impact = Impact {
            item: projectile.item,
            body,
            target: fixture,
            normal,
            point: self.frames.convert(position, projectile.frame, Frame::Exterior),
            attacker: projectile.owner,
            attack: projectile.def.attack.as_ref(),
            stick_policy: projectile.stick_policy,
        };

        match damage::resolve(world, self.damage.as_mut(), self.effects.as_mut(), &self.config, &impact) {
            Resolution::EnterVessel(vessel) => {
                if source == ContactSource::Ray {
                    trace!("Hitscan skips hull of {vessel:?}");
                    return ContactOutcome::Filtered;
                }
                if self.frames.position(vessel).is_none() {
                    trace!("{:?} crosses hull of unloaded {vessel:?}", projectile.item);
                    return ContactOutcome::Filtered;
                }
                let into = Frame::Vessel(vessel);
                let local = self.frames.convert(position, projectile.frame, into);
                let rotation = world.rotation(body).unwrap_or_default();
                world.set_transform(body, local, rotation);
                projectile.frame = into;
                debug!("{:?} entered {vessel:?}", projectile.item);
                ContactOutcome::PassThrough
            }
            Resolution::Resolved(hit) => {
                let stuck = self.finish_hit(world, id, fixture.body, hit);
                ContactOutcome::Resolved { stuck }
            }
        }
    }

    /// Bookkeeping shared by every resolved hit, returns whether the projectile stuck
    fn finish_hit<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        id: ProjectileId,
        target: BodyHandle,
        hit: HitOutcome,
    ) -> bool {
        let config = &self.config;
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return false;
        };
        let body = projectile.body;

        projectile.ignored_bodies.clear();
        self.contacts.unregister(body);

        let remove = projectile.def.remove_on_hit;
        let mut stuck = false;
        if hit.stick_eligible && !remove {
            let request = AttachRequest {
                projectile: body,
                target,
                anchor: world.position(body).unwrap_or_else(Vec2::zeros),
                axis: facing(world.rotation(body).unwrap_or_default()),
                extent: config.to_sim_units(projectile.def.visual_extent),
            };
            match projectile.attachment.attach(world, &request, config) {
                Ok(_) => stuck = projectile.attachment.is_attached(),
                Err(e) => warn!("Failed to stick {:?} into {target:?}: {e}", projectile.item),
            }
        }

        projectile.flight = if stuck { FlightState::Stuck } else { FlightState::Idle };
        projectile.active = stuck || world.is_bullet(body);

        if let Some(position) = world.position(body) {
            for contained in projectile.contained.iter() {
                let Some(contained_body) = contained.body.filter(|b| world.body_exists(*b)) else {
                    continue;
                };
                let rotation = world.rotation(contained_body).unwrap_or_default();
                world.set_transform(contained_body, position, rotation);
            }
        }

        if remove {
            projectile.flight = FlightState::Resolved;
            projectile.active = false;
            self.removals.queue(projectile.item);
        }

        debug!(
            "{:?} hit {target:?}: damage {}, deflected {}, stuck {stuck}",
            projectile.item, hit.damage_applied, hit.deflected
        );
        self.telemetry.design_event("Projectile:Hit", Some(f64::from(hit.damage_applied)));
        stuck
    }

    /// Per-tick update of every active projectile
    pub fn update<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, dt: f32) {
        let threshold_sq = self.config.continuous_collision_threshold.powi(2);
        let active: Vec<ProjectileId> = self
            .projectiles
            .iter()
            .filter(|(_, p)| p.active && p.flight != FlightState::Resolved)
            .map(|(id, _)| id)
            .collect();

        for id in active {
            let Some(projectile) = self.projectiles.get_mut(id) else {
                continue;
            };
            let body = projectile.body;

            self.effects.apply(projectile.item, ActionType::OnActive, dt, None);

            if world.is_bullet(body) && world.linear_velocity(body).norm_squared() < threshold_sq {
                world.set_bullet(body, false);
                // Stuck projectiles stay active until the joint lets go
                if !projectile.attachment.is_attached() {
                    projectile.active = false;
                }
            }

            if let Some(release) = projectile.attachment.tick(world, body, dt, &self.config) {
                report_release(&mut self.telemetry, release);
                if projectile.flight == FlightState::Stuck {
                    projectile.flight = FlightState::Idle;
                }
                if !world.is_bullet(body) {
                    projectile.active = false;
                }
            }
        }
    }

    /// Tear a projectile down and forget it
    ///
    /// Any stick joint is released; a target that is already gone is not an error.
    pub fn remove<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, id: ProjectileId) -> Result<Projectile> {
        let mut projectile = self.projectiles.remove(id).ok_or(BallisticsError::UnknownProjectile(id))?;

        if projectile.attachment.is_attached() {
            let release = projectile.attachment.release(world, projectile.body);
            report_release(&mut self.telemetry, release);
            if projectile.flight == FlightState::Stuck {
                projectile.flight = FlightState::Idle;
            }
        }
        self.contacts.unregister(projectile.body);
        self.by_item.remove(&projectile.item);

        debug!("Removed projectile {id:?} ({:?})", projectile.item);
        Ok(projectile)
    }

    /// Tear down every projectile queued for removal and hand back their items
    pub fn drain_removals<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) -> Vec<ItemId> {
        let items = self.removals.drain();
        for item in &items {
            let Some(id) = self.by_item.get(item).copied() else {
                continue;
            };
            if let Err(e) = self.remove(world, id) {
                warn!("Failed to remove projectile of {item:?}: {e}");
            }
        }
        items
    }

    fn get(&self, id: ProjectileId) -> Result<&Projectile> {
        self.projectiles.get(id).ok_or(BallisticsError::UnknownProjectile(id))
    }

    fn get_mut(&mut self, id: ProjectileId) -> Result<&mut Projectile> {
        self.projectiles.get_mut(id).ok_or(BallisticsError::UnknownProjectile(id))
    }
}

fn report_release(telemetry: &mut Telemetry, release: Release) {
    telemetry.design_event("Projectile:StickReleased", None);
    if !release.is_clean() {
        telemetry.error_event_once(
            "Projectile.StickTargetRemoved",
            ErrorSeverity::Warning,
            "Stick joint released after its target was removed from the world",
        );
    }
}
