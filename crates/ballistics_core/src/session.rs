//! Simulation session
//!
//! A session owns the physics world and the flight controller for one
//! simulation. Everything runs on the thread that owns the session.

use crate::ballistics::{DamageModel, Frame};
use crate::collaborators::{InventoryHooks, StatusEffects, Telemetry, TelemetrySink};
use crate::config::{BallisticsConfig, Config};
use crate::error::Result;
use crate::foundation::logging::info;
use crate::foundation::math::Vec2;
use crate::physics::{BodyHandle, CharacterId, Contact, ItemId, PhysicsWorld, SandboxWorld, VesselId};
use crate::projectile::{FlightController, Projectile, ProjectileDef, ProjectileId};

/// Physics world plus the projectiles living in it
pub struct BallisticsSession<W: PhysicsWorld> {
    world: W,
    controller: FlightController,
}

impl<W: PhysicsWorld> BallisticsSession<W> {
    /// Create a session over `world`
    pub fn new(world: W, config: BallisticsConfig, damage: Box<dyn DamageModel>) -> Self {
        info!(
            "Ballistics session created (hitscan range {}, {} ray candidates)",
            config.hitscan_range, config.max_ray_candidates
        );
        Self {
            world,
            controller: FlightController::new(config, damage),
        }
    }

    /// Create a session with tunables loaded from a `.toml` or `.ron` file
    pub fn from_config_file(
        world: W,
        path: impl AsRef<std::path::Path>,
        damage: Box<dyn DamageModel>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let config = BallisticsConfig::load_from_file(path)?;
        info!("Loaded ballistics config from {}", path.display());
        Ok(Self::new(world, config, damage))
    }

    /// Install the status-effect collaborator
    #[must_use]
    pub fn with_status_effects(mut self, effects: Box<dyn StatusEffects>) -> Self {
        self.controller.set_status_effects(effects);
        self
    }

    /// Install the inventory collaborator
    #[must_use]
    pub fn with_inventory(mut self, inventory: Box<dyn InventoryHooks>) -> Self {
        self.controller.set_inventory(inventory);
        self
    }

    /// Report analytics to `sink`
    #[must_use]
    pub fn with_telemetry(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.controller.set_telemetry(Telemetry::new(sink));
        self
    }

    /// The physics world
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the physics world
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The flight controller
    pub fn controller(&self) -> &FlightController {
        &self.controller
    }

    /// Session tunables
    pub fn config(&self) -> &BallisticsConfig {
        self.controller.config()
    }

    /// Look up a projectile
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.controller.projectile(id)
    }

    /// Register a projectile for `item` backed by `body`
    pub fn spawn_projectile(&mut self, item: ItemId, body: BodyHandle, def: ProjectileDef) -> Result<ProjectileId> {
        self.controller.spawn(&self.world, item, body, def)
    }

    /// Let the projectile pass through `body`
    pub fn ignore_body(&mut self, id: ProjectileId, body: BodyHandle) -> Result<()> {
        self.controller.ignore_body(id, body)
    }

    /// Record the frame the projectile's body lives in
    pub fn place_in_frame(&mut self, id: ProjectileId, frame: Frame) -> Result<()> {
        self.controller.place_in_frame(id, frame)
    }

    /// Fire along `direction`; `Ok(false)` if the firer may not use the item
    pub fn fire(&mut self, id: ProjectileId, direction: Vec2, firer: Option<CharacterId>) -> Result<bool> {
        self.controller.fire(&mut self.world, id, direction, firer)
    }

    /// Fire along the body's facing
    pub fn use_item(&mut self, id: ProjectileId, character: Option<CharacterId>) -> Result<bool> {
        self.controller.use_item(&mut self.world, id, character)
    }

    /// Per-tick update
    pub fn update(&mut self, dt: f32) {
        self.controller.update(&mut self.world, dt);
    }

    /// Route a physics contact, returning whether the engine should respond to it
    pub fn dispatch_contact(&mut self, contact: Contact) -> bool {
        self.controller.dispatch_contact(&mut self.world, contact)
    }

    /// Tear down a projectile immediately
    pub fn remove_projectile(&mut self, id: ProjectileId) -> Result<Projectile> {
        self.controller.remove(&mut self.world, id)
    }

    /// Tear down queued projectiles and return their items for removal
    pub fn drain_removals(&mut self) -> Vec<ItemId> {
        self.controller.drain_removals(&mut self.world)
    }

    /// Clear `character` as owner of every projectile
    pub fn on_character_removed(&mut self, character: CharacterId) {
        self.controller.on_character_removed(character);
    }

    /// Register a vessel frame
    pub fn add_vessel(&mut self, vessel: VesselId, position: Vec2) {
        self.controller.add_vessel(vessel, position);
    }

    /// Move a vessel frame
    pub fn vessel_moved(&mut self, vessel: VesselId, position: Vec2) -> bool {
        self.controller.vessel_moved(vessel, position)
    }

    /// Unload a vessel frame
    pub fn remove_vessel(&mut self, vessel: VesselId) -> Option<Vec2> {
        self.controller.remove_vessel(&mut self.world, vessel)
    }

    /// Put an item inside a projectile
    pub fn contain_item(&mut self, id: ProjectileId, item: ItemId, body: Option<BodyHandle>) -> Result<()> {
        self.controller.contain_item(id, item, body)
    }

    /// Take an item out of a projectile
    pub fn remove_contained_item(&mut self, id: ProjectileId, item: ItemId) -> Result<bool> {
        self.controller.remove_contained_item(id, item)
    }
}

impl BallisticsSession<SandboxWorld> {
    /// Step the sandbox world with contacts routed to projectiles, then update
    pub fn step(&mut self, dt: f32) {
        let controller = &mut self.controller;
        self.world
            .step_with(dt, &mut |world: &mut SandboxWorld, contact: Contact| {
                controller.dispatch_contact(world, contact)
            });
        self.controller.update(&mut self.world, dt);
    }
}
