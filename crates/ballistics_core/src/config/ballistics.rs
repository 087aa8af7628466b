//! Session-wide ballistics tunables

use serde::{Deserialize, Serialize};

use super::Config;

/// Tunables shared by every projectile in a session
///
/// Defaults match the shipped game balance. Missing keys in a config file
/// fall back to these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallisticsConfig {
    /// Continuous collision detection stays on while speed exceeds this
    pub continuous_collision_threshold: f32,

    /// Grace period after attaching during which a stick joint never auto-releases
    pub stick_grace_duration: f32,

    /// Length of a hitscan ray in simulation units
    pub hitscan_range: f32,

    /// Upper bound on candidates collected per ray query
    pub max_ray_candidates: usize,

    /// Stick joint travel limit as a fraction of the projectile's visual extent
    pub stick_limit_fraction: f32,

    /// Fraction of a travel limit past which the stick joint is torn down
    pub stick_release_fraction: f32,

    /// Motor force cap resisting free sliding along the stick joint
    pub stick_motor_max_force: f32,

    /// Velocity multiplier applied when armor deflects the projectile
    pub deflect_velocity_scale: f32,

    /// Velocity multiplier applied on any other resolved hit
    pub hit_velocity_scale: f32,

    /// Display units per simulation unit (sprite sizes and damage ranges are in display units)
    pub display_units_per_sim_unit: f32,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            continuous_collision_threshold: 5.0,
            stick_grace_duration: 1.0,
            hitscan_range: 1000.0,
            max_ray_candidates: 25,
            stick_limit_fraction: 0.3,
            stick_release_fraction: 0.9,
            stick_motor_max_force: 30.0,
            deflect_velocity_scale: 0.1,
            hit_velocity_scale: 0.5,
            display_units_per_sim_unit: 100.0,
        }
    }
}

impl Config for BallisticsConfig {}

impl BallisticsConfig {
    /// Convert a display-space length to simulation units
    pub fn to_sim_units(&self, display: f32) -> f32 {
        display / self.display_units_per_sim_unit
    }

    /// Convert a simulation-space length to display units
    pub fn to_display_units(&self, sim: f32) -> f32 {
        sim * self.display_units_per_sim_unit
    }
}
