//! Math utilities and types
//!
//! Provides the 2D math types used by the simulation.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Unit vector pointing along a body's facing angle (radians)
pub fn facing(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

/// Math utility functions
pub mod utils {
    /// Length of the half-diagonal of a `width` x `height` rectangle
    pub fn half_diagonal(width: f32, height: f32) -> f32 {
        (width * 0.5).hypot(height * 0.5)
    }
}
