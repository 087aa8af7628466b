//! Collision categories used for filtering contacts and ray candidates
//!
//! A body sits in one or more categories and carries a mask of the categories
//! it is willing to collide with.

use bitflags::bitflags;

bitflags! {
    /// Collision category bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionCategory: u32 {
        /// Walls and hull sections
        const WALL = 1 << 0;
        /// Characters and their limbs
        const CHARACTER = 1 << 1;
        /// Loose items, including spent projectiles
        const ITEM = 1 << 2;
        /// Level geometry outside vessels
        const LEVEL = 1 << 3;
        /// Projectiles in flight
        const PROJECTILE = 1 << 4;
    }
}

impl CollisionCategory {
    /// Categories that can register a projectile hit
    pub const HIT_TARGETS: Self = Self::CHARACTER.union(Self::WALL).union(Self::LEVEL);

    /// What a spent projectile still collides with
    pub const SPENT_MASK: Self = Self::WALL.union(Self::LEVEL);

    /// Check if two bodies should collide based on their categories and masks
    ///
    /// A's category must be in B's mask AND B's category must be in A's mask.
    pub fn should_collide(category_a: Self, mask_a: Self, category_b: Self, mask_b: Self) -> bool {
        category_a.intersects(mask_b) && category_b.intersects(mask_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionCategory::should_collide(
            CollisionCategory::PROJECTILE,
            CollisionCategory::HIT_TARGETS,
            CollisionCategory::WALL,
            CollisionCategory::all(),
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Spent projectile no longer wants characters
        assert!(!CollisionCategory::should_collide(
            CollisionCategory::ITEM,
            CollisionCategory::SPENT_MASK,
            CollisionCategory::CHARACTER,
            CollisionCategory::all(),
        ));
    }

    #[test]
    fn test_hit_targets_mask() {
        assert_eq!(
            CollisionCategory::HIT_TARGETS,
            CollisionCategory::CHARACTER | CollisionCategory::WALL | CollisionCategory::LEVEL
        );
    }
}
