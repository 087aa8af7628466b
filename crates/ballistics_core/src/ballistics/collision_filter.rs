//! Collision filter
//!
//! Decides whether a fixture may register a hit. The decision depends only on
//! the fixture and the projectile's ignore set, never on call order.

use std::collections::HashSet;

use crate::foundation::logging::trace;
use crate::physics::{BodyHandle, CollisionCategory, FixtureInfo};

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    /// Hitscan ray intersection
    Ray,
    /// Narrow-phase contact of a simulated projectile
    Simulated,
}

/// Why a candidate was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Sensor fixture
    Sensor,
    /// Fixture of a carried item
    CarriedItem,
    /// Category is none of character, wall or level
    Category,
    /// Body is in the projectile's ignore set
    Ignored,
    /// Character hull rather than an individual limb
    CharacterHull,
}

/// Checks that only need the fixture, used to pre-filter ray results
pub fn check_fixture(fixture: &FixtureInfo) -> Result<(), Rejection> {
    if fixture.is_sensor {
        return Err(Rejection::Sensor);
    }
    if fixture.is_carried_item {
        return Err(Rejection::CarriedItem);
    }
    if !fixture.categories.intersects(CollisionCategory::HIT_TARGETS) {
        return Err(Rejection::Category);
    }
    Ok(())
}

/// Full eligibility check for a candidate
pub fn check(
    fixture: &FixtureInfo,
    ignored: &HashSet<BodyHandle>,
    source: ContactSource,
) -> Result<(), Rejection> {
    check_fixture(fixture)?;

    if ignored.contains(&fixture.body) {
        return Err(Rejection::Ignored);
    }
    if source == ContactSource::Simulated
        && fixture.categories.contains(CollisionCategory::CHARACTER)
        && !fixture.target.is_limb()
    {
        return Err(Rejection::CharacterHull);
    }
    Ok(())
}

/// Whether the candidate may register a hit
pub fn is_eligible(fixture: &FixtureInfo, ignored: &HashSet<BodyHandle>, source: ContactSource) -> bool {
    match check(fixture, ignored, source) {
        Ok(()) => true,
        Err(reason) => {
            trace!("Rejected {:?} candidate {:?}: {reason:?}", source, fixture.body);
            false
        }
    }
}
