//! Ray query adapter
//!
//! Wraps [`PhysicsWorld::ray_cast`] and turns the engine's unordered visits
//! into a bounded list of candidates sorted closest first. Queries can be run
//! in several vessel frames and merged; every candidate point is expressed in
//! the frame the shot was fired from.

use crate::foundation::logging::trace;
use crate::foundation::math::Vec2;
use crate::physics::{FixtureInfo, PhysicsWorld, RayCastControl};

use super::frames::{Frame, VesselFrames};

/// A fixture crossed by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateHit {
    /// Crossed fixture
    pub fixture: FixtureInfo,
    /// Intersection point in the firing frame
    pub point: Vec2,
    /// Surface normal at the intersection
    pub normal: Vec2,
    /// Position along the ray, 0 at start and 1 at end
    pub fraction: f32,
    /// Frame the fixture lives in
    pub frame: Frame,
}

/// Ray queries against a physics world
pub struct RayQuery<'w, W: ?Sized> {
    world: &'w W,
    max_candidates: usize,
}

impl<'w, W: PhysicsWorld + ?Sized> RayQuery<'w, W> {
    /// Query `world`, keeping at most `max_candidates` per cast
    pub fn new(world: &'w W, max_candidates: usize) -> Self {
        Self { world, max_candidates }
    }

    /// Cast in a single frame
    ///
    /// Fixtures `accept` turns down do not count towards the candidate cap.
    pub fn cast(&self, start: Vec2, end: Vec2, accept: impl Fn(&FixtureInfo) -> bool) -> Vec<CandidateHit> {
        let mut hits = self.collect(start, end, Vec2::zeros(), Frame::Exterior, &accept);
        sort_by_fraction(&mut hits);
        hits
    }

    /// Cast from `origin` in every frame the shot can reach and merge the results
    ///
    /// The cap applies to each frame's cast, not to the merged list, so a
    /// frame full of near candidates never hides a farther one elsewhere.
    pub fn cast_across_frames(
        &self,
        frames: &VesselFrames,
        origin: Frame,
        start: Vec2,
        end: Vec2,
        accept: impl Fn(&FixtureInfo) -> bool,
    ) -> Vec<CandidateHit> {
        let mut hits = Vec::new();
        for frame in frames.query_frames(origin) {
            // Shift the ray into the target frame, then shift the points back
            let offset = frames.convert(Vec2::zeros(), origin, frame);
            hits.extend(self.collect(start + offset, end + offset, offset, frame, &accept));
        }

        sort_by_fraction(&mut hits);
        hits
    }

    fn collect(
        &self,
        start: Vec2,
        end: Vec2,
        offset: Vec2,
        frame: Frame,
        accept: &dyn Fn(&FixtureInfo) -> bool,
    ) -> Vec<CandidateHit> {
        let mut hits = Vec::new();
        if self.max_candidates == 0 {
            return hits;
        }

        let max = self.max_candidates;
        self.world.ray_cast(start, end, &mut |intersection| {
            if !accept(&intersection.fixture) {
                return RayCastControl::Ignore;
            }
            hits.push(CandidateHit {
                fixture: intersection.fixture,
                point: intersection.point - offset,
                normal: intersection.normal,
                fraction: intersection.fraction,
                frame,
            });
            if hits.len() < max {
                RayCastControl::Continue
            } else {
                RayCastControl::Terminate
            }
        });

        trace!("Ray cast in {frame:?} collected {} candidates", hits.len());
        hits
    }
}

/// Stable sort, so equal fractions keep frame order
fn sort_by_fraction(hits: &mut [CandidateHit]) {
    hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
}
