//! Vessel reference frames
//!
//! Each vessel's interior is simulated in its own local coordinates, offset
//! from the exterior world by the vessel position. Converting between frames
//! is a pure translation.

use std::collections::BTreeMap;

use crate::foundation::math::Vec2;
use crate::physics::VesselId;

/// Coordinate frame a position is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frame {
    /// The open world outside every vessel
    #[default]
    Exterior,
    /// Interior of a vessel
    Vessel(VesselId),
}

/// Positions of every loaded vessel, in exterior coordinates
#[derive(Debug, Clone, Default)]
pub struct VesselFrames {
    vessels: BTreeMap<VesselId, Vec2>,
}

impl VesselFrames {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vessel or move an existing one
    pub fn insert(&mut self, vessel: VesselId, position: Vec2) {
        self.vessels.insert(vessel, position);
    }

    /// Forget a vessel
    pub fn remove(&mut self, vessel: VesselId) -> Option<Vec2> {
        self.vessels.remove(&vessel)
    }

    /// Exterior position of a vessel
    pub fn position(&self, vessel: VesselId) -> Option<Vec2> {
        self.vessels.get(&vessel).copied()
    }

    /// Loaded vessels in id order
    pub fn iter(&self) -> impl Iterator<Item = (VesselId, Vec2)> + '_ {
        self.vessels.iter().map(|(id, pos)| (*id, *pos))
    }

    /// Number of loaded vessels
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    /// Whether no vessel is loaded
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Translation that maps `frame` coordinates to exterior coordinates
    ///
    /// Unknown vessels are treated as sitting at the origin.
    pub fn origin_of(&self, frame: Frame) -> Vec2 {
        match frame {
            Frame::Exterior => Vec2::zeros(),
            Frame::Vessel(vessel) => self.position(vessel).unwrap_or_else(Vec2::zeros),
        }
    }

    /// Express a point given in `from` coordinates in `to` coordinates
    pub fn convert(&self, point: Vec2, from: Frame, to: Frame) -> Vec2 {
        point + self.origin_of(from) - self.origin_of(to)
    }

    /// Frames a shot fired from `origin` must be tested in
    ///
    /// Indoors that is the vessel itself plus the exterior. Outdoors it is the
    /// exterior plus every loaded vessel.
    pub fn query_frames(&self, origin: Frame) -> Vec<Frame> {
        match origin {
            Frame::Vessel(_) => vec![origin, Frame::Exterior],
            Frame::Exterior => std::iter::once(Frame::Exterior)
                .chain(self.vessels.keys().map(|id| Frame::Vessel(*id)))
                .collect(),
        }
    }
}
