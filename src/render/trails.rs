//! Live orbit trails: a bounded position history per body.
//!
//! Sampled once per fixed tick, after the simulation step. Points are stored
//! relative to the reference body's position at sample time (or absolute
//! when there is no reference).

use std::collections::{HashMap, VecDeque};

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::registry::BodyRegistry;
use crate::types::BodyId;

/// Per-body sliding windows of sampled positions.
#[derive(Resource, Default, Debug)]
pub struct LiveTrails {
    trails: HashMap<BodyId, VecDeque<DVec2>>,
    reference_missing: bool,
}

impl LiveTrails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the current position of every active body, evicting the oldest
    /// points beyond `capacity`. Trails of bodies no longer in the registry
    /// are dropped.
    ///
    /// An unknown `reference` falls back to absolute positions and is
    /// warned about once until it resolves again.
    pub fn sample(&mut self, registry: &BodyRegistry, reference: Option<BodyId>, capacity: usize) {
        let anchor = reference.and_then(|id| registry.get(id));
        let missing = reference.is_some() && anchor.is_none();
        if missing && !self.reference_missing
            && let Some(id) = reference
        {
            warn!("Trail reference {} not found; sampling absolute positions", id);
        }
        self.reference_missing = missing;

        self.trails.retain(|id, _| registry.contains(*id));
        if capacity == 0 {
            self.trails.clear();
            return;
        }

        let origin = anchor.map_or(DVec2::ZERO, |b| b.pos);

        for body in registry.iter_active() {
            let trail = self
                .trails
                .entry(body.id)
                .or_insert_with(|| VecDeque::with_capacity(capacity.min(1024)));
            trail.push_back(body.pos - origin);
            while trail.len() > capacity {
                trail.pop_front();
            }
        }
    }

    /// Whether the last sample asked for a reference that does not exist.
    pub fn reference_missing(&self) -> bool {
        self.reference_missing
    }

    pub fn trail(&self, id: BodyId) -> Option<&VecDeque<DVec2>> {
        self.trails.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &VecDeque<DVec2>)> {
        self.trails.iter().map(|(id, trail)| (*id, trail))
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn clear(&mut self) {
        self.trails.clear();
    }
}
