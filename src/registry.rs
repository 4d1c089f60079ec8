//! Body registry: the single owner of live body state.
//!
//! Bodies are added and removed explicitly by whatever spawns them, instead of
//! being rediscovered from the scene every few ticks. Iteration order is
//! insertion order, which keeps the force sum deterministic.

use bevy::log::info;
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::types::{Body, BodyId, BodySpec, MotionState};

/// Errors raised by registry lookups.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no body with id {0} in the registry")]
    UnknownBody(BodyId),
}

/// Resource holding every simulated body.
#[derive(Resource, Default, Clone, Debug)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    next_id: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    pub fn add(&mut self, spec: BodySpec) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            pos: spec.pos,
            vel: spec.vel,
            mass: spec.mass,
            central: spec.central,
            motion: spec.motion,
            force: DVec2::ZERO,
        });
        id
    }

    /// Remove a body, returning its final state.
    pub fn remove(&mut self, id: BodyId) -> Result<Body, RegistryError> {
        let index = self.index_of(id)?;
        Ok(self.bodies.remove(index))
    }

    /// Remove every body. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Current array slot of a body. Only valid until the next add/remove.
    pub fn index_of(&self, id: BodyId) -> Result<usize, RegistryError> {
        self.bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or(RegistryError::UnknownBody(id))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Bodies currently taking part in gravity (not being placed).
    pub fn iter_active(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.is_active())
    }

    pub fn set_motion_state(&mut self, id: BodyId, motion: MotionState) -> Result<(), RegistryError> {
        let body = self.get_mut(id).ok_or(RegistryError::UnknownBody(id))?;
        body.motion = motion;
        Ok(())
    }

    pub fn set_position(&mut self, id: BodyId, pos: DVec2) -> Result<(), RegistryError> {
        let body = self.get_mut(id).ok_or(RegistryError::UnknownBody(id))?;
        body.pos = pos;
        Ok(())
    }

    pub fn set_velocity(&mut self, id: BodyId, vel: DVec2) -> Result<(), RegistryError> {
        let body = self.get_mut(id).ok_or(RegistryError::UnknownBody(id))?;
        body.vel = vel;
        Ok(())
    }

    /// Commit a launch: set the velocity and hand the body to the live tick.
    ///
    /// This is the only path by which a previewed velocity reaches live state.
    pub fn release(&mut self, id: BodyId, vel: DVec2) -> Result<(), RegistryError> {
        let body = self.get_mut(id).ok_or(RegistryError::UnknownBody(id))?;
        body.vel = vel;
        body.force = DVec2::ZERO;
        body.motion = MotionState::Dynamic;
        info!("Body {} released at {:.2} units/s", id, vel.length());
        Ok(())
    }
}
