//! Spawn-place-launch workflow, independent of any input device.
//!
//! A body is spawned in [`MotionState::Placing`], follows the pointer until
//! a drag starts, and is released into the live simulation with the velocity
//! of the pull-back gesture. Only [`LaunchController::release`] commits a
//! velocity to live state.

use bevy::log::{info, warn};
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::config::PredictionConfig;
use crate::registry::{BodyRegistry, RegistryError};
use crate::types::{BodyId, BodySpec, MotionState};

/// An active pull-back drag on the body being placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    pub subject: BodyId,
    /// Body position when the button went down.
    pub start: DVec2,
    /// Latest pointer position in world units.
    pub pointer: DVec2,
}

impl DragGesture {
    /// Pull-back vector: the body is thrown away from the pointer.
    pub fn throw_vector(&self) -> DVec2 {
        self.start - self.pointer
    }
}

/// Launch velocity derived from a throw vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchVelocity {
    pub velocity: DVec2,
    /// Whether `max_initial_velocity` cut the speed down.
    pub clamped: bool,
}

/// Scale a throw vector into a velocity, capped at `max_initial_velocity`
/// when that is non-zero.
pub fn launch_velocity(throw: DVec2, config: &PredictionConfig) -> LaunchVelocity {
    let velocity = throw * config.throw_to_velocity_scale;
    let speed = velocity.length();
    let max = config.max_initial_velocity;

    if max > 0.0 && speed > max && speed.is_finite() {
        LaunchVelocity {
            velocity: velocity * (max / speed),
            clamped: true,
        }
    } else {
        LaunchVelocity {
            velocity,
            clamped: false,
        }
    }
}

/// Outcome of a pointer release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub body: BodyId,
    pub velocity: DVec2,
}

/// State machine of the placement workflow.
#[derive(Resource, Default, Debug)]
pub struct LaunchController {
    placing: Option<BodyId>,
    gesture: Option<DragGesture>,
}

impl LaunchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body currently being placed, if any.
    pub fn placing(&self) -> Option<BodyId> {
        self.placing
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Spawn a new body to place at `spec.pos`.
    ///
    /// A body still pending from an earlier spawn is removed first.
    pub fn spawn(&mut self, registry: &mut BodyRegistry, spec: BodySpec) -> BodyId {
        self.cancel(registry);
        let id = registry.add(spec.with_motion(MotionState::Placing));
        info!("Spawned body {} for placement", id);
        self.placing = Some(id);
        id
    }

    /// Drop the pending body, if any.
    pub fn cancel(&mut self, registry: &mut BodyRegistry) {
        self.gesture = None;
        if let Some(pending) = self.placing.take()
            && registry.remove(pending).is_ok()
        {
            info!("Discarded pending body {}", pending);
        }
    }

    /// Forget state that refers to a body no longer in the registry.
    pub fn sync(&mut self, registry: &BodyRegistry) {
        if let Some(id) = self.placing
            && !registry.contains(id)
        {
            self.placing = None;
            self.gesture = None;
        }
    }

    /// Move the pending body to the pointer while no drag is active.
    pub fn follow_pointer(&self, registry: &mut BodyRegistry, pointer: DVec2) -> Result<(), RegistryError> {
        match (self.placing, self.gesture) {
            (Some(id), None) => registry.set_position(id, pointer),
            _ => Ok(()),
        }
    }

    /// Start a drag at the pending body's current position.
    pub fn press(&mut self, registry: &BodyRegistry, pointer: DVec2) -> Result<(), RegistryError> {
        let Some(id) = self.placing else {
            return Ok(());
        };
        if self.gesture.is_some() {
            return Ok(());
        }
        let body = registry.get(id).ok_or(RegistryError::UnknownBody(id))?;
        self.gesture = Some(DragGesture {
            subject: id,
            start: body.pos,
            pointer,
        });
        Ok(())
    }

    /// Update the pointer of the active drag.
    pub fn drag(&mut self, pointer: DVec2) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.pointer = pointer;
        }
    }

    /// Subject and candidate velocity of the active drag.
    pub fn candidate(&self, config: &PredictionConfig) -> Option<(BodyId, LaunchVelocity)> {
        self.gesture
            .map(|g| (g.subject, launch_velocity(g.throw_vector(), config)))
    }

    /// Finish the drag and hand the body to the live simulation.
    ///
    /// With no pointer available the body keeps its current velocity.
    /// Returns `None` when nothing was being dragged.
    pub fn release(
        &mut self,
        registry: &mut BodyRegistry,
        pointer: Option<DVec2>,
        config: &PredictionConfig,
    ) -> Result<Option<Launch>, RegistryError> {
        let Some(mut gesture) = self.gesture.take() else {
            return Ok(None);
        };
        self.placing = None;

        let velocity = match pointer {
            Some(pointer) => {
                gesture.pointer = pointer;
                let launch = launch_velocity(gesture.throw_vector(), config);
                if launch.clamped {
                    warn!(
                        "Launch of body {} clamped to {} units/s",
                        gesture.subject, config.max_initial_velocity
                    );
                }
                launch.velocity
            }
            None => {
                let body = registry
                    .get(gesture.subject)
                    .ok_or(RegistryError::UnknownBody(gesture.subject))?;
                body.vel
            }
        };

        registry.release(gesture.subject, velocity)?;
        Ok(Some(Launch {
            body: gesture.subject,
            velocity,
        }))
    }

    /// Release the pending body with an explicit velocity, drag or not.
    pub fn release_with(
        &mut self,
        registry: &mut BodyRegistry,
        velocity: DVec2,
    ) -> Result<Option<Launch>, RegistryError> {
        let Some(id) = self.placing.take() else {
            return Ok(None);
        };
        self.gesture = None;
        registry.release(id, velocity)?;
        Ok(Some(Launch { body: id, velocity }))
    }
}
