//! Core physics types and constants for the gravity sandbox.

use bevy::math::DVec2;
use bevy::prelude::*;

/// System set for ordering input-related systems.
///
/// Placement must run before the launch drag so a freshly spawned body
/// follows the cursor for the frame it was created in.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputSystemSet {
    /// Spawning and cursor-following of bodies being placed.
    Placement,
    /// Drag-to-launch gesture processing (runs after placement)
    Launch,
}

/// System set for ordering the fixed-timestep simulation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Force resolution, integration and stability pass.
    Tick,
    /// Live trail sampling (runs after the tick).
    Trails,
}

/// Default gravitational constant in scene units.
pub const DEFAULT_G: f64 = 100.0;

/// Fixed physics timestep in seconds.
pub const PHYSICS_TIMESTEP: f64 = 0.02;

/// Stable handle for a simulated body.
///
/// Handles are never reused by a registry, so diagnostic history keyed by
/// `BodyId` cannot leak onto a body spawned after another was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a body participates in the live simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionState {
    /// Exerts and receives gravity, integrated every tick.
    #[default]
    Dynamic,
    /// Exerts gravity but is never moved by it (pinned anchor).
    Kinematic,
    /// Directly driven by the pointer; excluded from the live tick.
    Placing,
}

/// A simulated point mass.
#[derive(Clone, Debug)]
pub struct Body {
    /// Stable identity.
    pub id: BodyId,
    /// Position in world units.
    pub pos: DVec2,
    /// Velocity in world units per second.
    pub vel: DVec2,
    /// Mass; must be > 0 to take part in gravity.
    pub mass: f64,
    /// Tag-equivalent "central body" classification.
    pub central: bool,
    /// Current participation state.
    pub motion: MotionState,
    /// Force accumulated this tick, consumed by the integrator.
    pub force: DVec2,
}

impl Body {
    /// Whether the mass is usable in the force law.
    #[inline]
    pub fn has_valid_mass(&self) -> bool {
        self.mass.is_finite() && self.mass > 0.0
    }

    /// Whether this body currently exerts gravity on others.
    ///
    /// Re-evaluated every tick since placement state changes between ticks.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.motion != MotionState::Placing
    }

    /// Whether forces are applied to this body.
    #[inline]
    pub fn receives_gravity(&self) -> bool {
        self.motion == MotionState::Dynamic
    }

    /// Central classification: explicit tag, or mass at or above `threshold`
    /// when the threshold is enabled (> 0).
    #[inline]
    pub fn is_central(&self, threshold: f64) -> bool {
        self.central || (threshold > 0.0 && self.mass >= threshold)
    }

    /// Current speed.
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Description of a body to be added to a registry.
#[derive(Clone, Debug)]
pub struct BodySpec {
    pub pos: DVec2,
    pub vel: DVec2,
    pub mass: f64,
    pub central: bool,
    pub motion: MotionState,
}

impl BodySpec {
    /// A dynamic, non-central body at rest.
    pub fn new(pos: DVec2, mass: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            mass,
            central: false,
            motion: MotionState::Dynamic,
        }
    }

    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    /// Tag the body as central.
    pub fn central(mut self) -> Self {
        self.central = true;
        self
    }

    pub fn with_motion(mut self, motion: MotionState) -> Self {
        self.motion = motion;
        self
    }
}
