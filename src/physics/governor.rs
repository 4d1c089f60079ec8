//! Post-integration stability pass.
//!
//! Clamps speeds and watches for velocity changes that the applied gravity
//! does not explain. The residual check is observational only: it reports,
//! it never corrects.

use std::collections::HashMap;

use bevy::log::warn;
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::physics::gravity::NetForces;
use crate::physics::integrator::predicted_delta_v;
use crate::registry::BodyRegistry;
use crate::types::BodyId;

/// Residual magnitude (velocity units) above which an anomaly is reported.
pub const DEFAULT_RESIDUAL_THRESHOLD: f64 = 0.5;

/// A body whose speed was rescaled this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedClamp {
    pub body: BodyId,
    pub from: f64,
    pub to: f64,
}

/// Most likely explanation for an unexplained velocity change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResidualCause {
    /// The body was speed-clamped last tick, so part of the predicted
    /// change was cut off.
    ClampSaturation,
    /// Something other than the resolver changed the velocity.
    ExternalImpulse,
}

/// Mismatch between observed and predicted velocity change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResidualAnomaly {
    pub body: BodyId,
    pub expected: DVec2,
    pub actual: DVec2,
    pub residual: f64,
    pub cause: ResidualCause,
}

#[derive(Clone, Copy, Debug)]
struct VelocityRecord {
    velocity: DVec2,
    predicted_delta: DVec2,
    clamped: bool,
}

/// Speed clamp and residual diagnostics.
///
/// History is keyed by [`BodyId`] and rebuilt every tick, so removed bodies
/// drop out automatically.
#[derive(Resource, Debug)]
pub struct StabilityGovernor {
    pub residual_threshold: f64,
    history: HashMap<BodyId, VelocityRecord>,
    tick_start: HashMap<BodyId, DVec2>,
}

impl Default for StabilityGovernor {
    fn default() -> Self {
        Self::new(DEFAULT_RESIDUAL_THRESHOLD)
    }
}

impl StabilityGovernor {
    pub fn new(residual_threshold: f64) -> Self {
        Self {
            residual_threshold,
            history: HashMap::new(),
            tick_start: HashMap::new(),
        }
    }

    /// Start-of-tick pass, before any force is applied.
    ///
    /// Compares each dynamic body's velocity change since the last tick with
    /// the change its forces predicted, and snapshots the velocities the
    /// coming tick starts from.
    pub fn begin_tick(&mut self, registry: &BodyRegistry) -> Vec<ResidualAnomaly> {
        let mut anomalies = Vec::new();
        self.tick_start.clear();

        for body in registry.iter().filter(|b| b.receives_gravity()) {
            self.tick_start.insert(body.id, body.vel);

            let Some(record) = self.history.get(&body.id) else {
                continue;
            };

            let actual = body.vel - record.velocity;
            let residual = (actual - record.predicted_delta).length();
            if residual > self.residual_threshold {
                let cause = if record.clamped {
                    ResidualCause::ClampSaturation
                } else {
                    ResidualCause::ExternalImpulse
                };
                anomalies.push(ResidualAnomaly {
                    body: body.id,
                    expected: record.predicted_delta,
                    actual,
                    residual,
                    cause,
                });
            }
        }

        anomalies
    }

    /// End-of-tick pass: record what this tick is expected to have done.
    pub fn end_tick(&mut self, forces: &NetForces, masses: &BodyRegistry, dt: f64, clamps: &[SpeedClamp]) {
        self.history.clear();
        for (&id, &velocity) in &self.tick_start {
            let Some(body) = masses.get(id) else {
                continue;
            };
            let force = forces.get(id).unwrap_or(DVec2::ZERO);
            self.history.insert(
                id,
                VelocityRecord {
                    velocity,
                    predicted_delta: predicted_delta_v(force, body.mass, dt),
                    clamped: clamps.iter().any(|c| c.body == id),
                },
            );
        }
    }

    /// Forget all history, e.g. after a scenario reload.
    pub fn reset(&mut self) {
        self.history.clear();
        self.tick_start.clear();
    }

    pub fn tracked_bodies(&self) -> usize {
        self.history.len()
    }
}

/// Rescale any active body faster than `max_speed` down to exactly
/// `max_speed`, keeping its direction. A limit of 0 disables the clamp.
pub fn clamp_speeds(registry: &mut BodyRegistry, max_speed: f64) -> Vec<SpeedClamp> {
    let mut clamps = Vec::new();
    if max_speed <= 0.0 {
        return clamps;
    }

    for body in registry.bodies_mut().iter_mut().filter(|b| b.is_active()) {
        let speed = body.vel.length();
        if speed > max_speed && speed.is_finite() {
            body.vel *= max_speed / speed;
            clamps.push(SpeedClamp {
                body: body.id,
                from: speed,
                to: max_speed,
            });
        }
    }

    if !clamps.is_empty() {
        warn!("Speed clamp engaged for {} bodies (limit {})", clamps.len(), max_speed);
    }
    clamps
}
