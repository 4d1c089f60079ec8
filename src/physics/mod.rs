//! Live N-body simulation.
//!
//! One fixed tick runs, strictly in order:
//! 1. residual check against the previous tick (observational),
//! 2. force resolution,
//! 3. semi-implicit Euler integration,
//! 4. speed clamp.
//!
//! The whole tick is available as the plain function [`run_tick`] so it can
//! be driven without an `App`.

mod gravity;
mod governor;
mod integrator;
mod orbit;

#[cfg(test)]
mod proptest_physics;

use bevy::prelude::*;

pub use gravity::{apply_forces, coupling, Coupling, ForceResolver, GravityLaw, NetForces, Resolution};
pub use governor::{
    clamp_speeds, ResidualAnomaly, ResidualCause, SpeedClamp, StabilityGovernor, DEFAULT_RESIDUAL_THRESHOLD,
};
pub use integrator::{integrate, predicted_delta_v};
pub use orbit::{
    circular_orbit_velocity, elliptical_orbit_velocity, nearest_central_body, seed_orbital_velocities,
    snap_to_circular_orbit, OrbitDirection, OrbitShape, ELLIPSE_AXIS_RATIO,
};

use crate::config::SimulationConfig;
use crate::registry::BodyRegistry;
use crate::types::{BodyId, SimulationSet, PHYSICS_TIMESTEP};

/// Plugin owning the live registry and the fixed-timestep tick.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<BodyRegistry>()
            .init_resource::<ForceResolver>()
            .init_resource::<StabilityGovernor>()
            .init_resource::<SimulationClock>()
            .insert_resource(Time::<Fixed>::from_seconds(PHYSICS_TIMESTEP))
            .add_message::<SimulationDiagnostic>()
            .configure_sets(FixedUpdate, (SimulationSet::Tick, SimulationSet::Trails).chain())
            .add_systems(FixedUpdate, physics_step.in_set(SimulationSet::Tick));
    }
}

/// Pause state and tick counter of the live simulation.
#[derive(Resource, Default, Debug)]
pub struct SimulationClock {
    pub paused: bool,
    /// Ticks run since startup.
    pub ticks: u64,
}

/// Non-fatal events raised during a tick.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum SimulationDiagnostic {
    /// A body's speed was rescaled to the configured limit.
    SpeedClamped { body: BodyId, from: f64, to: f64 },
    /// A velocity change not explained by last tick's forces.
    ResidualAnomaly {
        body: BodyId,
        residual: f64,
        cause: ResidualCause,
    },
    /// A body with non-positive mass was found; it stays inert.
    InvalidMass { body: BodyId, mass: f64 },
}

/// Run one live tick over `registry` and return its diagnostics.
pub fn run_tick(
    registry: &mut BodyRegistry,
    config: &SimulationConfig,
    resolver: &mut ForceResolver,
    governor: &mut StabilityGovernor,
    dt: f64,
) -> Vec<SimulationDiagnostic> {
    let mut diagnostics = Vec::new();

    for anomaly in governor.begin_tick(registry) {
        warn!(
            "Residual anomaly on body {}: expected dv {:?}, observed {:?} ({:?})",
            anomaly.body, anomaly.expected, anomaly.actual, anomaly.cause
        );
        diagnostics.push(SimulationDiagnostic::ResidualAnomaly {
            body: anomaly.body,
            residual: anomaly.residual,
            cause: anomaly.cause,
        });
    }

    let resolution = resolver.resolve(registry, config);
    for id in &resolution.newly_invalid {
        let mass = registry.get(*id).map_or(0.0, |b| b.mass);
        diagnostics.push(SimulationDiagnostic::InvalidMass { body: *id, mass });
    }

    integrate(registry, dt);

    let clamps = clamp_speeds(registry, config.max_speed);
    governor.end_tick(&resolution.forces, registry, dt, &clamps);
    diagnostics.extend(clamps.iter().map(|c| SimulationDiagnostic::SpeedClamped {
        body: c.body,
        from: c.from,
        to: c.to,
    }));

    diagnostics
}

/// Fixed-timestep system driving [`run_tick`] on the live registry.
#[allow(clippy::too_many_arguments)]
fn physics_step(
    mut registry: ResMut<BodyRegistry>,
    mut resolver: ResMut<ForceResolver>,
    mut governor: ResMut<StabilityGovernor>,
    mut clock: ResMut<SimulationClock>,
    mut diagnostics: MessageWriter<SimulationDiagnostic>,
    config: Res<SimulationConfig>,
    time: Res<Time<Fixed>>,
    mut config_rejected: Local<bool>,
) {
    if clock.paused {
        return;
    }

    if let Err(err) = config.validate() {
        if !*config_rejected {
            warn!("Simulation config rejected, tick skipped: {}", err);
            *config_rejected = true;
        }
        return;
    }
    *config_rejected = false;

    let dt = time.timestep().as_secs_f64();
    if dt <= 0.0 {
        return;
    }

    let events = run_tick(&mut registry, &config, &mut resolver, &mut governor, dt);
    diagnostics.write_batch(events);
    clock.ticks += 1;
}
