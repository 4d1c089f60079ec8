//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec2;
use bevy::prelude::*;
use orbit_crucible::config::{InteractionMode, SimulationConfig};
use orbit_crucible::physics::{run_tick, ForceResolver, PhysicsPlugin, SimulationDiagnostic, StabilityGovernor};
use orbit_crucible::prediction::PredictionPlugin;
use orbit_crucible::registry::BodyRegistry;
use orbit_crucible::types::{BodyId, BodySpec};

/// Config with the scene constant G = 100 and no softening, so forces match
/// the closed-form inverse-square value.
pub fn exact_config(interaction: InteractionMode) -> SimulationConfig {
    SimulationConfig {
        softening: 0.0,
        interaction,
        ..Default::default()
    }
}

/// Two bodies on the x axis, returned in insertion order.
pub fn pair(a: (f64, f64), b: (f64, f64)) -> (BodyRegistry, BodyId, BodyId) {
    let mut registry = BodyRegistry::new();
    let first = registry.add(BodySpec::new(DVec2::new(a.0, 0.0), a.1));
    let second = registry.add(BodySpec::new(DVec2::new(b.0, 0.0), b.1));
    (registry, first, second)
}

/// Run `ticks` live ticks and collect every diagnostic.
pub fn simulate(
    registry: &mut BodyRegistry,
    config: &SimulationConfig,
    ticks: usize,
    dt: f64,
) -> Vec<SimulationDiagnostic> {
    let mut resolver = ForceResolver::new();
    let mut governor = StabilityGovernor::default();
    (0..ticks)
        .flat_map(|_| run_tick(registry, config, &mut resolver, &mut governor, dt))
        .collect()
}

/// Total linear momentum of all bodies with valid mass.
pub fn total_momentum(registry: &BodyRegistry) -> DVec2 {
    registry
        .iter()
        .filter(|b| b.has_valid_mass())
        .map(|b| b.vel * b.mass)
        .sum()
}

/// Headless app with the simulation and prediction plugins.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins((PhysicsPlugin, PredictionPlugin));
    app
}

/// Run one fixed tick directly, independent of wall-clock time.
pub fn run_fixed_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}
