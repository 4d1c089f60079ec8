//! Scenario system for preset scenes.
//!
//! A scenario picks an interaction topology and a body layout. Loading one
//! clears the registry and every piece of per-body state derived from it.

pub mod presets;

use std::f64::consts::TAU;

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::camera::{apply_zoom, MainCamera};
use crate::config::{InteractionMode, SimulationConfig};
use crate::launch::LaunchController;
use crate::physics::{
    seed_orbital_velocities, snap_to_circular_orbit, ForceResolver, OrbitDirection, OrbitShape, SimulationClock,
    StabilityGovernor,
};
use crate::prediction::LaunchPreview;
use crate::registry::BodyRegistry;
use crate::render::LiveTrails;
use crate::types::{BodyId, BodySpec, MotionState};

pub use presets::{SpawnPreset, SCENARIOS, SPAWN_PRESETS};

/// Initial velocity of a preset body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresetVelocity {
    AtRest,
    Fixed(DVec2),
    /// Circular orbit around the nearest central body, resolved after all
    /// bodies are placed.
    CircularAroundNearest(OrbitDirection),
}

/// One body of a listed layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPreset {
    pub pos: DVec2,
    pub mass: f64,
    pub central: bool,
    /// Kinematic: exerts gravity but never moves.
    pub pinned: bool,
    pub velocity: PresetVelocity,
}

/// How a scenario places its bodies.
#[derive(Clone, Copy, Debug)]
pub enum Layout {
    Listed(&'static [BodyPreset]),
    /// Pinned central core with a ring of light bodies on circular orbits.
    Ring {
        core_mass: f64,
        count: usize,
        radius: f64,
        /// Radial jitter between consecutive ring bodies.
        spread: f64,
        body_mass: f64,
    },
}

impl Layout {
    pub fn bodies(&self) -> Vec<BodyPreset> {
        match *self {
            Layout::Listed(bodies) => bodies.to_vec(),
            Layout::Ring {
                core_mass,
                count,
                radius,
                spread,
                body_mass,
            } => {
                let mut bodies = Vec::with_capacity(count + 1);
                bodies.push(BodyPreset {
                    pos: DVec2::ZERO,
                    mass: core_mass,
                    central: true,
                    pinned: true,
                    velocity: PresetVelocity::AtRest,
                });
                for i in 0..count {
                    let angle = i as f64 / count.max(1) as f64 * TAU;
                    let r = radius + (i % 3) as f64 * spread;
                    bodies.push(BodyPreset {
                        pos: DVec2::from_angle(angle) * r,
                        mass: body_mass,
                        central: false,
                        pinned: false,
                        velocity: PresetVelocity::CircularAroundNearest(OrbitDirection::CounterClockwise),
                    });
                }
                bodies
            }
        }
    }
}

/// A predefined scene.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub interaction: InteractionMode,
    pub layout: Layout,
    /// Pairwise orbital seeding applied after placement.
    pub seed: Option<OrbitShape>,
    pub start_paused: bool,
    /// Orthographic scale for the camera.
    pub camera_zoom: f32,
}

/// Look up a preset scenario by id.
pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// Replace the registry contents with `scenario` and switch the interaction
/// mode. Returns the ids of the new bodies in layout order.
pub fn load_scenario(scenario: &Scenario, registry: &mut BodyRegistry, config: &mut SimulationConfig) -> Vec<BodyId> {
    registry.clear();
    config.interaction = scenario.interaction;

    let presets = scenario.layout.bodies();
    let ids: Vec<BodyId> = presets
        .iter()
        .map(|preset| {
            let mut spec = BodySpec::new(preset.pos, preset.mass);
            if preset.central {
                spec = spec.central();
            }
            if preset.pinned {
                spec = spec.with_motion(MotionState::Kinematic);
            }
            if let PresetVelocity::Fixed(vel) = preset.velocity {
                spec = spec.with_velocity(vel);
            }
            registry.add(spec)
        })
        .collect();

    for (id, preset) in ids.iter().zip(&presets) {
        if let PresetVelocity::CircularAroundNearest(direction) = preset.velocity
            && let Some(vel) = snap_to_circular_orbit(registry, *id, config, direction)
            && let Some(body) = registry.get_mut(*id)
        {
            body.vel = vel;
        }
    }

    if let Some(shape) = scenario.seed {
        seed_orbital_velocities(registry, config, shape);
    }

    info!("Loaded scenario '{}' with {} bodies", scenario.name, ids.len());
    ids
}

/// Resource tracking the current active scenario.
#[derive(Resource, Debug)]
pub struct CurrentScenario {
    pub id: &'static str,
}

impl Default for CurrentScenario {
    fn default() -> Self {
        Self { id: "star_system" }
    }
}

/// Request to load a scenario by id.
#[derive(Message, Clone, Debug)]
pub struct LoadScenario {
    pub scenario_id: &'static str,
}

/// Plugin providing scenario management.
pub struct ScenarioPlugin;

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentScenario>()
            .add_message::<LoadScenario>()
            .add_systems(Startup, load_default_scenario)
            .add_systems(Update, handle_load_scenario);
    }
}

fn load_default_scenario(current: Res<CurrentScenario>, mut requests: MessageWriter<LoadScenario>) {
    requests.write(LoadScenario {
        scenario_id: current.id,
    });
}

/// Handle scenario load requests.
#[allow(clippy::too_many_arguments)]
fn handle_load_scenario(
    mut requests: MessageReader<LoadScenario>,
    mut registry: ResMut<BodyRegistry>,
    mut config: ResMut<SimulationConfig>,
    mut resolver: ResMut<ForceResolver>,
    mut governor: ResMut<StabilityGovernor>,
    mut clock: ResMut<SimulationClock>,
    mut current: ResMut<CurrentScenario>,
    mut trails: Option<ResMut<LiveTrails>>,
    mut controller: Option<ResMut<LaunchController>>,
    mut preview: Option<ResMut<LaunchPreview>>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
) {
    for request in requests.read() {
        let Some(scenario) = find_scenario(request.scenario_id) else {
            warn!("Unknown scenario ID: {}", request.scenario_id);
            continue;
        };

        load_scenario(scenario, &mut registry, &mut config);

        *resolver = ForceResolver::new();
        governor.reset();
        clock.paused = scenario.start_paused;
        current.id = scenario.id;

        if let Some(trails) = trails.as_mut() {
            trails.clear();
        }
        if let Some(controller) = controller.as_mut() {
            controller.sync(&registry);
        }
        if let Some(preview) = preview.as_mut() {
            preview.clear();
        }

        if let Ok(mut projection) = camera_query.single_mut()
            && let Projection::Orthographic(ref mut ortho) = *projection
        {
            ortho.scale = apply_zoom(scenario.camera_zoom, 1.0);
        }
    }
}
