//! Orbit debug display using Bevy Gizmos.
//!
//! Two mutually exclusive modes:
//! - Predictive: every body's natural motion stepped forward on a virtual
//!   copy of the registry, refreshed every few frames.
//! - Live trail: a sliding window of true positions, sampled each tick.
//!
//! Either mode can be expressed relative to a reference body. Nothing here
//! writes simulation state.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::camera::to_render;
use crate::config::{ConfigError, SimulationConfig};
use crate::physics::SimulationClock;
use crate::prediction::{predict_system, PredictedSystem};
use crate::registry::BodyRegistry;
use crate::render::trails::LiveTrails;
use crate::types::{Body, BodyId, SimulationSet};

/// Plugin providing the orbit debug display.
pub struct OrbitDisplayPlugin;

impl Plugin for OrbitDisplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitDisplaySettings>()
            .init_resource::<PredictedOrbits>()
            .init_resource::<LiveTrails>()
            .add_systems(FixedUpdate, sample_live_trails.in_set(SimulationSet::Trails))
            .add_systems(
                Update,
                (update_predicted_orbits, draw_predicted_orbits, draw_live_trails).chain(),
            );
    }
}

/// Which orbit visualisation is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitDisplayMode {
    /// Forward-predicted natural motion.
    Predictive,
    /// Rolling history of true positions.
    #[default]
    LiveTrail,
}

impl OrbitDisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Predictive => Self::LiveTrail,
            Self::LiveTrail => Self::Predictive,
        }
    }
}

/// Settings for orbit debug rendering.
#[derive(Resource, Clone, Debug)]
pub struct OrbitDisplaySettings {
    pub visible: bool,
    pub mode: OrbitDisplayMode,
    /// Predicted steps, and live trail length. Default: 1000.
    pub num_steps: usize,
    /// Predictive step in seconds. Default: 0.1.
    pub time_step: f64,
    /// Body whose frame the paths are drawn in.
    pub reference: Option<BodyId>,
    /// Frames between predictive refreshes.
    pub refresh_interval: u32,
    pub alpha: f32,
}

impl Default for OrbitDisplaySettings {
    fn default() -> Self {
        Self {
            visible: true,
            mode: OrbitDisplayMode::LiveTrail,
            num_steps: 1000,
            time_step: 0.1,
            reference: None,
            refresh_interval: 10,
            alpha: 0.5,
        }
    }
}

impl OrbitDisplaySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        Ok(())
    }
}

/// Latest predictive run, drawn every frame until the next refresh.
#[derive(Resource, Default, Debug)]
pub struct PredictedOrbits {
    pub system: PredictedSystem,
    frames_since_refresh: u32,
    reference_missing: bool,
}

/// Run the predictive display on the current registry.
///
/// A reference body that is not part of the snapshot is ignored and the
/// paths stay absolute.
pub fn build_predicted_orbits(
    registry: &BodyRegistry,
    sim: &SimulationConfig,
    settings: &OrbitDisplaySettings,
) -> Result<PredictedSystem, ConfigError> {
    settings.validate()?;
    let system = predict_system(registry, sim, settings.num_steps, settings.time_step);
    Ok(match settings.reference {
        Some(reference) => system.relative_to(reference),
        None => system,
    })
}

/// Line colour for a body's path: warm for central bodies, cool otherwise.
pub fn orbit_color(body: &Body, central_mass_threshold: f64, alpha: f32) -> Color {
    if body.is_central(central_mass_threshold) {
        Color::srgba(1.0, 0.8, 0.3, alpha)
    } else {
        let hue = (body.id.0 as f32 * 47.0) % 360.0;
        Color::hsla(hue, 0.7, 0.6, alpha)
    }
}

fn update_predicted_orbits(
    settings: Res<OrbitDisplaySettings>,
    registry: Res<BodyRegistry>,
    sim: Res<SimulationConfig>,
    mut orbits: ResMut<PredictedOrbits>,
) {
    if !settings.visible || settings.mode != OrbitDisplayMode::Predictive {
        return;
    }

    let due = orbits.frames_since_refresh == 0 || settings.is_changed();
    orbits.frames_since_refresh = (orbits.frames_since_refresh + 1) % settings.refresh_interval.max(1);
    if !due {
        return;
    }

    if let Some(reference) = settings.reference {
        let missing = !registry.contains(reference);
        if missing && !orbits.reference_missing {
            warn!("Orbit display reference {} not found; drawing absolute paths", reference);
        }
        orbits.reference_missing = missing;
    }

    match build_predicted_orbits(&registry, &sim, &settings) {
        Ok(system) => orbits.system = system,
        Err(err) => {
            warn!("Orbit display settings rejected: {}", err);
            orbits.system = PredictedSystem::default();
        }
    }
}

fn draw_predicted_orbits(
    mut gizmos: Gizmos,
    settings: Res<OrbitDisplaySettings>,
    registry: Res<BodyRegistry>,
    sim: Res<SimulationConfig>,
    orbits: Res<PredictedOrbits>,
) {
    if !settings.visible || settings.mode != OrbitDisplayMode::Predictive {
        return;
    }

    for (id, path) in &orbits.system.paths {
        let Some(body) = registry.get(*id) else {
            continue;
        };
        if path.len() < 2 {
            continue;
        }
        let color = orbit_color(body, sim.central_mass_threshold, settings.alpha);
        gizmos.linestrip_2d(path.iter().map(|p| to_render(*p)), color);
    }
}

fn draw_live_trails(
    mut gizmos: Gizmos,
    settings: Res<OrbitDisplaySettings>,
    registry: Res<BodyRegistry>,
    sim: Res<SimulationConfig>,
    trails: Res<LiveTrails>,
) {
    if !settings.visible || settings.mode != OrbitDisplayMode::LiveTrail {
        return;
    }

    // Relative trails are anchored on the reference's current position
    let anchor = settings
        .reference
        .and_then(|id| registry.get(id))
        .map_or(DVec2::ZERO, |b| b.pos);

    for (id, trail) in trails.iter() {
        let Some(body) = registry.get(id) else {
            continue;
        };
        if trail.len() < 2 {
            continue;
        }
        let color = orbit_color(body, sim.central_mass_threshold, settings.alpha);
        gizmos.linestrip_2d(trail.iter().map(|p| to_render(*p + anchor)), color);
    }
}

fn sample_live_trails(
    settings: Res<OrbitDisplaySettings>,
    registry: Res<BodyRegistry>,
    clock: Res<SimulationClock>,
    mut trails: ResMut<LiveTrails>,
) {
    if clock.paused || settings.mode != OrbitDisplayMode::LiveTrail {
        return;
    }
    trails.sample(&registry, settings.reference, settings.num_steps);
}
