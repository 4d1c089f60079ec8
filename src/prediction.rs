//! Trajectory prediction on a disposable copy of the registry.
//!
//! A prediction run snapshots the live bodies into [`VirtualBody`] values,
//! steps them forward with the same pair law the live resolver uses, and
//! returns positions. The live registry is only ever read.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::config::{ConfigError, PredictionConfig, SimulationConfig};
use crate::launch::LaunchController;
use crate::physics::GravityLaw;
use crate::registry::BodyRegistry;
use crate::types::{BodyId, InputSystemSet};

/// Plugin providing the live launch preview.
pub struct PredictionPlugin;

impl Plugin for PredictionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PredictionConfig>()
            .init_resource::<LaunchController>()
            .init_resource::<LaunchPreview>()
            .add_systems(Update, update_launch_preview.after(InputSystemSet::Launch));
    }
}

/// Errors raised by a prediction request.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("prediction subject {0} is not in the registry")]
    UnknownSubject(BodyId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Value copy of a body's physical state. Never refers back to the live body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualBody {
    pub id: BodyId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub mass: f64,
}

/// How virtual velocities are initialised from the live bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VelocitySeed {
    /// Every body starts at rest (launch previews).
    Zeroed,
    /// Every body keeps its live velocity (natural motion).
    Live,
}

/// Acceleration of every virtual body from every other, computed from the
/// current positions only. Pairs inside the minimum distance, or that would
/// push either total past the finite range, contribute nothing.
pub fn accelerations(bodies: &[VirtualBody], law: &GravityLaw) -> Vec<DVec2> {
    let mut acc = vec![DVec2::ZERO; bodies.len()];
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            let Some(force) = law.pair_force(a.pos, a.mass, b.pos, b.mass) else {
                continue;
            };
            let (on_a, on_b) = (acc[i] + force / a.mass, acc[j] - force / b.mass);
            if on_a.is_finite() && on_b.is_finite() {
                acc[i] = on_a;
                acc[j] = on_b;
            }
        }
    }
    acc
}

/// A self-contained N-body system used for forward prediction.
///
/// Always uses all-pairs topology: interaction policies only shape the live
/// simulation.
#[derive(Clone, Debug)]
pub struct VirtualSystem {
    bodies: Vec<VirtualBody>,
    law: GravityLaw,
}

impl VirtualSystem {
    pub fn new(bodies: Vec<VirtualBody>, law: GravityLaw) -> Self {
        Self { bodies, law }
    }

    /// Snapshot every active body with a usable mass, plus `include` even if
    /// it is currently being placed.
    pub fn snapshot(
        registry: &BodyRegistry,
        config: &SimulationConfig,
        include: Option<BodyId>,
        seed: VelocitySeed,
    ) -> Self {
        let bodies = registry
            .iter()
            .filter(|b| b.has_valid_mass() && (b.is_active() || Some(b.id) == include))
            .map(|b| VirtualBody {
                id: b.id,
                pos: b.pos,
                vel: match seed {
                    VelocitySeed::Zeroed => DVec2::ZERO,
                    VelocitySeed::Live => b.vel,
                },
                mass: b.mass,
            })
            .collect();
        Self::new(bodies, GravityLaw::from(config))
    }

    pub fn bodies(&self) -> &[VirtualBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// Override one body's velocity. Returns false if it is not in the system.
    pub fn set_velocity(&mut self, id: BodyId, vel: DVec2) -> bool {
        match self.bodies.iter_mut().find(|b| b.id == id) {
            Some(body) => {
                body.vel = vel;
                true
            }
            None => false,
        }
    }

    /// Advance one step: all accelerations from the pre-step positions, then
    /// `v += a dt` and `x += v dt` for every body.
    pub fn step(&mut self, dt: f64) {
        let acc = accelerations(&self.bodies, &self.law);
        for (body, a) in self.bodies.iter_mut().zip(acc) {
            body.vel += a * dt;
            body.pos += body.vel * dt;
        }
    }
}

/// Predicted positions of the launch subject, one per step.
///
/// Non-subject bodies start at rest; the subject starts with
/// `launch_velocity`. Returns an empty path when fewer than two bodies take
/// part.
pub fn predict_launch(
    registry: &BodyRegistry,
    sim: &SimulationConfig,
    prediction: &PredictionConfig,
    subject: BodyId,
    launch_velocity: DVec2,
) -> Result<Vec<DVec2>, PredictionError> {
    sim.validate()?;
    prediction.validate()?;
    if !registry.contains(subject) {
        return Err(PredictionError::UnknownSubject(subject));
    }

    let mut system = VirtualSystem::snapshot(registry, sim, Some(subject), VelocitySeed::Zeroed);
    let Some(index) = system.index_of(subject) else {
        // Invalid mass: the subject is inert
        return Ok(Vec::new());
    };
    if system.len() < 2 {
        return Ok(Vec::new());
    }
    system.set_velocity(subject, launch_velocity);

    let mut path = Vec::with_capacity(prediction.steps);
    for _ in 0..prediction.steps {
        system.step(prediction.time_step);
        path.push(system.bodies[index].pos);
    }
    Ok(path)
}

/// Natural-motion paths for every body of a snapshot.
#[derive(Clone, Debug, Default)]
pub struct PredictedSystem {
    /// Start position and one point per step, per body.
    pub paths: Vec<(BodyId, Vec<DVec2>)>,
}

impl PredictedSystem {
    pub fn path(&self, id: BodyId) -> Option<&[DVec2]> {
        self.paths.iter().find(|(b, _)| *b == id).map(|(_, p)| p.as_slice())
    }

    /// Re-express every path relative to `reference`: its displacement at
    /// each step is subtracted from every other path, so the reference stays
    /// at its start position. Unknown references leave the paths untouched.
    pub fn relative_to(mut self, reference: BodyId) -> Self {
        let Some(reference_path) = self.path(reference).map(<[DVec2]>::to_vec) else {
            return self;
        };
        let Some(&origin) = reference_path.first() else {
            return self;
        };

        for (_, path) in &mut self.paths {
            for (point, reference_point) in path.iter_mut().zip(&reference_path) {
                *point -= *reference_point - origin;
            }
        }
        self
    }
}

/// Step the whole registry forward from its live velocities.
///
/// Used by the predictive orbit display. Needs at least two bodies.
pub fn predict_system(registry: &BodyRegistry, sim: &SimulationConfig, steps: usize, dt: f64) -> PredictedSystem {
    let mut system = VirtualSystem::snapshot(registry, sim, None, VelocitySeed::Live);
    if system.len() < 2 {
        return PredictedSystem::default();
    }

    let mut paths: Vec<(BodyId, Vec<DVec2>)> = system
        .bodies()
        .iter()
        .map(|b| {
            let mut path = Vec::with_capacity(steps + 1);
            path.push(b.pos);
            (b.id, path)
        })
        .collect();

    for _ in 0..steps {
        system.step(dt);
        for ((_, path), body) in paths.iter_mut().zip(system.bodies()) {
            path.push(body.pos);
        }
    }

    PredictedSystem { paths }
}

/// Launch preview for the body being dragged, rebuilt every frame.
#[derive(Resource, Default, Debug)]
pub struct LaunchPreview {
    pub subject: Option<BodyId>,
    /// Candidate launch velocity (already scaled and clamped).
    pub velocity: DVec2,
    pub path: Vec<DVec2>,
}

impl LaunchPreview {
    pub fn clear(&mut self) {
        self.subject = None;
        self.velocity = DVec2::ZERO;
        self.path.clear();
    }
}

/// Recompute the launch preview while a drag gesture is active.
fn update_launch_preview(
    controller: Res<LaunchController>,
    registry: Res<BodyRegistry>,
    sim: Res<SimulationConfig>,
    prediction: Res<PredictionConfig>,
    mut preview: ResMut<LaunchPreview>,
) {
    let Some((subject, launch)) = controller.candidate(&prediction) else {
        if preview.subject.is_some() {
            preview.clear();
        }
        return;
    };

    match predict_launch(&registry, &sim, &prediction, subject, launch.velocity) {
        Ok(path) => {
            preview.subject = Some(subject);
            preview.velocity = launch.velocity;
            preview.path = path;
        }
        Err(err) => {
            debug!("Launch preview unavailable: {}", err);
            preview.clear();
        }
    }
}
