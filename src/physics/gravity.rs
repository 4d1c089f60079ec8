//! Pairwise gravitational force resolution.
//!
//! Every unordered pair of active bodies is visited once (O(n²)). The pair
//! force follows a softened inverse-square law; the interaction mode then
//! decides which side of the pair actually receives it.

use std::collections::HashSet;

use bevy::log::{debug, warn};
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::config::{InteractionMode, SimulationConfig};
use crate::registry::BodyRegistry;
use crate::types::{Body, BodyId};

/// Parameters of the per-pair force law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityLaw {
    pub g: f64,
    pub min_distance: f64,
    pub softening: f64,
    /// Per-pair magnitude cap, 0 disables.
    pub max_force_per_pair: f64,
}

impl From<&SimulationConfig> for GravityLaw {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            g: config.g,
            min_distance: config.min_distance,
            softening: config.softening,
            max_force_per_pair: config.max_force_per_pair,
        }
    }
}

impl GravityLaw {
    /// Force exerted on the body at `pos_i` by the body at `pos_j`.
    ///
    /// The body at `pos_j` feels the exact negation. Returns `None` when the
    /// pair is closer than `min_distance` or the result is not finite, in
    /// which case nothing may be applied.
    #[inline]
    pub fn pair_force(&self, pos_i: DVec2, mass_i: f64, pos_j: DVec2, mass_j: f64) -> Option<DVec2> {
        let delta = pos_j - pos_i;
        let r_squared = delta.length_squared();

        if r_squared < self.min_distance * self.min_distance {
            return None;
        }

        let softened = r_squared + self.softening * self.softening;
        let inv_r = 1.0 / softened.sqrt();
        let dir = delta * inv_r;

        let mut magnitude = self.g * mass_i * mass_j / softened;
        if self.max_force_per_pair > 0.0 {
            magnitude = magnitude.min(self.max_force_per_pair);
        }

        let force = dir * magnitude;
        force.is_finite().then_some(force)
    }
}

/// Which side of a pair receives the pair force.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coupling {
    /// The first body feels the second.
    pub on_first: bool,
    /// The second body feels the first.
    pub on_second: bool,
}

impl Coupling {
    const BOTH: Coupling = Coupling {
        on_first: true,
        on_second: true,
    };
    const NONE: Coupling = Coupling {
        on_first: false,
        on_second: false,
    };
}

/// Evaluate the interaction policy for one pair.
pub fn coupling(mode: &InteractionMode, first: &Body, second: &Body, central_mass_threshold: f64) -> Coupling {
    match mode {
        InteractionMode::AllPairs => Coupling::BOTH,
        InteractionMode::FilterByMass { small_mass_threshold } => {
            if first.mass < *small_mass_threshold && second.mass < *small_mass_threshold {
                Coupling::NONE
            } else {
                Coupling::BOTH
            }
        }
        InteractionMode::CentralMass(policy) => {
            let first_central = first.is_central(central_mass_threshold);
            let second_central = second.is_central(central_mass_threshold);
            Coupling {
                on_first: policy.allows(first_central, second_central),
                on_second: policy.allows(second_central, first_central),
            }
        }
    }
}

/// Net force per body for one tick, in registry order.
#[derive(Clone, Debug, Default)]
pub struct NetForces {
    ids: Vec<BodyId>,
    forces: Vec<DVec2>,
    /// Pairs whose force was applied to at least one side.
    pub pairs_applied: usize,
    /// Pairs skipped by policy, distance guard or non-finite result.
    pub pairs_skipped: usize,
}

impl NetForces {
    pub fn get(&self, id: BodyId) -> Option<DVec2> {
        self.ids.iter().position(|&i| i == id).map(|index| self.forces[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, DVec2)> + '_ {
        self.ids.iter().copied().zip(self.forces.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of one resolver pass.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub forces: NetForces,
    /// Bodies seen with a non-positive mass for the first time.
    pub newly_invalid: Vec<BodyId>,
}

/// Force resolver resource.
///
/// Stateless apart from the set of invalid-mass bodies already reported,
/// so each bad body is reported once rather than every tick.
#[derive(Resource, Default, Debug)]
pub struct ForceResolver {
    reported_invalid: HashSet<BodyId>,
}

impl ForceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute net forces without touching the registry.
    pub fn compute(&mut self, registry: &BodyRegistry, config: &SimulationConfig) -> Resolution {
        let bodies = registry.bodies();
        let newly_invalid = self.track_invalid_masses(bodies);

        let law = GravityLaw::from(config);
        let threshold = config.central_mass_threshold;
        let mut forces = vec![DVec2::ZERO; bodies.len()];
        let mut pairs_applied = 0;
        let mut pairs_skipped = 0;

        for i in 0..bodies.len() {
            let first = &bodies[i];
            if !participates(first) {
                continue;
            }
            for j in (i + 1)..bodies.len() {
                let second = &bodies[j];
                if !participates(second) {
                    continue;
                }

                let policy = coupling(&config.interaction, first, second, threshold);
                let on_first = policy.on_first && first.receives_gravity();
                let on_second = policy.on_second && second.receives_gravity();
                if !on_first && !on_second {
                    pairs_skipped += 1;
                    continue;
                }

                let Some(force) = law.pair_force(first.pos, first.mass, second.pos, second.mass) else {
                    pairs_skipped += 1;
                    continue;
                };

                // Finite pair forces can still overflow a body's running total
                let first_total = if on_first { forces[i] + force } else { forces[i] };
                let second_total = if on_second { forces[j] - force } else { forces[j] };
                if !(first_total.is_finite() && second_total.is_finite()) {
                    pairs_skipped += 1;
                    continue;
                }
                forces[i] = first_total;
                forces[j] = second_total;
                pairs_applied += 1;
            }
        }

        debug!(
            "Force pass: {} bodies, {} pairs applied, {} skipped",
            bodies.len(),
            pairs_applied,
            pairs_skipped
        );

        Resolution {
            forces: NetForces {
                ids: bodies.iter().map(|b| b.id).collect(),
                forces,
                pairs_applied,
                pairs_skipped,
            },
            newly_invalid,
        }
    }

    /// Compute net forces and add them to each dynamic body's accumulator.
    pub fn resolve(&mut self, registry: &mut BodyRegistry, config: &SimulationConfig) -> Resolution {
        let resolution = self.compute(registry, config);
        apply_forces(registry, &resolution.forces);
        resolution
    }

    fn track_invalid_masses(&mut self, bodies: &[Body]) -> Vec<BodyId> {
        self.reported_invalid
            .retain(|id| bodies.iter().any(|b| b.id == *id && !b.has_valid_mass()));

        let mut newly_invalid = Vec::new();
        for body in bodies.iter().filter(|b| b.is_active() && !b.has_valid_mass()) {
            if self.reported_invalid.insert(body.id) {
                warn!(
                    "Body {} has invalid mass {}; treating it as inert",
                    body.id, body.mass
                );
                newly_invalid.push(body.id);
            }
        }
        newly_invalid
    }
}

/// Add computed forces to the accumulators of bodies that receive gravity.
pub fn apply_forces(registry: &mut BodyRegistry, forces: &NetForces) {
    for (id, force) in forces.iter() {
        if let Some(body) = registry.get_mut(id)
            && body.receives_gravity()
        {
            let total = body.force + force;
            if total.is_finite() {
                body.force = total;
            }
        }
    }
}

#[inline]
fn participates(body: &Body) -> bool {
    body.is_active() && body.has_valid_mass()
}
