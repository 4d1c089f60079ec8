//! Preset scenario definitions and spawnable body presets.

use bevy::math::DVec2;

use crate::config::{CentralPolicy, InteractionMode};
use crate::physics::{OrbitDirection, OrbitShape};

use super::{BodyPreset, Layout, PresetVelocity, Scenario};

/// All available preset scenarios.
pub static SCENARIOS: &[Scenario] = &[STAR_SYSTEM, BINARY_STARS, DENSE_CLUSTER, SANDBOX];

const STAR_SYSTEM_BODIES: &[BodyPreset] = &[
    BodyPreset::star(DVec2::ZERO, 1000.0),
    BodyPreset::planet(DVec2::new(40.0, 0.0), 5.0),
    BodyPreset::planet(DVec2::new(0.0, 75.0), 10.0),
    BodyPreset::planet(DVec2::new(-120.0, 0.0), 3.0),
];

const BINARY_BODIES: &[BodyPreset] = &[
    BodyPreset::star(DVec2::new(-30.0, 0.0), 500.0),
    BodyPreset::star(DVec2::new(30.0, 0.0), 500.0),
    BodyPreset {
        pos: DVec2::new(0.0, 160.0),
        mass: 1.0,
        central: false,
        pinned: false,
        velocity: PresetVelocity::AtRest,
    },
];

const SANDBOX_BODIES: &[BodyPreset] = &[BodyPreset {
    pos: DVec2::ZERO,
    mass: 1000.0,
    central: true,
    pinned: true,
    velocity: PresetVelocity::AtRest,
}];

/// Star-dominated system: planets feel the star, not each other.
pub static STAR_SYSTEM: Scenario = Scenario {
    id: "star_system",
    name: "Star System",
    description: "One star, three planets on circular orbits. Central-mass topology.",
    interaction: InteractionMode::CentralMass(CentralPolicy {
        central_exerts_on_others: true,
        others_exert_on_central: false,
        central_to_central_attract: true,
        non_central_mutual_attraction: false,
    }),
    layout: Layout::Listed(STAR_SYSTEM_BODIES),
    seed: None,
    start_paused: false,
    camera_zoom: 1.0,
};

/// Two equal stars and a distant planet, seeded the simple way: every body
/// gets the circular speed around every other one.
pub static BINARY_STARS: Scenario = Scenario {
    id: "binary_stars",
    name: "Binary Stars",
    description: "Two stars and a circumbinary planet. Full N-body gravity.",
    interaction: InteractionMode::AllPairs,
    layout: Layout::Listed(BINARY_BODIES),
    seed: Some(OrbitShape::Circular),
    start_paused: false,
    camera_zoom: 1.2,
};

/// A pinned heavy core inside a ring of light debris that ignores itself.
pub static DENSE_CLUSTER: Scenario = Scenario {
    id: "dense_cluster",
    name: "Dense Cluster",
    description: "Debris ring around a pinned core. Small-mass pairs are filtered out.",
    interaction: InteractionMode::FilterByMass {
        small_mass_threshold: 5.0,
    },
    layout: Layout::Ring {
        core_mass: 2000.0,
        count: 24,
        radius: 60.0,
        spread: 8.0,
        body_mass: 1.0,
    },
    seed: None,
    start_paused: false,
    camera_zoom: 0.8,
};

/// A single pinned star to spawn bodies around.
pub static SANDBOX: Scenario = Scenario {
    id: "sandbox",
    name: "Sandbox",
    description: "Free experimentation: spawn with 1-3, drag to launch.",
    interaction: InteractionMode::AllPairs,
    layout: Layout::Listed(SANDBOX_BODIES),
    seed: None,
    start_paused: false,
    camera_zoom: 1.0,
};

/// A body that can be spawned at the cursor.
#[derive(Clone, Copy, Debug)]
pub struct SpawnPreset {
    pub name: &'static str,
    pub mass: f64,
    pub central: bool,
}

/// Spawnable bodies, bound to number keys 1..=3 in order.
pub static SPAWN_PRESETS: &[SpawnPreset] = &[
    SpawnPreset {
        name: "Asteroid",
        mass: 0.5,
        central: false,
    },
    SpawnPreset {
        name: "Planet",
        mass: 10.0,
        central: false,
    },
    SpawnPreset {
        name: "Star",
        mass: 800.0,
        central: true,
    },
];

impl BodyPreset {
    /// Central body at rest.
    pub const fn star(pos: DVec2, mass: f64) -> Self {
        Self {
            pos,
            mass,
            central: true,
            pinned: false,
            velocity: PresetVelocity::AtRest,
        }
    }

    /// Non-central body on a counter-clockwise circular orbit around its
    /// nearest central body.
    pub const fn planet(pos: DVec2, mass: f64) -> Self {
        Self {
            pos,
            mass,
            central: false,
            pinned: false,
            velocity: PresetVelocity::CircularAroundNearest(OrbitDirection::CounterClockwise),
        }
    }
}
