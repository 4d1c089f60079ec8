//! Geometry of the orbit debug display: live trails and predicted paths.

use approx::assert_relative_eq;
use bevy::math::DVec2;
use orbit_crucible::config::SimulationConfig;
use orbit_crucible::physics::{run_tick, ForceResolver, StabilityGovernor};
use orbit_crucible::registry::BodyRegistry;
use orbit_crucible::render::{build_predicted_orbits, LiveTrails, OrbitDisplaySettings};
use orbit_crucible::types::{BodyId, BodySpec};

fn binary() -> (BodyRegistry, BodyId, BodyId) {
    let mut registry = BodyRegistry::new();
    let star = registry.add(BodySpec::new(DVec2::ZERO, 1000.0).with_velocity(DVec2::new(3.0, 0.0)));
    let planet = registry.add(BodySpec::new(DVec2::new(40.0, 0.0), 1.0).with_velocity(DVec2::new(3.0, 50.0)));
    (registry, star, planet)
}

#[test]
fn test_predicted_paths_relative_to_reference() {
    let (registry, star, planet) = binary();
    let settings = OrbitDisplaySettings {
        num_steps: 200,
        time_step: 0.01,
        reference: Some(star),
        ..Default::default()
    };

    let absolute = build_predicted_orbits(
        &registry,
        &SimulationConfig::default(),
        &OrbitDisplaySettings {
            reference: None,
            ..settings.clone()
        },
    )
    .unwrap();
    let relative = build_predicted_orbits(&registry, &SimulationConfig::default(), &settings).unwrap();

    // The reference stays put in its own frame
    assert!(relative.path(star).unwrap().iter().all(|p| *p == DVec2::ZERO));

    // Other paths lose exactly the reference's displacement
    let star_path = absolute.path(star).unwrap();
    for (i, point) in relative.path(planet).unwrap().iter().enumerate() {
        let expected = absolute.path(planet).unwrap()[i] - (star_path[i] - star_path[0]);
        assert_relative_eq!(point.x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(point.y, expected.y, epsilon = 1e-9);
    }

    // Without the star's drift the planet path closes on itself more tightly
    let spread = |path: &[DVec2]| path.iter().map(|p| p.length()).fold(0.0, f64::max);
    assert!(spread(relative.path(planet).unwrap()) < spread(absolute.path(planet).unwrap()));
}

#[test]
fn test_missing_reference_keeps_absolute_paths() {
    let (registry, _, planet) = binary();
    let settings = OrbitDisplaySettings {
        num_steps: 20,
        time_step: 0.01,
        reference: Some(BodyId(77)),
        ..Default::default()
    };

    let system = build_predicted_orbits(&registry, &SimulationConfig::default(), &settings).unwrap();
    assert_eq!(system.path(planet).unwrap()[0], DVec2::new(40.0, 0.0));
}

#[test]
fn test_live_trail_follows_true_motion() {
    let (mut registry, star, planet) = binary();
    let config = SimulationConfig::default();
    let mut resolver = ForceResolver::new();
    let mut governor = StabilityGovernor::default();
    let mut trails = LiveTrails::new();

    for _ in 0..50 {
        run_tick(&mut registry, &config, &mut resolver, &mut governor, 0.02);
        trails.sample(&registry, Some(star), 30);
    }

    let trail = trails.trail(planet).unwrap();
    assert_eq!(trail.len(), 30);
    let last = *trail.back().unwrap();
    let live = registry.get(planet).unwrap().pos - registry.get(star).unwrap().pos;
    assert_relative_eq!(last.x, live.x, epsilon = 1e-12);
    assert_relative_eq!(last.y, live.y, epsilon = 1e-12);
    assert!(trails.trail(star).unwrap().iter().all(|p| *p == DVec2::ZERO));
}
