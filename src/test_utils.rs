//! Test utilities for gravity simulation tests.
//!
//! Provides registry fixtures and assertions for verifying physical
//! invariants like momentum and energy conservation.

use bevy::math::DVec2;

use crate::registry::BodyRegistry;

/// Fixtures for creating test registries.
pub mod fixtures {
    use super::*;
    use crate::types::{BodyId, BodySpec};

    /// A heavy central star at the origin and a light planet on a circular
    /// counter-clockwise orbit at `(radius, 0)`.
    pub fn star_and_planet(g: f64, star_mass: f64, radius: f64) -> (BodyRegistry, BodyId, BodyId) {
        let mut registry = BodyRegistry::new();
        let star = registry.add(BodySpec::new(DVec2::ZERO, star_mass).central());
        let v = (g * star_mass / radius).sqrt();
        let planet = registry.add(BodySpec::new(DVec2::new(radius, 0.0), 1.0).with_velocity(DVec2::new(0.0, v)));
        (registry, star, planet)
    }

    /// Two equal masses at rest, mirrored about the origin on the x axis.
    pub fn symmetric_pair(mass: f64, separation: f64) -> (BodyRegistry, BodyId, BodyId) {
        let mut registry = BodyRegistry::new();
        let a = registry.add(BodySpec::new(DVec2::new(-separation / 2.0, 0.0), mass));
        let b = registry.add(BodySpec::new(DVec2::new(separation / 2.0, 0.0), mass));
        (registry, a, b)
    }

    /// Three unequal bodies with non-zero velocities and no symmetry.
    pub fn three_body() -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        registry.add(BodySpec::new(DVec2::ZERO, 500.0).with_velocity(DVec2::new(0.0, -1.0)));
        registry.add(BodySpec::new(DVec2::new(50.0, 10.0), 20.0).with_velocity(DVec2::new(-3.0, 25.0)));
        registry.add(BodySpec::new(DVec2::new(-80.0, -30.0), 5.0).with_velocity(DVec2::new(10.0, -15.0)));
        registry
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Total linear momentum of all bodies with valid mass.
    pub fn total_momentum(registry: &BodyRegistry) -> DVec2 {
        registry
            .iter()
            .filter(|b| b.has_valid_mass())
            .map(|b| b.vel * b.mass)
            .sum()
    }

    /// Kinetic plus unsoftened pairwise potential energy.
    pub fn total_energy(registry: &BodyRegistry, g: f64) -> f64 {
        let bodies: Vec<_> = registry.iter().filter(|b| b.has_valid_mass()).collect();
        let kinetic: f64 = bodies.iter().map(|b| 0.5 * b.mass * b.vel.length_squared()).sum();
        let mut potential = 0.0;
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                potential -= g * a.mass * b.mass / a.pos.distance(b.pos);
            }
        }
        kinetic + potential
    }

    /// Assert that two momenta agree within an absolute tolerance.
    ///
    /// # Panics
    /// Panics if the momentum changed by more than `tolerance`.
    pub fn assert_momentum_conserved(initial: DVec2, current: DVec2, tolerance: f64) {
        let drift = (current - initial).length();
        assert!(
            drift <= tolerance,
            "Momentum not conserved: initial={initial:?}, current={current:?}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }

    /// Assert that energy is conserved within a relative tolerance.
    ///
    /// # Panics
    /// Panics if relative energy drift exceeds tolerance.
    pub fn assert_energy_conserved(initial_energy: f64, final_energy: f64, tolerance: f64) {
        let drift = if initial_energy.abs() > 1e-10 {
            ((final_energy - initial_energy) / initial_energy).abs()
        } else {
            (final_energy - initial_energy).abs()
        };
        assert!(
            drift <= tolerance,
            "Energy not conserved: initial={initial_energy:.6e}, final={final_energy:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::physics::{run_tick, ForceResolver, StabilityGovernor};
    use approx::assert_relative_eq;

    #[test]
    fn test_star_and_planet_is_bound() {
        let (registry, _, planet) = fixtures::star_and_planet(100.0, 1000.0, 50.0);
        assert_relative_eq!(registry.get(planet).unwrap().speed(), 2000.0_f64.sqrt(), epsilon = 1e-12);
        assert!(assertions::total_energy(&registry, 100.0) < 0.0);
    }

    #[test]
    fn test_three_body_keeps_momentum_and_energy() {
        let mut registry = fixtures::three_body();
        let config = SimulationConfig::default();
        let mut resolver = ForceResolver::new();
        let mut governor = StabilityGovernor::default();

        let p0 = assertions::total_momentum(&registry);
        let e0 = assertions::total_energy(&registry, config.g);
        for _ in 0..200 {
            run_tick(&mut registry, &config, &mut resolver, &mut governor, 0.001);
        }

        assertions::assert_momentum_conserved(p0, assertions::total_momentum(&registry), 1e-8);
        assertions::assert_energy_conserved(e0, assertions::total_energy(&registry, config.g), 1e-2);
    }
}
