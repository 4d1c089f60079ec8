//! Property-based tests for the force law and stability pass using proptest.
//!
//! These tests verify invariants of the resolver across a wide range of
//! masses, separations and configurations.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::{circular_orbit_velocity, clamp_speeds, ForceResolver, GravityLaw, OrbitDirection};
use crate::config::SimulationConfig;
use crate::registry::BodyRegistry;
use crate::types::BodySpec;

fn law(g: f64, min_distance: f64, softening: f64) -> GravityLaw {
    GravityLaw {
        g,
        min_distance,
        softening,
        max_force_per_pair: 0.0,
    }
}

fn position() -> impl Strategy<Value = DVec2> {
    (-100.0f64..100.0, -100.0f64..100.0).prop_map(|(x, y)| DVec2::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Under AllPairs the force on each side of a pair is the exact negation
    /// of the other, and the net force of an isolated system sums to ~zero.
    #[test]
    fn prop_all_pairs_symmetry(
        bodies in prop::collection::vec((position(), 0.1f64..1000.0), 2..8),
    ) {
        let mut registry = BodyRegistry::new();
        for (pos, mass) in &bodies {
            registry.add(BodySpec::new(*pos, *mass));
        }

        let resolution = ForceResolver::new().compute(&registry, &SimulationConfig::default());

        let mut total = DVec2::ZERO;
        let mut scale = 0.0;
        for (_, force) in resolution.forces.iter() {
            prop_assert!(force.is_finite());
            total += force;
            scale += force.length();
        }
        prop_assert!(total.length() <= 1e-9 * scale.max(1.0), "net {:?} vs scale {}", total, scale);
    }

    /// Pairwise: F(i, j) == -F(j, i) up to the rounding of the mass product.
    #[test]
    fn prop_pair_force_antisymmetric(
        a in position(),
        b in position(),
        ma in 0.1f64..1000.0,
        mb in 0.1f64..1000.0,
    ) {
        let law = law(100.0, 0.1, 0.05);
        let ab = law.pair_force(a, ma, b, mb);
        let ba = law.pair_force(b, mb, a, ma);
        match (ab, ba) {
            (Some(ab), Some(ba)) => prop_assert!((ab + ba).length() <= 1e-12 * ab.length().max(1e-300)),
            (None, None) => {}
            other => prop_assert!(false, "asymmetric skip: {:?}", other),
        }
    }

    /// Force magnitude strictly decreases with separation.
    #[test]
    fn prop_monotonic_decay(
        r in 0.5f64..500.0,
        extra in 0.01f64..100.0,
        m1 in 0.1f64..1000.0,
        m2 in 0.1f64..1000.0,
        softening in 0.0f64..0.5,
    ) {
        let law = law(100.0, 0.0, softening);
        let near = law.pair_force(DVec2::ZERO, m1, DVec2::new(r, 0.0), m2).unwrap();
        let far = law.pair_force(DVec2::ZERO, m1, DVec2::new(r + extra, 0.0), m2).unwrap();
        prop_assert!(far.length() < near.length());
    }

    /// No force is ever applied inside the minimum distance.
    #[test]
    fn prop_min_distance_guard(
        min_distance in 0.01f64..10.0,
        fraction in 0.0f64..0.999,
        angle in 0.0f64..std::f64::consts::TAU,
        m1 in 0.1f64..1e6,
        m2 in 0.1f64..1e6,
    ) {
        let offset = DVec2::from_angle(angle) * min_distance * fraction;
        let law = law(100.0, min_distance, 0.0);
        prop_assert!(law.pair_force(DVec2::ZERO, m1, offset, m2).is_none());
    }

    /// Clamping is idempotent and lands exactly on the limit.
    #[test]
    fn prop_speed_clamp(
        vx in -500.0f64..500.0,
        vy in -500.0f64..500.0,
        max_speed in 1.0f64..200.0,
    ) {
        let vel = DVec2::new(vx, vy);
        let mut registry = BodyRegistry::new();
        let id = registry.add(BodySpec::new(DVec2::ZERO, 1.0).with_velocity(vel));

        clamp_speeds(&mut registry, max_speed);
        let once = registry.get(id).unwrap().vel;

        if vel.length() <= max_speed {
            prop_assert_eq!(once, vel);
        } else {
            prop_assert!((once.length() - max_speed).abs() <= 1e-9 * max_speed);
            prop_assert!((once.normalize().dot(vel.normalize()) - 1.0).abs() < 1e-12);
        }

        // A second pass over a clamped body is a no-op
        clamp_speeds(&mut registry, max_speed);
        let twice = registry.get(id).unwrap().vel;
        prop_assert!((twice - once).length() <= 1e-9 * max_speed);
    }

    /// Circular orbit velocity has magnitude sqrt(GM/r) and is perpendicular
    /// to the radius vector.
    #[test]
    fn prop_circular_orbit_formula(
        pos in position(),
        center in position(),
        mass in 1.0f64..1e5,
        g in 0.1f64..500.0,
        clockwise in any::<bool>(),
    ) {
        let radial = pos - center;
        prop_assume!(radial.length() > 1e-3);

        let direction = if clockwise { OrbitDirection::Clockwise } else { OrbitDirection::CounterClockwise };
        let v = circular_orbit_velocity(pos, center, mass, g, direction);

        let expected = (g * mass / radial.length()).sqrt();
        prop_assert!((v.length() - expected).abs() <= 1e-9 * expected);
        prop_assert!(v.dot(radial).abs() <= 1e-9 * expected * radial.length());

        let spin = radial.perp_dot(v);
        prop_assert_eq!(spin < 0.0, clockwise);
    }
}
