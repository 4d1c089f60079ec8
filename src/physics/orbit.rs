//! Orbit helpers: circular/elliptical seeding velocities and central-body lookup.
//!
//! Pure queries over the registry. Nothing here mutates live state except
//! [`seed_orbital_velocities`], which scenarios call once at load.

use bevy::math::DVec2;

use crate::config::SimulationConfig;
use crate::registry::BodyRegistry;
use crate::types::{Body, BodyId};

/// Semi-major axis used for elliptical seeding, as a multiple of the
/// current separation. Places the body at perihelion.
pub const ELLIPSE_AXIS_RATIO: f64 = 1.5;

/// Sense of rotation around the central body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitDirection {
    /// Positive angular momentum (z out of the screen).
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Shape used by [`seed_orbital_velocities`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitShape {
    #[default]
    Circular,
    /// Vis-viva with `a = 1.5 r`.
    Elliptical,
}

/// Unit tangent at `pos` around `center`, or `None` if the two coincide.
fn tangent(pos: DVec2, center: DVec2, direction: OrbitDirection) -> Option<(DVec2, f64)> {
    let radial = pos - center;
    let r = radial.length();
    if r <= 0.0 || !r.is_finite() {
        return None;
    }
    let ccw = (radial / r).perp();
    let t = match direction {
        OrbitDirection::CounterClockwise => ccw,
        OrbitDirection::Clockwise => -ccw,
    };
    Some((t, r))
}

/// Velocity for a circular orbit at `pos` around a body of `central_mass`
/// at `center`: magnitude `sqrt(G*M/r)`, perpendicular to the radius.
///
/// Returns zero when the positions coincide.
pub fn circular_orbit_velocity(
    pos: DVec2,
    center: DVec2,
    central_mass: f64,
    g: f64,
    direction: OrbitDirection,
) -> DVec2 {
    match tangent(pos, center, direction) {
        Some((t, r)) => t * (g * central_mass / r).sqrt(),
        None => DVec2::ZERO,
    }
}

/// Perihelion velocity of an ellipse with semi-major axis
/// [`ELLIPSE_AXIS_RATIO`] times the current separation.
pub fn elliptical_orbit_velocity(
    pos: DVec2,
    center: DVec2,
    central_mass: f64,
    g: f64,
    direction: OrbitDirection,
) -> DVec2 {
    match tangent(pos, center, direction) {
        Some((t, r)) => {
            let a = r * ELLIPSE_AXIS_RATIO;
            // Vis-viva: v² = GM (2/r - 1/a)
            t * (g * central_mass * (2.0 / r - 1.0 / a)).sqrt()
        }
        None => DVec2::ZERO,
    }
}

/// The closest active central body to `pos`, skipping `exclude`.
///
/// A body is central if tagged, or if its mass reaches the configured
/// threshold (when the threshold is enabled).
pub fn nearest_central_body<'a>(
    registry: &'a BodyRegistry,
    pos: DVec2,
    config: &SimulationConfig,
    exclude: Option<BodyId>,
) -> Option<&'a Body> {
    registry
        .iter_active()
        .filter(|b| Some(b.id) != exclude)
        .filter(|b| b.has_valid_mass() && b.is_central(config.central_mass_threshold))
        .min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
}

/// Circular velocity for `body` around its nearest central body, plus that
/// body's velocity so the orbit is relative to a moving star.
pub fn snap_to_circular_orbit(
    registry: &BodyRegistry,
    body: BodyId,
    config: &SimulationConfig,
    direction: OrbitDirection,
) -> Option<DVec2> {
    let subject = registry.get(body)?;
    let central = nearest_central_body(registry, subject.pos, config, Some(body))?;
    Some(central.vel + circular_orbit_velocity(subject.pos, central.pos, central.mass, config.g, direction))
}

/// Add to every dynamic body the tangential velocity contributed by each
/// other active body.
///
/// Tangents follow the clockwise sense, matching the demo scenes. Returns
/// how many bodies were seeded.
pub fn seed_orbital_velocities(registry: &mut BodyRegistry, config: &SimulationConfig, shape: OrbitShape) -> usize {
    let snapshot: Vec<(BodyId, DVec2, f64)> = registry
        .iter_active()
        .filter(|b| b.has_valid_mass())
        .map(|b| (b.id, b.pos, b.mass))
        .collect();

    let mut seeded = 0;
    for body in registry.bodies_mut().iter_mut().filter(|b| b.receives_gravity()) {
        let mut added = DVec2::ZERO;
        for &(id, pos, mass) in &snapshot {
            if id == body.id {
                continue;
            }
            added += match shape {
                OrbitShape::Circular => {
                    circular_orbit_velocity(body.pos, pos, mass, config.g, OrbitDirection::Clockwise)
                }
                OrbitShape::Elliptical => {
                    elliptical_orbit_velocity(body.pos, pos, mass, config.g, OrbitDirection::Clockwise)
                }
            };
        }
        if added.is_finite() && added != DVec2::ZERO {
            body.vel += added;
            seeded += 1;
        }
    }
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodySpec, MotionState};
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_velocity_magnitude_and_direction() {
        let v = circular_orbit_velocity(
            DVec2::new(10.0, 0.0),
            DVec2::ZERO,
            1000.0,
            100.0,
            OrbitDirection::CounterClockwise,
        );
        assert_relative_eq!(v.length(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert!(v.y > 0.0);

        let cw = circular_orbit_velocity(DVec2::new(10.0, 0.0), DVec2::ZERO, 1000.0, 100.0, OrbitDirection::Clockwise);
        assert_eq!(cw, -v);
    }

    #[test]
    fn test_coincident_positions_yield_zero() {
        let v = circular_orbit_velocity(DVec2::ONE, DVec2::ONE, 10.0, 1.0, OrbitDirection::Clockwise);
        assert_eq!(v, DVec2::ZERO);
    }

    #[test]
    fn test_elliptical_faster_than_circular() {
        let pos = DVec2::new(0.0, 8.0);
        let circ = circular_orbit_velocity(pos, DVec2::ZERO, 50.0, 100.0, OrbitDirection::Clockwise);
        let ell = elliptical_orbit_velocity(pos, DVec2::ZERO, 50.0, 100.0, OrbitDirection::Clockwise);
        // sqrt(2 - 1/1.5) = sqrt(4/3)
        assert_relative_eq!(ell.length() / circ.length(), (4.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(ell.normalize().dot(circ.normalize()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nearest_central_body() {
        let mut registry = BodyRegistry::new();
        let far_star = registry.add(BodySpec::new(DVec2::new(100.0, 0.0), 500.0).central());
        let near_star = registry.add(BodySpec::new(DVec2::new(-10.0, 0.0), 500.0).central());
        let heavy = registry.add(BodySpec::new(DVec2::new(2.0, 0.0), 400.0));
        let planet = registry.add(BodySpec::new(DVec2::ZERO, 1.0));

        let config = SimulationConfig::default();
        let found = nearest_central_body(&registry, DVec2::ZERO, &config, Some(planet)).unwrap();
        assert_eq!(found.id, near_star);

        // Mass threshold promotes the closer heavy body
        let config = SimulationConfig {
            central_mass_threshold: 300.0,
            ..Default::default()
        };
        let found = nearest_central_body(&registry, DVec2::ZERO, &config, Some(planet)).unwrap();
        assert_eq!(found.id, heavy);

        // Placing stars are ignored
        registry.set_motion_state(near_star, MotionState::Placing).unwrap();
        let found = nearest_central_body(&registry, DVec2::ZERO, &SimulationConfig::default(), None).unwrap();
        assert_eq!(found.id, far_star);
    }

    #[test]
    fn test_no_central_body() {
        let mut registry = BodyRegistry::new();
        let only = registry.add(BodySpec::new(DVec2::ZERO, 1.0));
        let config = SimulationConfig::default();
        assert!(nearest_central_body(&registry, DVec2::ZERO, &config, None).is_none());
        assert!(snap_to_circular_orbit(&registry, only, &config, OrbitDirection::Clockwise).is_none());
    }

    #[test]
    fn test_snap_adds_central_velocity() {
        let mut registry = BodyRegistry::new();
        registry.add(
            BodySpec::new(DVec2::ZERO, 1000.0)
                .central()
                .with_velocity(DVec2::new(3.0, 0.0)),
        );
        let planet = registry.add(BodySpec::new(DVec2::new(0.0, 10.0), 1.0));

        let vel = snap_to_circular_orbit(&registry, planet, &SimulationConfig::default(), OrbitDirection::CounterClockwise)
            .unwrap();
        // CCW tangent at (0, r) points to -x
        assert_relative_eq!(vel.x, 3.0 - 100.0, epsilon = 1e-9);
        assert_relative_eq!(vel.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_seed_skips_pinned_and_placing() {
        let mut registry = BodyRegistry::new();
        let star = registry.add(
            BodySpec::new(DVec2::ZERO, 1000.0)
                .central()
                .with_motion(MotionState::Kinematic),
        );
        let planet = registry.add(BodySpec::new(DVec2::new(10.0, 0.0), 1.0));
        let pending = registry.add(BodySpec::new(DVec2::new(0.0, 5.0), 1.0).with_motion(MotionState::Placing));

        let seeded = seed_orbital_velocities(&mut registry, &SimulationConfig::default(), OrbitShape::Circular);

        assert_eq!(seeded, 1);
        assert_eq!(registry.get(star).unwrap().vel, DVec2::ZERO);
        assert_eq!(registry.get(pending).unwrap().vel, DVec2::ZERO);
        let vel = registry.get(planet).unwrap().vel;
        assert_relative_eq!(vel.length(), 100.0, epsilon = 1e-9);
        // Clockwise at (r, 0) heads to -y
        assert!(vel.y < 0.0);
    }
}
