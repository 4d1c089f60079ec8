//! Fixed-step integration of accumulated forces.
//!
//! Stands in for the host engine's rigid-body step: semi-implicit
//! (symplectic) Euler, which is what a typical game physics engine does with
//! `AddForce` each fixed update.

use bevy::math::DVec2;

use crate::registry::BodyRegistry;

/// Advance every dynamic body by one step and clear force accumulators.
///
/// For each dynamic body with a valid mass:
/// 1. v += F/m * dt
/// 2. x += v * dt
///
/// Bodies that do not receive gravity keep their velocity and position, but
/// their accumulator is still cleared so stale force never carries over.
pub fn integrate(registry: &mut BodyRegistry, dt: f64) {
    for body in registry.bodies_mut() {
        if body.receives_gravity() && body.has_valid_mass() {
            body.vel += body.force / body.mass * dt;
            body.pos += body.vel * dt;
        }
        body.force = DVec2::ZERO;
    }
}

/// Velocity change a force is expected to produce over one step.
#[inline]
pub fn predicted_delta_v(force: DVec2, mass: f64, dt: f64) -> DVec2 {
    if mass > 0.0 { force / mass * dt } else { DVec2::ZERO }
}
