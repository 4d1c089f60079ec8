//! Gizmo rendering for the gravity sandbox.
//!
//! Bodies live only in the registry, so everything is drawn with immediate
//! mode gizmos straight from it: body discs, the launch preview and the
//! orbit debug display.

pub mod orbits;
pub mod trails;

use bevy::prelude::*;

use crate::camera::to_render;
use crate::config::SimulationConfig;
use crate::launch::LaunchController;
use crate::prediction::LaunchPreview;
use crate::registry::BodyRegistry;
use crate::types::{Body, MotionState};

pub use self::orbits::{
    build_predicted_orbits, orbit_color, OrbitDisplayMode, OrbitDisplayPlugin, OrbitDisplaySettings, PredictedOrbits,
};
pub use self::trails::LiveTrails;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(OrbitDisplayPlugin)
            .add_systems(Update, (draw_bodies, draw_launch_preview));
    }
}

/// Visual radius of a body: grows with the cube root of mass.
pub fn body_radius(mass: f64) -> f32 {
    if mass.is_finite() && mass > 0.0 {
        (mass.cbrt() as f32 * 0.6).clamp(0.5, 12.0)
    } else {
        0.5
    }
}

fn body_color(body: &Body, central_mass_threshold: f64) -> Color {
    match body.motion {
        MotionState::Placing => Color::srgba(0.8, 0.8, 0.8, 0.6),
        _ if !body.has_valid_mass() => Color::srgb(1.0, 0.1, 0.1),
        _ => orbit_color(body, central_mass_threshold, 1.0),
    }
}

fn draw_bodies(mut gizmos: Gizmos, registry: Res<BodyRegistry>, sim: Res<SimulationConfig>) {
    for body in registry.iter() {
        let color = body_color(body, sim.central_mass_threshold);
        gizmos.circle_2d(to_render(body.pos), body_radius(body.mass), color);
    }
}

/// Draw the predicted launch path and the pull-back line while dragging.
fn draw_launch_preview(mut gizmos: Gizmos, preview: Res<LaunchPreview>, controller: Res<LaunchController>) {
    if let Some(gesture) = controller.gesture() {
        gizmos.line_2d(
            to_render(gesture.start),
            to_render(gesture.pointer),
            Color::srgba(1.0, 1.0, 1.0, 0.4),
        );
    }

    let total = preview.path.len();
    if total < 2 {
        return;
    }

    // Fade along the path
    let points = preview.path.iter().enumerate().map(|(i, p)| {
        let alpha = 1.0 - (i as f32 / total as f32) * 0.8;
        (to_render(*p), Color::srgba(0.0, 0.85, 1.0, alpha))
    });
    gizmos.linestrip_gradient_2d(points);
}
