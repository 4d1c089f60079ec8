//! Orbit Crucible - 2D N-body gravity sandbox
//!
//! Spawn bodies with 1-3, pull back with the left mouse button to launch.

use bevy::prelude::*;

use orbit_crucible::camera::CameraPlugin;
use orbit_crucible::input::InputPlugin;
use orbit_crucible::physics::PhysicsPlugin;
use orbit_crucible::prediction::PredictionPlugin;
use orbit_crucible::render::RenderPlugin;
use orbit_crucible::scenarios::ScenarioPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)))
        // Physics owns the registry the other plugins read
        .add_plugins((PhysicsPlugin, PredictionPlugin))
        .add_plugins((CameraPlugin, RenderPlugin, InputPlugin, ScenarioPlugin))
        .run();
}
