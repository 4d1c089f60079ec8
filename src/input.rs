//! Input handling for keyboard shortcuts and the drag-to-launch gesture.
//!
//! Number keys spawn a body at the cursor, the left mouse button pulls it
//! back and releases it. Everything device-specific stays here; the
//! workflow itself lives in [`LaunchController`].

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::{apply_zoom, to_physics, CameraState, MainCamera, ZOOM_SPEED};
use crate::config::{PredictionConfig, SimulationConfig};
use crate::diagnostics::log_registry_report;
use crate::launch::LaunchController;
use crate::physics::{snap_to_circular_orbit, OrbitDirection, SimulationClock};
use crate::registry::BodyRegistry;
use crate::render::OrbitDisplaySettings;
use crate::scenarios::{CurrentScenario, LoadScenario, SpawnPreset, SCENARIOS, SPAWN_PRESETS};
use crate::types::{BodySpec, InputSystemSet};

/// Cursor position in scene coordinates, refreshed every frame.
#[derive(Resource, Default, Debug)]
pub struct CursorPosition(pub Option<DVec2>);

/// Plugin providing keyboard shortcuts and the launch gesture.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPosition>()
            .configure_sets(Update, InputSystemSet::Launch.after(InputSystemSet::Placement))
            .add_systems(
                Update,
                (
                    track_cursor.before(InputSystemSet::Placement),
                    place_bodies.in_set(InputSystemSet::Placement),
                    launch_gesture.in_set(InputSystemSet::Launch),
                    keyboard_shortcuts,
                ),
            );
    }
}

const SPAWN_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
const SCENARIO_KEYS: [KeyCode; 4] = [KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8];

/// Spawn preset bound to `key`, if any.
pub fn spawn_preset_for_key(key: KeyCode) -> Option<&'static SpawnPreset> {
    SPAWN_KEYS
        .iter()
        .position(|k| *k == key)
        .and_then(|i| SPAWN_PRESETS.get(i))
}

/// Scenario id bound to `key`, if any.
pub fn scenario_for_key(key: KeyCode) -> Option<&'static str> {
    SCENARIO_KEYS
        .iter()
        .position(|k| *k == key)
        .and_then(|i| SCENARIOS.get(i))
        .map(|s| s.id)
}

/// Body spec for a spawn preset dropped at `pos`.
pub fn spawn_spec(preset: &SpawnPreset, pos: DVec2) -> BodySpec {
    let spec = BodySpec::new(pos, preset.mass);
    if preset.central { spec.central() } else { spec }
}

fn track_cursor(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut cursor: ResMut<CursorPosition>,
) {
    let (Ok(window), Ok((camera, camera_transform))) = (window_query.single(), camera_query.single()) else {
        cursor.0 = None;
        return;
    };

    cursor.0 = window
        .cursor_position()
        .and_then(|screen| camera.viewport_to_world_2d(camera_transform, screen).ok())
        .map(to_physics);
}

/// Spawn, follow and cancel the body being placed.
fn place_bodies(
    keys: Res<ButtonInput<KeyCode>>,
    cursor: Res<CursorPosition>,
    sim: Res<SimulationConfig>,
    mut registry: ResMut<BodyRegistry>,
    mut controller: ResMut<LaunchController>,
) {
    controller.sync(&registry);

    if keys.just_pressed(KeyCode::Escape) {
        controller.cancel(&mut registry);
        return;
    }

    if let Some(pointer) = cursor.0
        && let Some(preset) = keys.get_just_pressed().find_map(|k| spawn_preset_for_key(*k))
    {
        controller.spawn(&mut registry, spawn_spec(preset, pointer));
        info!("Placing {} (mass {})", preset.name, preset.mass);
    }

    // C: drop the pending body straight onto a circular orbit
    if keys.just_pressed(KeyCode::KeyC)
        && let Some(id) = controller.placing()
    {
        match snap_to_circular_orbit(&registry, id, &sim, OrbitDirection::CounterClockwise) {
            Some(vel) => {
                if let Ok(Some(launch)) = controller.release_with(&mut registry, vel) {
                    info!("Body {} released on a circular orbit at {:.2} units/s", launch.body, vel.length());
                }
            }
            None => warn!("No central body to orbit"),
        }
        return;
    }

    if let Some(pointer) = cursor.0
        && let Err(err) = controller.follow_pointer(&mut registry, pointer)
    {
        warn!("Placement lost its body: {}", err);
    }
}

/// Pull back with the left button and release to launch.
fn launch_gesture(
    mouse: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorPosition>,
    prediction: Res<PredictionConfig>,
    mut registry: ResMut<BodyRegistry>,
    mut controller: ResMut<LaunchController>,
) {
    if mouse.just_pressed(MouseButton::Left)
        && let Some(pointer) = cursor.0
        && let Err(err) = controller.press(&registry, pointer)
    {
        warn!("Cannot start launch drag: {}", err);
    }

    if mouse.pressed(MouseButton::Left)
        && let Some(pointer) = cursor.0
    {
        controller.drag(pointer);
    }

    if mouse.just_released(MouseButton::Left) {
        match controller.release(&mut registry, cursor.0, &prediction) {
            Ok(Some(launch)) => info!(
                "Launched body {} at ({:.2}, {:.2})",
                launch.body, launch.velocity.x, launch.velocity.y
            ),
            Ok(None) => {}
            Err(err) => warn!("Launch failed: {}", err),
        }
    }
}

/// Handle keyboard shortcuts for simulation control.
#[allow(clippy::too_many_arguments)]
fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    registry: Res<BodyRegistry>,
    sim: Res<SimulationConfig>,
    current: Res<CurrentScenario>,
    mut clock: ResMut<SimulationClock>,
    mut display: ResMut<OrbitDisplaySettings>,
    mut camera_state: ResMut<CameraState>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
    mut load_requests: MessageWriter<LoadScenario>,
) {
    // Space: toggle pause
    if keys.just_pressed(KeyCode::Space) {
        clock.paused = !clock.paused;
        info!("Simulation {}", if clock.paused { "paused" } else { "running" });
    }

    // D: registry report
    if keys.just_pressed(KeyCode::KeyD) {
        log_registry_report(&registry, &sim);
    }

    // Tab: switch orbit display mode, O: hide it
    if keys.just_pressed(KeyCode::Tab) {
        display.mode = display.mode.toggled();
        let mode = &display.mode;
        info!("Orbit display: {:?}", mode);
    }
    if keys.just_pressed(KeyCode::KeyO) {
        display.visible = !display.visible;
    }

    if let Some(id) = keys.get_just_pressed().find_map(|k| scenario_for_key(*k)) {
        load_requests.write(LoadScenario { scenario_id: id });
    }

    // R: reload the current scenario
    if keys.just_pressed(KeyCode::KeyR) {
        load_requests.write(LoadScenario { scenario_id: current.id });
    }

    let Ok(mut projection) = camera_query.single_mut() else {
        return;
    };
    let Projection::Orthographic(ref mut ortho) = *projection else {
        return;
    };

    // Plus/Equal: zoom in (reduce scale)
    if keys.pressed(KeyCode::Equal) || keys.pressed(KeyCode::NumpadAdd) {
        ortho.scale = apply_zoom(ortho.scale, 1.0 - ZOOM_SPEED);
        camera_state.zoom = ortho.scale;
    }

    // Minus: zoom out (increase scale)
    if keys.pressed(KeyCode::Minus) || keys.pressed(KeyCode::NumpadSubtract) {
        ortho.scale = apply_zoom(ortho.scale, 1.0 + ZOOM_SPEED);
        camera_state.zoom = ortho.scale;
    }
}
