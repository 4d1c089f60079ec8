//! 2D camera for the gravity sandbox.
//!
//! Provides zoom and pan. Scene units map 1:1 to render units, so only the
//! f64/f32 conversion happens between physics and rendering.

use bevy::{
    camera::ScalingMode,
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    math::DVec2,
    prelude::*,
};

/// Minimum zoom level (closest zoom).
pub const MIN_ZOOM: f32 = 0.05;

/// Maximum zoom level (furthest zoom).
pub const MAX_ZOOM: f32 = 20.0;

/// Default zoom level.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Viewport height in scene units at zoom 1.0.
pub const VIEWPORT_HEIGHT: f32 = 400.0;

/// Zoom speed multiplier for scroll wheel and keys.
pub const ZOOM_SPEED: f32 = 0.1;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Resource tracking camera state.
#[derive(Resource)]
pub struct CameraState {
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraState>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (camera_zoom, camera_pan));
    }
}

/// Physics position to render position.
#[inline]
pub fn to_render(pos: DVec2) -> Vec2 {
    pos.as_vec2()
}

/// Render (world) position to physics position.
#[inline]
pub fn to_physics(pos: Vec2) -> DVec2 {
    pos.as_dvec2()
}

/// Clamp-multiply a zoom level.
pub fn apply_zoom(scale: f32, factor: f32) -> f32 {
    (scale * factor).clamp(MIN_ZOOM, MAX_ZOOM)
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEWPORT_HEIGHT,
            },
            scale: DEFAULT_ZOOM,
            ..OrthographicProjection::default_2d()
        }),
        MainCamera,
    ));
}

/// Handle mouse scroll wheel for zoom.
fn camera_zoom(
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
    mut camera_state: ResMut<CameraState>,
) {
    if mouse_scroll.delta.y == 0.0 {
        return;
    }

    let Ok(mut projection) = camera_query.single_mut() else {
        return;
    };

    let Projection::Orthographic(ref mut ortho) = *projection else {
        return;
    };

    // Logarithmic zoom
    ortho.scale = apply_zoom(ortho.scale, 1.0 - mouse_scroll.delta.y * ZOOM_SPEED);
    camera_state.zoom = ortho.scale;
}

/// Handle middle mouse button drag for panning.
fn camera_pan(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    windows: Query<&Window>,
    mut camera_query: Query<(&mut Transform, &Projection), With<MainCamera>>,
) {
    if !mouse_buttons.pressed(MouseButton::Middle) {
        return;
    }

    let Ok((mut transform, projection)) = camera_query.single_mut() else {
        return;
    };

    let Projection::Orthographic(ortho) = projection else {
        return;
    };

    // Pixels to scene units for a fixed-vertical viewport
    let window_height = windows.iter().next().map_or(VIEWPORT_HEIGHT, |w| w.height()).max(1.0);
    let units_per_pixel = VIEWPORT_HEIGHT * ortho.scale / window_height;
    let delta = mouse_motion.delta * units_per_pixel;

    transform.translation.x -= delta.x;
    transform.translation.y += delta.y;
}
