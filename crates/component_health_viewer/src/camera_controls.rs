use bevy::camera::Viewport;
use bevy::ecs::message::MessageReader;
use bevy::input::gestures::PinchGesture;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::viewer_config::ViewerConfig;
use crate::viewer_state::ViewerState;

const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
const ORBIT_PAN_SENSITIVITY: f32 = 0.002;
const ORBIT_ZOOM_SENSITIVITY: f32 = 0.2;
const ORBIT_PITCH_LIMIT: f32 = 1.54;

#[derive(Component)]
pub(super) struct ViewerCamera;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub(super) struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    /// Camera on the +Z axis looking back at the origin.
    pub(super) fn facing_origin(radius: f32) -> Self {
        Self {
            focus: Vec3::ZERO,
            radius,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub(super) fn apply_to_transform(&self, transform: &mut Transform) {
        let rotation = Quat::from_axis_angle(Vec3::Y, self.yaw)
            * Quat::from_axis_angle(Vec3::X, -self.pitch);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        transform.translation = self.focus + offset;
        transform.look_at(self.focus, Vec3::Y);
    }
}

#[derive(Resource, Default)]
pub(super) struct OrbitDragState {
    last_cursor_position: Option<Vec2>,
}

pub(super) fn orbit_camera_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<ViewerConfig>,
    state: Res<ViewerState>,
    mut egui_contexts: EguiContexts,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut pinch_gesture: MessageReader<PinchGesture>,
    mut drag_state: ResMut<OrbitDragState>,
    mut query: Query<(&mut OrbitCamera, &mut Transform), With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let pointer_over_ui = egui_contexts
        .ctx_mut()
        .ok()
        .map(|ctx| ctx.is_pointer_over_area() || ctx.wants_pointer_input())
        .unwrap_or(false);
    let cursor_position = window.cursor_position();
    let left_inset = panel_inset_px(&state, &config);
    let cursor_in_3d = !pointer_over_ui
        && cursor_position
            .map(|cursor| cursor_in_3d_view(cursor, left_inset))
            .unwrap_or(false);

    let shift_pressed = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    let rotate_drag = buttons.pressed(MouseButton::Left) && !shift_pressed;
    let pan_drag = buttons.pressed(MouseButton::Right)
        || buttons.pressed(MouseButton::Middle)
        || (buttons.pressed(MouseButton::Left) && shift_pressed);
    let dragging = cursor_in_3d && (rotate_drag || pan_drag);

    let (delta, next_cursor) =
        drag_delta(drag_state.last_cursor_position, cursor_position, dragging);
    drag_state.last_cursor_position = next_cursor;

    let mut scroll = 0.0;
    for event in mouse_wheel.read() {
        if cursor_in_3d {
            scroll += normalized_mouse_wheel_delta(event.unit, event.y);
        }
    }
    for event in pinch_gesture.read() {
        if cursor_in_3d {
            scroll += pinch_scroll_delta(event.0);
        }
    }

    let Ok((mut orbit, mut transform)) = query.single_mut() else {
        return;
    };

    let input_changed = apply_orbit_input(
        &mut orbit,
        delta,
        scroll,
        rotate_drag && dragging,
        pan_drag && dragging,
        config.camera.min_distance,
        config.camera.max_distance,
    );
    let rotated = state.auto_rotate()
        && apply_auto_rotate(&mut orbit, config.auto_rotate_speed, time.delta_secs());

    if input_changed || rotated {
        orbit.apply_to_transform(&mut transform);
    }
}

/// Shrinks the 3D viewport to the area right of the panel while the menu is
/// open.
pub(super) fn update_3d_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<ViewerConfig>,
    state: Res<ViewerState>,
    mut cameras: Query<&mut Camera, With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    let next = viewport_with_left_inset(
        UVec2::new(window.physical_width(), window.physical_height()),
        panel_inset_px(&state, &config),
        window.scale_factor(),
    );
    let current_rect = camera
        .viewport
        .as_ref()
        .map(|viewport| (viewport.physical_position, viewport.physical_size));
    let next_rect = next
        .as_ref()
        .map(|viewport| (viewport.physical_position, viewport.physical_size));
    if current_rect != next_rect {
        camera.viewport = next;
    }
}

fn panel_inset_px(state: &ViewerState, config: &ViewerConfig) -> f32 {
    if state.menu_open() {
        config.panel_width_px
    } else {
        0.0
    }
}

fn viewport_with_left_inset(
    window_physical_size: UVec2,
    left_inset_px: f32,
    scale_factor: f32,
) -> Option<Viewport> {
    let inset_physical = (left_inset_px * scale_factor).round().max(0.0) as u32;
    if inset_physical == 0 {
        return None;
    }
    let width = window_physical_size
        .x
        .saturating_sub(inset_physical)
        .max(1);
    let inset_physical = window_physical_size.x.saturating_sub(width);
    Some(Viewport {
        physical_position: UVec2::new(inset_physical, 0),
        physical_size: UVec2::new(width, window_physical_size.y.max(1)),
        depth: 0.0..1.0,
    })
}

fn cursor_in_3d_view(cursor: Vec2, left_inset_px: f32) -> bool {
    cursor.x >= left_inset_px
}

fn drag_delta(
    previous: Option<Vec2>,
    current: Option<Vec2>,
    dragging: bool,
) -> (Vec2, Option<Vec2>) {
    if !dragging {
        return (Vec2::ZERO, None);
    }

    let Some(cursor) = current else {
        return (Vec2::ZERO, None);
    };

    let delta = previous.map(|last| cursor - last).unwrap_or(Vec2::ZERO);
    (delta, Some(cursor))
}

fn normalized_mouse_wheel_delta(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / MouseScrollUnit::SCROLL_UNIT_CONVERSION_FACTOR,
    }
}

fn pinch_scroll_delta(delta: f32) -> f32 {
    // Pinch magnify deltas are much smaller than line-based wheel deltas.
    delta * 8.0
}

fn apply_orbit_input(
    orbit: &mut OrbitCamera,
    delta: Vec2,
    scroll: f32,
    rotate_drag: bool,
    pan_drag: bool,
    min_radius: f32,
    max_radius: f32,
) -> bool {
    let mut changed = false;

    if rotate_drag && delta != Vec2::ZERO {
        orbit.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        orbit.pitch = (orbit.pitch + delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
        changed = true;
    }

    if pan_drag && delta != Vec2::ZERO {
        let rotation = Quat::from_axis_angle(Vec3::Y, orbit.yaw)
            * Quat::from_axis_angle(Vec3::X, -orbit.pitch);
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let pan_scale = orbit.radius * ORBIT_PAN_SENSITIVITY;
        orbit.focus += (-delta.x * pan_scale) * right + (delta.y * pan_scale) * up;
        changed = true;
    }

    if scroll != 0.0 {
        orbit.radius =
            (orbit.radius * (1.0 - scroll * ORBIT_ZOOM_SENSITIVITY)).clamp(min_radius, max_radius);
        changed = true;
    }

    changed
}

fn apply_auto_rotate(orbit: &mut OrbitCamera, speed: f32, delta_secs: f32) -> bool {
    if speed == 0.0 || !delta_secs.is_finite() || delta_secs <= 0.0 {
        return false;
    }
    orbit.yaw = (orbit.yaw + speed * delta_secs).rem_euclid(std::f32::consts::TAU);
    true
}

#[cfg(test)]
#[path = "camera_controls_tests.rs"]
mod tests;
