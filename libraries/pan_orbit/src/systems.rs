use bevy::prelude::*;

use crate::components::{PanOrbitCamera, PanOrbitState};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Reads user input and writes the camera transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct PanOrbitSystems;

#[derive(Default)]
pub(crate) struct BlockedInputs {
    pointer: bool,
    keyboard: bool,
}

pub(crate) fn get_blocked_inputs(
    mut egui: bevy_egui::EguiContexts,
    q_window_entities: Query<Entity, With<Window>>,
) -> BlockedInputs {
    let mut ret = BlockedInputs::default();
    for window_entity in &q_window_entities {
        if let Some(ctx) = egui.try_ctx_for_entity_mut(window_entity) {
            ret.pointer |= ctx.wants_pointer_input();
            ret.keyboard |= ctx.wants_keyboard_input();
        }
    }
    ret
}

fn wrap_angle(angle: f32) -> f32 {
    if angle > PI {
        angle - TAU
    } else if angle < -PI {
        angle + TAU
    } else {
        angle
    }
}

pub(crate) fn pan_orbit_input(
    In(blocked_inputs): In<BlockedInputs>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut evr_motion: EventReader<MouseMotion>,
    mut evr_scroll: EventReader<MouseWheel>,
    mut q_camera: Query<(&PanOrbitCamera, &mut PanOrbitState, &Transform)>,
) {
    // Accumulate pending events even when blocked so they don't replay later.
    let mut total_motion: Vec2 = evr_motion.read().map(|ev| ev.delta).sum();

    // Window coordinates are Y-down.
    total_motion.y = -total_motion.y;

    let mut total_scroll_lines = Vec2::ZERO;
    let mut total_scroll_pixels = Vec2::ZERO;
    for ev in evr_scroll.read() {
        match ev.unit {
            MouseScrollUnit::Line => {
                total_scroll_lines.x += ev.x;
                total_scroll_lines.y -= ev.y;
            }
            MouseScrollUnit::Pixel => {
                total_scroll_pixels.x += ev.x;
                total_scroll_pixels.y -= ev.y;
            }
        }
    }

    if blocked_inputs.pointer {
        return;
    }

    for (settings, mut state, transform) in &mut q_camera {
        let mut total_pan = Vec2::ZERO;
        let mut total_orbit = Vec2::ZERO;
        if mouse_buttons.pressed(MouseButton::Left)
            && !blocked_inputs.keyboard
            && (keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight))
        {
            total_pan -= total_motion * settings.pan_sensitivity;
        } else if mouse_buttons.pressed(MouseButton::Left) {
            total_orbit -= total_motion * settings.orbit_sensitivity;
        } else if mouse_buttons.pressed(MouseButton::Right) {
            total_pan -= total_motion * settings.pan_sensitivity;
        }

        let mut total_zoom = Vec2::ZERO;
        total_zoom -=
            total_scroll_lines * settings.scroll_line_sensitivity * settings.zoom_sensitivity;
        total_zoom -=
            total_scroll_pixels * settings.scroll_pixel_sensitivity * settings.zoom_sensitivity;

        // Orbiting upside-down reverses the horizontal direction.
        if mouse_buttons.just_pressed(MouseButton::Left) {
            state.upside_down = state.pitch < -FRAC_PI_2 || state.pitch > FRAC_PI_2;
        }
        if state.upside_down {
            total_orbit.x = -total_orbit.x;
        }

        if total_zoom != Vec2::ZERO {
            // Exponential so that zooming feels uniform at every distance.
            let radius = state.radius * (-total_zoom.y).exp();
            state.radius = settings.clamp_radius(radius);
        }

        if total_orbit != Vec2::ZERO {
            state.yaw = wrap_angle(state.yaw + total_orbit.x);
            state.pitch = wrap_angle(state.pitch + total_orbit.y);
        }

        // Pan scales with the radius to adapt to the current zoom.
        if total_pan != Vec2::ZERO {
            let radius = state.radius;
            state.center += transform.right() * total_pan.x * radius;
            state.center += transform.up() * total_pan.y * radius;
        }
    }
}

pub(crate) fn update_camera_transform(
    mut q_camera: Query<(&PanOrbitState, &mut Transform), Changed<PanOrbitState>>,
) {
    for (state, mut transform) in &mut q_camera {
        let next = state.transform();
        transform.translation = next.translation;
        transform.rotation = next.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PanOrbitCameraPlugin;
    use approx::assert_abs_diff_eq;

    #[test]
    fn angles_wrap_to_half_turn() {
        assert_abs_diff_eq!(wrap_angle(PI + 0.5), -PI + 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(wrap_angle(-PI - 0.5), PI - 0.5, epsilon = 1e-6);
        assert_eq!(wrap_angle(1.0), 1.0);
    }

    #[test]
    fn radius_is_clamped() {
        let settings = PanOrbitCamera::default();
        assert_eq!(settings.clamp_radius(0.5), 2.0);
        assert_eq!(settings.clamp_radius(5000.0), 1000.0);
        assert_eq!(settings.clamp_radius(40.0), 40.0);
    }

    #[test]
    fn camera_sits_at_radius_from_center() {
        let mut state = PanOrbitState {
            pitch: -0.4,
            yaw: 1.1,
            ..default()
        };
        state.look_at(Vec3::new(20.0, 0.0, 5.0), 12.0);
        let transform = state.transform();
        assert_abs_diff_eq!(
            transform.translation.distance(state.center),
            12.0,
            epsilon = 1e-4
        );
        assert!(transform
            .forward()
            .abs_diff_eq((state.center - transform.translation).normalize(), 1e-5));
    }

    #[test]
    fn changed_state_moves_camera() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, PanOrbitCameraPlugin));
        let camera = app
            .world_mut()
            .spawn((PanOrbitCamera::default(), Transform::default()))
            .id();
        app.update();

        app.world_mut()
            .get_mut::<PanOrbitState>(camera)
            .unwrap()
            .look_at(Vec3::new(0.0, 0.0, -50.0), 200.0);
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(transform
            .translation
            .abs_diff_eq(Vec3::new(0.0, 0.0, 150.0), 1e-3));
    }
}
