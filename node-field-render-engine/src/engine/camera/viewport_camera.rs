use super::control_gate::CameraControlGate;
use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

/// Marks the camera used for rendering and picking the node field.
#[derive(Component, Default)]
pub struct NodeFieldCamera;

/// Orbit camera around a focus point.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    /// Higher is snappier.
    pub smoothing: f32,
}

impl ViewportCamera {
    pub fn framing(max_radius: f32) -> Self {
        Self {
            distance: (max_radius * 2.2).max(10.0),
            max_distance: (max_radius * 6.0).max(50.0),
            ..default()
        }
    }

    pub fn orbit(&mut self, pixel_delta: Vec2) {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw -= pixel_delta.x * yaw_sens;
        self.pitch = (self.pitch - pixel_delta.y * pitch_sens).clamp(-1.55, 1.55);
    }

    pub fn dolly(&mut self, scroll: f32) {
        let dolly_speed = (self.distance * 0.1).clamp(0.5, 50.0);
        self.distance =
            (self.distance - scroll * dolly_speed).clamp(self.min_distance, self.max_distance);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera position for the current orbit parameters.
    pub fn eye(&self) -> Vec3 {
        self.focus_point + self.rotation() * Vec3::Z * self.distance
    }

    pub fn target_transform(&self) -> Transform {
        Transform::from_translation(self.eye()).with_rotation(self.rotation())
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 110.0,
            min_distance: 2.0,
            max_distance: 400.0,
            pitch: -0.6,
            yaw: 0.0,
            smoothing: 12.0,
        }
    }
}

/// Orbit on left drag, pan on right drag, dolly on scroll, WASD/QE to move the focus.
///
/// Input is drained but ignored while the gesture layer holds the camera gate.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<NodeFieldCamera>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    gate: Res<CameraControlGate>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    if gate.enabled {
        if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            viewport_camera.orbit(mouse_delta);
        }

        if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
            let rotation = viewport_camera.rotation();
            let pan_speed = viewport_camera.distance * 0.0015;
            viewport_camera.focus_point += (rotation * Vec3::X * -mouse_delta.x
                + rotation * Vec3::Y * mouse_delta.y)
                * pan_speed;
        }

        if scroll_accum.abs() > f32::EPSILON {
            viewport_camera.dolly(scroll_accum);
        }

        let mut move_input = Vec3::ZERO;
        if keyboard.pressed(KeyCode::KeyW) {
            move_input.z -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            move_input.z += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            move_input.x += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            move_input.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyE) {
            move_input.y += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyQ) {
            move_input.y -= 1.0;
        }

        if move_input != Vec3::ZERO {
            let rotation = viewport_camera.rotation();
            let forward = (rotation * Vec3::Z).normalize();
            let right = (rotation * Vec3::X).normalize();

            // Shift faster, ctrl slower
            let mut speed = (viewport_camera.distance * 0.5).clamp(2.0, 200.0);
            if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
                speed *= 3.5;
            }
            if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
                speed *= 0.25;
            }

            let world_delta = right * move_input.x + Vec3::Y * move_input.y + forward * move_input.z;
            viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
        }
    }

    let target = viewport_camera.target_transform();
    let lerp_speed = (viewport_camera.smoothing * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
