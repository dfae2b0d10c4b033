use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{camera, damping};
use crate::settings::TreeSettings;
use crate::state::ResetView;

/// Marker for the scene camera.
#[derive(Component, Default)]
pub struct TreeCamera;

/// Damped orbit around the origin. Input moves the targets; the camera
/// eases toward them every frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub target_distance: f32,
}

/// Keeps the orbit off the poles.
const PITCH_LIMIT: f32 = 1.5;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(camera::START_POSITION)
    }
}

impl OrbitCamera {
    /// Orbit that places the camera at `position`, facing the origin.
    pub fn looking_from(position: Vec3) -> Self {
        let distance = position.length().max(camera::MIN_DISTANCE);
        let pitch = (position.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = position.x.atan2(position.z);
        Self {
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        Vec3::new(pitch_cos * yaw_sin, pitch_sin, pitch_cos * yaw_cos) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(Vec3::ZERO, Vec3::Y)
    }

    pub fn orbit(&mut self, delta: Vec2, sensitivity: f32) {
        self.target_yaw -= delta.x * sensitivity;
        self.target_pitch =
            (self.target_pitch + delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive `steps` zoom in.
    pub fn zoom(&mut self, steps: f32, max_distance: f32) {
        let factor = (1.0 - steps * camera::ZOOM_STEP).max(0.1);
        self.target_distance =
            (self.target_distance * factor).clamp(camera::MIN_DISTANCE, max_distance);
    }

    pub fn step(&mut self) {
        self.yaw += (self.target_yaw - self.yaw) * damping::CAMERA;
        self.pitch += (self.target_pitch - self.pitch) * damping::CAMERA;
        self.distance += (self.target_distance - self.distance) * damping::CAMERA;
    }

    /// Snap back to the starting pose.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Left-drag orbits, the wheel zooms. Ignored while egui owns the pointer.
pub fn orbit_camera_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    settings: Res<TreeSettings>,
    mut contexts: EguiContexts,
    mut cameras: Query<&mut OrbitCamera, With<TreeCamera>>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
            return;
        }
    }

    let Ok(mut orbit) = cameras.single_mut() else {
        return;
    };

    if mouse_buttons.pressed(MouseButton::Left) && mouse_motion.delta != Vec2::ZERO {
        orbit.orbit(mouse_motion.delta, settings.orbit_sensitivity);
    }

    if mouse_scroll.delta.y != 0.0 {
        let steps = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / 100.0,
        };
        orbit.zoom(steps, settings.max_camera_distance);
    }
}

pub fn reset_orbit_camera(
    mut events: MessageReader<ResetView>,
    mut cameras: Query<&mut OrbitCamera, With<TreeCamera>>,
) {
    if events.read().count() == 0 {
        return;
    }
    for mut orbit in &mut cameras {
        orbit.reset();
    }
}

/// Ease the camera toward its orbit targets.
pub fn damp_orbit_camera(mut cameras: Query<(&mut OrbitCamera, &mut Transform), With<TreeCamera>>) {
    for (mut orbit, mut transform) in &mut cameras {
        orbit.step();
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_the_configured_position() {
        let orbit = OrbitCamera::default();
        assert!(orbit.position().distance(camera::START_POSITION) < 1e-3);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut orbit = OrbitCamera::default();
        for _ in 0..100 {
            orbit.zoom(-1.0, 80.0);
        }
        assert_eq!(orbit.target_distance, 80.0);
        for _ in 0..100 {
            orbit.zoom(1.0, 80.0);
        }
        assert_eq!(orbit.target_distance, camera::MIN_DISTANCE);
    }

    #[test]
    fn motion_is_damped() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(-200.0, 0.0), 0.005);
        orbit.step();
        assert!((orbit.yaw - 0.05).abs() < 1e-5);
        assert!((orbit.target_yaw - 1.0).abs() < 1e-5);
    }

    #[test]
    fn reset_restores_start_pose() {
        let mut app = App::new();
        app.add_message::<ResetView>()
            .add_systems(Update, reset_orbit_camera);
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(300.0, 40.0), 0.005);
        orbit.zoom(3.0, 80.0);
        orbit.step();
        let entity = app.world_mut().spawn((TreeCamera, orbit)).id();

        app.world_mut().write_message(ResetView);
        app.update();
        assert_eq!(*app.world().get::<OrbitCamera>(entity).unwrap(), OrbitCamera::default());
    }
}
