//! Per-mode motion rules for decorations.
//!
//! Everything here is pure: given a decoration, the frame's view of the
//! scene and the current transform, it says where the decoration heads
//! next. All positions are in the assembly's local frame.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use super::DecorationKind;
use crate::constants::{damping, decorations, foliage, photos};
use crate::state::SceneMode;

/// Camera pose expressed in the assembly's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCamera {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalCamera {
    /// Convert a world-space camera pose into `assembly`'s frame.
    pub fn relative_to(camera: &GlobalTransform, assembly: &GlobalTransform) -> Self {
        let (_, assembly_rotation, _) = assembly.to_scale_rotation_translation();
        Self {
            position: assembly.affine().inverse().transform_point3(camera.translation()),
            rotation: assembly_rotation.inverse() * camera.rotation(),
        }
    }

    /// Point `distance` units straight ahead of the camera.
    pub fn ahead(&self, distance: f32) -> Vec3 {
        self.position + self.rotation * Vec3::new(0.0, 0.0, -distance)
    }
}

/// What every decoration needs to know about the current frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub mode: SceneMode,
    pub elapsed: f32,
    pub focus_target: Option<Entity>,
    /// Angular spacing denominator for photos
    pub photo_slots: usize,
    pub assembly_yaw: f32,
    pub camera: Option<LocalCamera>,
}

/// How orientation changes this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Facing {
    Keep,
    /// Absolute yaw
    Yaw(f32),
    /// Incremental yaw
    Spin(f32),
    /// Turn the card's front (+Z) toward a point
    Toward(Vec3),
    Exactly(Quat),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleRule {
    Fixed(f32),
    /// Inversely proportional to camera distance, clamped
    CameraDistance,
}

/// One frame's worth of motion for a decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// `None` holds the current position
    pub position: Option<Vec3>,
    pub rate: f32,
    pub facing: Facing,
    pub scale: ScaleRule,
}

impl Motion {
    fn toward(position: Vec3, facing: Facing) -> Self {
        Self {
            position: Some(position),
            rate: damping::AMBIENT,
            facing,
            scale: ScaleRule::Fixed(1.0),
        }
    }

    fn hold() -> Self {
        Self {
            position: None,
            rate: damping::AMBIENT,
            facing: Facing::Keep,
            scale: ScaleRule::Fixed(1.0),
        }
    }
}

/// Targets resolved for a decoration in the last frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DecorationTarget {
    pub position: Option<Vec3>,
    pub scale: f32,
}

impl Default for DecorationTarget {
    fn default() -> Self {
        Self {
            position: None,
            scale: 1.0,
        }
    }
}

/// Angular spacing denominator for `count` photos.
pub fn photo_slots(count: usize) -> usize {
    count.max(photos::MIN_SLOTS)
}

/// Position on the widened spiral around the trunk.
pub fn photo_tree_position(index: usize, slots: usize) -> Vec3 {
    let r = index as f32 / slots as f32;
    let h = photos::SPIRAL_BOTTOM + r * photos::SPIRAL_SPAN;
    let radius = (foliage::HALF_HEIGHT - h) / (2.0 * foliage::HALF_HEIGHT) * foliage::BASE_RADIUS
        + photos::SPIRAL_RADIUS_PAD;
    let angle = r * PI * photos::SPIRAL_HALF_TURNS;
    Vec3::new(angle.cos() * radius, h, angle.sin() * radius)
}

/// Position on the wavy ring, turned by the assembly yaw.
pub fn photo_ring_position(index: usize, slots: usize, yaw: f32) -> Vec3 {
    let angle = index as f32 / slots as f32 * TAU;
    let ring = Vec3::new(
        angle.cos() * photos::RING_RADIUS,
        (angle * photos::RING_WAVE_FREQUENCY).sin() * photos::RING_WAVE_HEIGHT,
        angle.sin() * photos::RING_RADIUS,
    );
    Quat::from_rotation_y(yaw) * ring
}

/// Motion rule for one decoration.
pub fn decoration_motion(
    entity: Entity,
    kind: DecorationKind,
    rest_position: Vec3,
    view: &FrameView,
) -> Motion {
    match kind {
        DecorationKind::Photo { index } => photo_motion(entity, index, view),
        _ if view.mode == SceneMode::Scatter => Motion::toward(
            rest_position * decorations::SCATTER_SPREAD,
            Facing::Spin(decorations::SCATTER_SPIN),
        ),
        DecorationKind::Star => Motion::toward(
            rest_position,
            Facing::Yaw(view.elapsed * decorations::STAR_SPIN_RATE),
        ),
        DecorationKind::Gift => {
            Motion::toward(rest_position, Facing::Spin(decorations::GIFT_SPIN))
        }
        DecorationKind::Ornament { .. } | DecorationKind::Cane => {
            Motion::toward(rest_position, Facing::Keep)
        }
    }
}

fn photo_motion(entity: Entity, index: usize, view: &FrameView) -> Motion {
    match view.mode {
        SceneMode::Tree => {
            let target = photo_tree_position(index, view.photo_slots);
            Motion::toward(target, Facing::Toward(target * 2.0))
        }
        SceneMode::Scatter => {
            let target = photo_ring_position(index, view.photo_slots, view.assembly_yaw);
            let facing = view
                .camera
                .map_or(Facing::Keep, |camera| Facing::Toward(camera.position));
            Motion {
                scale: ScaleRule::CameraDistance,
                ..Motion::toward(target, facing)
            }
        }
        SceneMode::Focus => match view.camera {
            Some(camera) if view.focus_target == Some(entity) => Motion {
                position: Some(camera.ahead(photos::FOCUS_DISTANCE)),
                rate: damping::FOCUS,
                facing: Facing::Exactly(camera.rotation),
                scale: ScaleRule::Fixed(photos::FOCUS_SCALE),
            },
            _ => Motion::hold(),
        },
    }
}

/// Apply one frame of `motion` to `transform` and report the targets used.
pub fn step(transform: &mut Transform, motion: &Motion, camera: Option<&LocalCamera>) -> DecorationTarget {
    if let Some(target) = motion.position {
        transform.translation = transform.translation.lerp(target, motion.rate);
    }

    match motion.facing {
        Facing::Keep => {}
        Facing::Yaw(angle) => transform.rotation = Quat::from_rotation_y(angle),
        Facing::Spin(angle) => transform.rotate_local_y(angle),
        Facing::Toward(point) => {
            let away = transform.translation - point;
            if away.length_squared() > f32::EPSILON {
                transform.rotation = Transform::default().looking_to(away, Vec3::Y).rotation;
            }
        }
        Facing::Exactly(rotation) => transform.rotation = rotation,
    }

    let scale = match motion.scale {
        ScaleRule::Fixed(scale) => scale,
        ScaleRule::CameraDistance => camera.map_or(1.0, |camera| {
            let distance = transform.translation.distance(camera.position).max(f32::EPSILON);
            (photos::SCALE_DISTANCE / distance).clamp(photos::MIN_SCALE, photos::MAX_SCALE)
        }),
    };
    let current = transform.scale.x;
    transform.scale = Vec3::splat(current + (scale - current) * damping::AMBIENT);

    DecorationTarget {
        position: motion.position,
        scale,
    }
}
