//! Foliage particle field.
//!
//! A fixed-count set of needles, each with an assembled (cone) and a
//! scattered (sphere) layout. Simulation lives in [`FoliageField`]; the render
//! entities only mirror its transforms when the field is dirty.

use bevy::prelude::*;

use crate::constants::{damping, foliage};
use crate::frame::FrameLoop;
use crate::state::{ModeState, SceneMode};

/// Which layout an instance is converging toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoliageLayout {
    Tree,
    Scatter,
}

impl FoliageLayout {
    pub fn for_mode(mode: SceneMode) -> Self {
        if mode.is_scattered() {
            FoliageLayout::Scatter
        } else {
            FoliageLayout::Tree
        }
    }
}

/// One needle. Rotations are XYZ Euler angles.
#[derive(Debug, Clone, PartialEq)]
pub struct FoliageInstance {
    pub tree_position: Vec3,
    pub tree_rotation: Vec3,
    pub scatter_position: Vec3,
    pub current_position: Vec3,
    pub current_rotation: Vec3,
    /// Rotation shown this frame
    pub display_rotation: Vec3,
    pub scale: f32,
}

impl FoliageInstance {
    pub fn target(&self, layout: FoliageLayout) -> Vec3 {
        match layout {
            FoliageLayout::Tree => self.tree_position,
            FoliageLayout::Scatter => self.scatter_position,
        }
    }

    pub fn transform(&self) -> Transform {
        let r = self.display_rotation;
        Transform::from_translation(self.current_position)
            .with_rotation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z))
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Needle positions along a noisy spiral inside a cone.
pub fn tree_layout(index: usize, count: usize, rng: &mut fastrand::Rng) -> (Vec3, Vec3) {
    let ratio = index as f32 / count as f32;
    let height = foliage::HALF_HEIGHT - ratio * 2.0 * foliage::HALF_HEIGHT;
    let cone_radius =
        (foliage::HALF_HEIGHT - height) / (2.0 * foliage::HALF_HEIGHT) * foliage::BASE_RADIUS;
    let radius = cone_radius
        * (foliage::MIN_RADIUS_FRACTION + rng.f32() * (1.0 - foliage::MIN_RADIUS_FRACTION));
    let angle = ratio * foliage::ANGLE_SWEEP + rng.f32() * std::f32::consts::TAU;

    let position = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
    let rotation = Vec3::new(foliage::TREE_PITCH, -angle, rng.f32());
    (position, rotation)
}

/// Even spherical distribution (Fibonacci-style spiral) at a random radius.
pub fn scatter_layout(index: usize, count: usize, rng: &mut fastrand::Rng) -> Vec3 {
    let n = count as f32;
    let phi = (-1.0 + 2.0 * index as f32 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * std::f32::consts::PI).sqrt() * phi;
    let radius = foliage::SCATTER_MIN_RADIUS + rng.f32() * foliage::SCATTER_RADIUS_SPREAD;

    // Polar angle from +Y, azimuth around Y.
    Vec3::new(
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    )
}

/// Simulation state for every foliage needle.
#[derive(Resource, Debug, Clone)]
pub struct FoliageField {
    instances: Vec<FoliageInstance>,
    layout: FoliageLayout,
    dirty: bool,
}

impl FoliageField {
    /// Lay out `count` needles. The count is fixed for the field's lifetime.
    pub fn new(count: usize, rng: &mut fastrand::Rng) -> Self {
        let instances = (0..count)
            .map(|i| {
                let (tree_position, tree_rotation) = tree_layout(i, count, rng);
                let scatter_position = scatter_layout(i, count, rng);
                FoliageInstance {
                    tree_position,
                    tree_rotation,
                    scatter_position,
                    current_position: tree_position,
                    current_rotation: tree_rotation,
                    display_rotation: tree_rotation,
                    scale: foliage::MIN_SCALE + rng.f32() * foliage::SCALE_SPREAD,
                }
            })
            .collect();

        Self {
            instances,
            layout: FoliageLayout::Tree,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[FoliageInstance] {
        &self.instances
    }

    /// Layout chosen by the most recent [`FoliageField::advance`].
    pub fn layout(&self) -> FoliageLayout {
        self.layout
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand the dirty flag to the caller, clearing it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Step every needle one frame toward the layout for `mode`.
    pub fn advance(&mut self, mode: SceneMode, elapsed: f32) {
        let layout = FoliageLayout::for_mode(mode);
        self.layout = layout;

        for (i, instance) in self.instances.iter_mut().enumerate() {
            let target = instance.target(layout);
            instance.current_position = instance.current_position.lerp(target, damping::AMBIENT);

            if mode == SceneMode::Tree {
                let sway = (elapsed + i as f32).sin() * foliage::SWAY;
                instance.display_rotation = instance.tree_rotation + Vec3::X * sway;
            } else {
                instance.current_rotation += Vec3::new(foliage::SPIN_STEP, foliage::SPIN_STEP, 0.0);
                instance.display_rotation = instance.current_rotation;
            }
        }
        self.dirty = true;
    }
}

/// Links a render entity to its slot in the [`FoliageField`].
#[derive(Component, Debug, Clone, Copy)]
pub struct FoliageNeedle(pub usize);

pub fn advance_foliage(
    frame_loop: Res<FrameLoop>,
    state: Res<ModeState>,
    field: Option<ResMut<FoliageField>>,
) {
    if let Some(mut field) = field {
        field.advance(state.mode, frame_loop.elapsed());
    }
}

pub fn sync_foliage_transforms(
    field: Option<ResMut<FoliageField>>,
    mut needles: Query<(&FoliageNeedle, &mut Transform)>,
) {
    let Some(mut field) = field else {
        return;
    };
    if !field.take_dirty() {
        return;
    }
    for (needle, mut transform) in &mut needles {
        if let Some(instance) = field.instances().get(needle.0) {
            *transform = instance.transform();
        }
    }
}
