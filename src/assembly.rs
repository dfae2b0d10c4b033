use bevy::prelude::*;

use crate::constants::{assembly, damping};
use crate::state::{ModeState, SceneMode};

/// Root of the tree: foliage, decorations and the fill light hang off this
/// entity and turn with it.
#[derive(Component, Default)]
pub struct TreeAssembly;

/// Euler angles of the assembly, kept separately so yaw can grow without
/// wrapping through a quaternion.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AssemblyRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl AssemblyRotation {
    /// Damp toward `target` (`x` pitch, `y` yaw) and add the constant auto-spin.
    pub fn approach(&mut self, target: Vec2) {
        self.yaw += (target.y - self.yaw) * damping::ROTATION + assembly::AUTO_SPIN;
        self.pitch += (target.x - self.pitch) * damping::ROTATION;
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }
}

/// Turn the assembly toward the gesture rotation target. Frozen while a photo
/// is in focus so the focused card stays put.
pub fn rotate_assembly(
    state: Res<ModeState>,
    mut assemblies: Query<(&mut AssemblyRotation, &mut Transform), With<TreeAssembly>>,
) {
    if state.mode == SceneMode::Focus {
        return;
    }
    for (mut rotation, mut transform) in &mut assemblies {
        rotation.approach(state.target_rotation);
        transform.rotation = rotation.to_quat();
    }
}
