//! Decoration registry.
//!
//! Every decoration is an entity under the [`TreeAssembly`] carrying a
//! [`Decoration`]. Its transform each frame is derived from its kind, its
//! rest position, the [`ModeState`] and the clock; see [`layout`] for the
//! rules. Photos are the only decorations added after startup.

pub mod layout;
pub mod spawn;

use bevy::prelude::*;

use crate::assembly::{AssemblyRotation, TreeAssembly};
use crate::camera::TreeCamera;
use crate::frame::{FrameLoop, FrameSet};
use crate::state::ModeState;

pub use layout::{photo_slots, DecorationTarget, FrameView, LocalCamera};
pub use spawn::{AddPhoto, PhotoSource};

/// What a decoration is. Only photos carry an insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Star,
    /// `palette` picks ornament color A (0) or B (1)
    Ornament { palette: usize },
    Gift,
    Cane,
    Photo { index: usize },
}

impl DecorationKind {
    pub fn is_photo(&self) -> bool {
        matches!(self, DecorationKind::Photo { .. })
    }
}

#[derive(Component, Debug, Clone, Copy)]
#[require(DecorationTarget)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub rest_position: Vec3,
}

/// Back-reference from a mesh (and its collider) to the decoration that owns it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationPart(pub Entity);

/// Number of photos added so far. Also the next photo's index.
#[derive(Resource, Debug, Default)]
pub struct PhotoRegistry {
    count: usize,
}

impl PhotoRegistry {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Reserve the next sequential photo index.
    pub fn next_index(&mut self) -> usize {
        let index = self.count;
        self.count += 1;
        index
    }

    pub fn slots(&self) -> usize {
        photo_slots(self.count)
    }
}

pub struct DecorationsPlugin;

impl Plugin for DecorationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhotoRegistry>()
            .add_message::<AddPhoto>()
            .add_systems(Update, spawn::add_photos.in_set(FrameSet::Input));
    }
}

/// Move every decoration one frame toward its target for the current mode.
pub fn advance_decorations(
    frame_loop: Res<FrameLoop>,
    state: Res<ModeState>,
    registry: Res<PhotoRegistry>,
    cameras: Query<&Transform, (With<TreeCamera>, Without<Decoration>)>,
    assemblies: Query<(&Transform, &AssemblyRotation), (With<TreeAssembly>, Without<Decoration>)>,
    mut decorations: Query<(Entity, &Decoration, &mut Transform, &mut DecorationTarget)>,
) {
    let Ok((assembly_transform, assembly_rotation)) = assemblies.single() else {
        return;
    };
    let assembly = GlobalTransform::from(*assembly_transform);
    let camera = cameras
        .single()
        .ok()
        .map(|camera| LocalCamera::relative_to(&GlobalTransform::from(*camera), &assembly));

    let view = FrameView {
        mode: state.mode,
        elapsed: frame_loop.elapsed(),
        focus_target: state.focus_target,
        photo_slots: registry.slots(),
        assembly_yaw: assembly_rotation.yaw,
        camera,
    };

    for (entity, decoration, mut transform, mut target) in &mut decorations {
        let motion = layout::decoration_motion(entity, decoration.kind, decoration.rest_position, &view);
        *target = layout::step(&mut transform, &motion, view.camera.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneMode;

    #[test]
    fn registry_hands_out_sequential_indices() {
        let mut registry = PhotoRegistry::default();
        assert_eq!(registry.slots(), 12);
        for expected in 0..13 {
            assert_eq!(registry.next_index(), expected);
        }
        assert_eq!(registry.count(), 13);
        assert_eq!(registry.slots(), 13);
    }

    fn decoration_app() -> App {
        let mut app = App::new();
        app.init_resource::<FrameLoop>()
            .init_resource::<ModeState>()
            .init_resource::<PhotoRegistry>()
            .add_systems(Update, advance_decorations);
        app.world_mut()
            .spawn((TreeAssembly, AssemblyRotation::default(), Transform::default()));
        app.world_mut().spawn((
            TreeCamera,
            Transform::from_xyz(0.0, 5.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
        ));
        app
    }

    fn spawn_photo(app: &mut App) -> Entity {
        let index = app.world_mut().resource_mut::<PhotoRegistry>().next_index();
        app.world_mut()
            .spawn((
                Decoration {
                    kind: DecorationKind::Photo { index },
                    rest_position: Vec3::ZERO,
                },
                Transform::default(),
            ))
            .id()
    }

    #[test]
    fn focus_scales_only_the_target() {
        let mut app = decoration_app();
        let photos: Vec<Entity> = (0..3).map(|_| spawn_photo(&mut app)).collect();
        let ornament = app
            .world_mut()
            .spawn((
                Decoration {
                    kind: DecorationKind::Ornament { palette: 0 },
                    rest_position: Vec3::new(1.0, 2.0, 3.0),
                },
                Transform::from_xyz(1.0, 2.0, 3.0),
            ))
            .id();

        {
            let mut state = app.world_mut().resource_mut::<ModeState>();
            state.hovered = Some(photos[1]);
            assert!(state.select_hovered());
            assert_eq!(state.mode, SceneMode::Focus);
        }
        app.update();

        let world = app.world();
        assert_eq!(world.get::<DecorationTarget>(photos[1]).unwrap().scale, 1.2);
        for entity in [photos[0], photos[2], ornament] {
            assert_eq!(world.get::<DecorationTarget>(entity).unwrap().scale, 1.0);
        }
        // The focused card moves toward the camera; its neighbours hold still.
        assert!(world.get::<Transform>(photos[1]).unwrap().translation.z > 0.0);
        assert_eq!(world.get::<Transform>(photos[0]).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn tree_mode_spirals_photos() {
        let mut app = decoration_app();
        let photos: Vec<Entity> = (0..13).map(|_| spawn_photo(&mut app)).collect();
        app.update();

        let target = app.world().get::<DecorationTarget>(photos[1]).unwrap();
        assert_eq!(target.position, Some(layout::photo_tree_position(1, 13)));
    }
}
