use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use avian3d::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;

use super::{Decoration, DecorationKind, DecorationPart, PhotoRegistry};
use crate::assembly::TreeAssembly;
use crate::assets::TreeAssets;
use crate::constants::{decorations, foliage, lights, photos};
use crate::textures;

/// Where a new photo's picture comes from.
#[derive(Debug, Clone)]
pub enum PhotoSource {
    Image(Handle<Image>),
    /// Decoded on arrival; unreadable files are logged and skipped
    File(PathBuf),
}

/// Add a photo card to the tree.
#[derive(Message, Debug, Clone)]
pub struct AddPhoto(pub PhotoSource);

impl AddPhoto {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self(PhotoSource::File(path.into()))
    }
}

/// Decode an image file into a texture.
pub fn load_photo(path: &Path) -> Result<Image, image::ImageError> {
    let decoded = image::open(path)?;
    Ok(Image::from_dynamic(decoded, true, RenderAssetUsages::default()))
}

/// Position of ornament `index` of `count` on its spiral.
pub fn ornament_position(index: usize, count: usize) -> Vec3 {
    let t = index as f32 / count.max(1) as f32;
    let h = decorations::ORNAMENT_TOP - t * decorations::ORNAMENT_SPAN;
    let r = (foliage::HALF_HEIGHT - h) / (2.0 * foliage::HALF_HEIGHT) * decorations::ORNAMENT_SPREAD
        + decorations::ORNAMENT_PAD;
    let angle = t * decorations::ORNAMENT_TURNS;
    Vec3::new(angle.cos() * r, h, angle.sin() * r)
}

/// Star, ornaments, gifts and canes under `assembly`.
pub fn spawn_fixed_decorations(
    commands: &mut Commands,
    assembly: Entity,
    assets: &TreeAssets,
    ornament_count: usize,
    rng: &mut fastrand::Rng,
) {
    commands
        .spawn((
            Name::new("Star"),
            Decoration {
                kind: DecorationKind::Star,
                rest_position: decorations::STAR_POSITION,
            },
            Mesh3d(assets.star_mesh.clone()),
            MeshMaterial3d(assets.star_material.clone()),
            Transform::from_translation(decorations::STAR_POSITION),
            ChildOf(assembly),
        ))
        .with_child(PointLight {
            color: crate::constants::colors::STAR,
            intensity: lights::STAR_INTENSITY,
            range: lights::STAR_RANGE,
            ..default()
        });

    for i in 0..ornament_count {
        let position = ornament_position(i, ornament_count);
        let palette = i % 2;
        commands.spawn((
            Name::new(format!("Ornament {i}")),
            Decoration {
                kind: DecorationKind::Ornament { palette },
                rest_position: position,
            },
            Mesh3d(assets.ornament_mesh.clone()),
            MeshMaterial3d(assets.ornament_material(palette)),
            Transform::from_translation(position),
            ChildOf(assembly),
        ));
    }

    for (i, position) in decorations::GIFT_POSITIONS.into_iter().enumerate() {
        let rotation = Quat::from_euler(EulerRot::XYZ, rng.f32(), rng.f32(), rng.f32());
        commands.spawn((
            Name::new(format!("Gift {i}")),
            Decoration {
                kind: DecorationKind::Gift,
                rest_position: position,
            },
            Mesh3d(assets.gift_mesh.clone()),
            MeshMaterial3d(assets.gift_material.clone()),
            Transform::from_translation(position).with_rotation(rotation),
            ChildOf(assembly),
        ));
    }

    for (i, position) in decorations::CANE_POSITIONS.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Candy Cane {i}")),
            Decoration {
                kind: DecorationKind::Cane,
                rest_position: position,
            },
            Mesh3d(assets.cane_mesh.clone()),
            MeshMaterial3d(assets.cane_material.clone()),
            Transform::from_translation(position).with_rotation(Quat::from_rotation_z(PI)),
            ChildOf(assembly),
        ));
    }
}

/// Spawn a framed photo card as a child of `assembly`.
///
/// The frame and the picture both carry a [`DecorationPart`] pointing back at
/// the card, plus a collider so the pointer ray can find them.
pub fn spawn_photo(
    commands: &mut Commands,
    assembly: Entity,
    index: usize,
    picture: Handle<Image>,
    aspect: f32,
    frame_material: Handle<StandardMaterial>,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let width = photos::WIDTH;
    let height = width / aspect;
    let frame_size = Vec3::new(
        width + photos::FRAME_MARGIN_X,
        height + photos::FRAME_MARGIN_Y,
        photos::FRAME_DEPTH,
    );

    let photo = commands
        .spawn((
            Name::new(format!("Photo {index}")),
            Decoration {
                kind: DecorationKind::Photo { index },
                rest_position: Vec3::ZERO,
            },
            Transform::default(),
            Visibility::default(),
            RigidBody::Kinematic,
            ChildOf(assembly),
        ))
        .id();

    commands.spawn((
        Name::new("Photo Frame"),
        DecorationPart(photo),
        Mesh3d(meshes.add(Cuboid::from_size(frame_size))),
        MeshMaterial3d(frame_material),
        Transform::default(),
        Collider::cuboid(frame_size.x, frame_size.y, frame_size.z),
        ChildOf(photo),
    ));

    commands.spawn((
        Name::new("Photo Picture"),
        DecorationPart(photo),
        Mesh3d(meshes.add(Rectangle::new(width, height))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(picture),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, photos::PICTURE_OFFSET_Y, photos::PICTURE_OFFSET_Z),
        Collider::cuboid(width, height, photos::FRAME_DEPTH),
        ChildOf(photo),
    ));

    photo
}

/// Turn [`AddPhoto`] requests into photo cards.
pub fn add_photos(
    mut requests: MessageReader<AddPhoto>,
    mut commands: Commands,
    assets: Option<Res<TreeAssets>>,
    assemblies: Query<Entity, With<TreeAssembly>>,
    mut registry: ResMut<PhotoRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    for AddPhoto(source) in requests.read() {
        let (Some(assets), Ok(assembly)) = (&assets, assemblies.single()) else {
            debug!("Photo ignored: scene not assembled");
            continue;
        };

        let picture = match source {
            PhotoSource::Image(handle) => handle.clone(),
            PhotoSource::File(path) => match load_photo(path) {
                Ok(image) => images.add(image),
                Err(e) => {
                    warn!("Could not load photo {:?}: {}", path, e);
                    continue;
                }
            },
        };
        let aspect = images
            .get(&picture)
            .map_or(photos::DEFAULT_ASPECT, |image| {
                textures::aspect_ratio(image, photos::DEFAULT_ASPECT)
            });

        let index = registry.next_index();
        spawn_photo(
            &mut commands,
            assembly,
            index,
            picture,
            aspect,
            assets.photo_frame_material.clone(),
            &mut meshes,
            &mut materials,
        );
        info!("Added photo {} ({} on the tree)", index, registry.count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn ornaments_spiral_down_the_tree() {
        let top = ornament_position(0, 120);
        assert!(top.distance(Vec3::new(0.5 + 15.0 / 32.0, 15.0, 0.0)) < 1e-4);

        let mut last_height = f32::INFINITY;
        for i in 0..120 {
            let p = ornament_position(i, 120);
            assert!(p.y < last_height);
            last_height = p.y;
        }
    }

    #[test]
    fn ornaments_wear_their_palette_material() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut images = Assets::<Image>::default();
        let assets = TreeAssets::new(
            &crate::theme::ThemeKey::Classic.colors(),
            &mut meshes,
            &mut materials,
            &mut images,
        );

        let mut world = World::new();
        let spawn_assets = assets.clone();
        world
            .run_system_once(move |mut commands: Commands| {
                let assembly = commands.spawn(TreeAssembly).id();
                let mut rng = fastrand::Rng::with_seed(7);
                spawn_fixed_decorations(&mut commands, assembly, &spawn_assets, 5, &mut rng);
            })
            .unwrap();

        let mut ornaments = world.query::<(&Decoration, &MeshMaterial3d<StandardMaterial>)>();
        let mut palettes = Vec::new();
        for (decoration, material) in ornaments.iter(&world) {
            if let DecorationKind::Ornament { palette } = decoration.kind {
                assert_eq!(material.0, assets.ornament_materials[palette]);
                palettes.push(palette);
            }
        }
        palettes.sort();
        assert_eq!(palettes, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn unreadable_photo_is_an_error() {
        assert!(load_photo(Path::new("/definitely/not/here.png")).is_err());
    }

    #[test]
    fn photos_wait_for_the_scene() {
        let mut app = App::new();
        app.init_resource::<PhotoRegistry>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<Image>>()
            .add_message::<AddPhoto>()
            .add_systems(Update, add_photos);

        app.world_mut()
            .write_message(AddPhoto(PhotoSource::Image(Handle::default())));
        app.update();
        assert_eq!(app.world().resource::<PhotoRegistry>().count(), 0);
    }
}
