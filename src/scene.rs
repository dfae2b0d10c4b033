//! Startup assembly of the tree scene: camera, lights, backdrop, the tree
//! assembly with its foliage and decorations, and the snow.

use std::f32::consts::PI;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::NotShadowCaster;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy::render::view::Hdr;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::assembly::{AssemblyRotation, TreeAssembly};
use crate::assets::TreeAssets;
use crate::camera::{OrbitCamera, TreeCamera};
use crate::constants::{camera, colors, lights, photos};
use crate::decorations::{PhotoRegistry, spawn};
use crate::foliage::{FoliageField, FoliageNeedle};
use crate::frame::TreeOwned;
use crate::settings::TreeSettings;
use crate::snow::{SnowField, SnowFlake, SnowRoot};
use crate::textures;
use crate::theme::{ActiveTheme, ThemedLight};

/// Translucent panels arcing behind the tree: `(x, z, yaw)`.
const BACKDROPS: [(f32, f32, f32); 4] = [
    (-25.0, -20.0, PI / 6.0),
    (-10.0, -30.0, PI / 12.0),
    (10.0, -30.0, -PI / 12.0),
    (25.0, -20.0, -PI / 6.0),
];
const BACKDROP_HEIGHT: f32 = 8.0;

/// Build the whole scene. Without a primary window there is nothing to draw
/// into, so this does nothing.
pub fn assemble_scene(
    mut commands: Commands,
    windows: Query<(), With<PrimaryWindow>>,
    assets: Option<Res<TreeAssets>>,
    settings: Res<TreeSettings>,
    theme: Res<ActiveTheme>,
    mut registry: ResMut<PhotoRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    images: Res<Assets<Image>>,
) {
    if windows.single().is_err() {
        debug!("No primary window, skipping scene assembly");
        return;
    }
    let Some(assets) = assets else {
        return;
    };
    let mut rng = fastrand::Rng::new();
    let light_color = theme.0.colors().light;

    spawn_camera(&mut commands);
    spawn_lights(&mut commands, light_color);
    spawn_backdrops(&mut commands, &assets);

    let assembly = commands
        .spawn((
            Name::new("Tree Assembly"),
            TreeAssembly,
            TreeOwned,
            AssemblyRotation::default(),
            Transform::default(),
            Visibility::default(),
        ))
        .with_child((
            Name::new("Fill Light"),
            ThemedLight,
            PointLight {
                color: light_color,
                intensity: lights::FILL_INTENSITY,
                range: lights::FILL_RANGE,
                ..default()
            },
            Transform::from_translation(lights::FILL_POSITION),
        ))
        .id();

    let foliage = FoliageField::new(settings.foliage_count, &mut rng);
    for (i, instance) in foliage.instances().iter().enumerate() {
        commands.spawn((
            FoliageNeedle(i),
            Mesh3d(assets.needle_mesh.clone()),
            MeshMaterial3d(assets.foliage_material.clone()),
            instance.transform(),
            ChildOf(assembly),
        ));
    }
    commands.insert_resource(foliage);

    spawn::spawn_fixed_decorations(
        &mut commands,
        assembly,
        &assets,
        settings.ornament_count,
        &mut rng,
    );
    let aspect = images
        .get(&assets.default_photo)
        .map_or(photos::DEFAULT_ASPECT, |image| {
            textures::aspect_ratio(image, photos::DEFAULT_ASPECT)
        });
    spawn::spawn_photo(
        &mut commands,
        assembly,
        registry.next_index(),
        assets.default_photo.clone(),
        aspect,
        assets.photo_frame_material.clone(),
        &mut meshes,
        &mut materials,
    );

    let snow = SnowField::new(settings.snow_count, &mut rng);
    let snow_root = commands
        .spawn((
            Name::new("Snow"),
            SnowRoot,
            TreeOwned,
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    for (i, position) in snow.positions().iter().enumerate() {
        commands.spawn((
            SnowFlake(i),
            Mesh3d(assets.flake_mesh.clone()),
            MeshMaterial3d(assets.flake_material.clone()),
            NotShadowCaster,
            Transform::from_translation(*position),
            ChildOf(snow_root),
        ));
    }
    commands.insert_resource(snow);

    info!(
        "Tree assembled: {} needles, {} ornaments, {} snowflakes",
        settings.foliage_count, settings.ornament_count, settings.snow_count
    );
}

fn spawn_camera(commands: &mut Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Name::new("Tree Camera"),
        TreeCamera,
        TreeOwned,
        orbit,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            near: camera::NEAR,
            far: camera::FAR,
            ..default()
        }),
        Hdr,
        Tonemapping::AcesFitted,
        Bloom::NATURAL,
        DistanceFog {
            color: colors::FOG,
            falloff: FogFalloff::Exponential {
                density: lights::FOG_DENSITY,
            },
            ..default()
        },
        AmbientLight {
            color: Color::WHITE,
            brightness: lights::AMBIENT_BRIGHTNESS,
            affects_lightmapped_meshes: true,
        },
        orbit.transform(),
    ));
}

fn spawn_lights(commands: &mut Commands, light_color: Color) {
    commands.spawn((
        Name::new("Top Light"),
        TreeOwned,
        SpotLight {
            color: colors::TOP_LIGHT,
            intensity: lights::TOP_INTENSITY,
            outer_angle: lights::TOP_ANGLE,
            inner_angle: lights::TOP_ANGLE * 0.5,
            shadows_enabled: true,
            range: 100.0,
            ..default()
        },
        Transform::from_translation(lights::TOP_POSITION).looking_at(Vec3::ZERO, Vec3::Z),
    ));
    commands.spawn((
        Name::new("Key Light"),
        TreeOwned,
        ThemedLight,
        SpotLight {
            color: light_color,
            intensity: lights::KEY_INTENSITY,
            outer_angle: lights::KEY_ANGLE,
            shadows_enabled: true,
            range: 100.0,
            ..default()
        },
        Transform::from_translation(lights::KEY_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Name::new("Rim Light"),
        TreeOwned,
        SpotLight {
            color: colors::RIM_LIGHT,
            intensity: lights::RIM_INTENSITY,
            range: 100.0,
            ..default()
        },
        Transform::from_translation(lights::RIM_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_backdrops(commands: &mut Commands, assets: &TreeAssets) {
    for (i, (x, z, yaw)) in BACKDROPS.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Backdrop {i}")),
            TreeOwned,
            NotShadowCaster,
            Mesh3d(assets.backdrop_mesh.clone()),
            MeshMaterial3d(assets.backdrop_material.clone()),
            Transform::from_xyz(x, BACKDROP_HEIGHT, z).with_rotation(Quat::from_rotation_y(yaw)),
        ));
    }
}

/// Bevy keeps the camera aspect in sync with the window; this only reports it.
pub fn log_window_resize(mut resized: MessageReader<WindowResized>) {
    if let Some(last) = resized.read().last() {
        debug!("Viewport resized to {}x{}", last.width, last.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeKey;

    #[test]
    fn no_window_means_no_scene() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<Image>>()
            .init_resource::<PhotoRegistry>()
            .insert_resource(TreeSettings::default())
            .insert_resource(ActiveTheme(ThemeKey::Classic))
            .add_systems(
                Startup,
                (crate::assets::create_tree_assets, assemble_scene).chain(),
            );
        app.update();

        let world = app.world_mut();
        assert!(world.query::<&TreeAssembly>().iter(world).next().is_none());
        assert!(!world.contains_resource::<FoliageField>());
        assert_eq!(world.resource::<PhotoRegistry>().count(), 0);
    }

    #[test]
    fn backdrops_face_the_tree() {
        for (x, z, yaw) in BACKDROPS {
            let normal = Quat::from_rotation_y(yaw) * Vec3::Z;
            let to_tree = Vec3::new(-x, 0.0, -z).normalize();
            assert!(normal.dot(to_tree) > 0.8);
        }
    }
}
