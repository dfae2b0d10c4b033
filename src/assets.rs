use bevy::prelude::*;

use crate::constants::{colors, decorations, foliage, snow};
use crate::meshes;
use crate::textures;
use crate::theme::{ActiveTheme, ThemeColors};

/// Shared mesh, material and texture handles for everything the scene spawns.
/// Dropping this resource releases them.
#[derive(Resource, Clone)]
pub struct TreeAssets {
    pub needle_mesh: Handle<Mesh>,
    pub foliage_material: Handle<StandardMaterial>,
    pub star_mesh: Handle<Mesh>,
    pub star_material: Handle<StandardMaterial>,
    pub ornament_mesh: Handle<Mesh>,
    /// Ornament colors A and B, indexed by an ornament's palette
    pub ornament_materials: [Handle<StandardMaterial>; 2],
    pub gift_mesh: Handle<Mesh>,
    pub gift_material: Handle<StandardMaterial>,
    pub cane_mesh: Handle<Mesh>,
    pub cane_material: Handle<StandardMaterial>,
    pub photo_frame_material: Handle<StandardMaterial>,
    pub default_photo: Handle<Image>,
    pub flake_mesh: Handle<Mesh>,
    pub flake_material: Handle<StandardMaterial>,
    pub backdrop_mesh: Handle<Mesh>,
    pub backdrop_material: Handle<StandardMaterial>,
}

impl TreeAssets {
    pub fn new(
        theme: &ThemeColors,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) -> Self {
        // Regular tetrahedron inscribed in a sphere of NEEDLE_RADIUS.
        let s = foliage::NEEDLE_RADIUS / 3.0_f32.sqrt();
        let needle = Tetrahedron::new(
            Vec3::new(s, s, s),
            Vec3::new(-s, s, -s),
            Vec3::new(-s, -s, s),
            Vec3::new(s, -s, -s),
        );

        let ornament_material = |color: Color| StandardMaterial {
            base_color: color,
            metallic: 1.0,
            perceptual_roughness: 0.1,
            ..default()
        };

        Self {
            needle_mesh: meshes.add(needle),
            foliage_material: materials.add(StandardMaterial {
                base_color: theme.foliage,
                perceptual_roughness: 0.4,
                metallic: 0.1,
                clearcoat: 0.5,
                ..default()
            }),
            star_mesh: meshes.add(meshes::octahedron(decorations::STAR_SIZE)),
            star_material: materials.add(StandardMaterial {
                base_color: colors::STAR,
                emissive: LinearRgba::from(colors::STAR) * 4.0,
                unlit: true,
                ..default()
            }),
            ornament_mesh: meshes.add(Sphere::new(decorations::ORNAMENT_RADIUS).mesh().uv(32, 32)),
            ornament_materials: [
                materials.add(ornament_material(theme.ornament_a)),
                materials.add(ornament_material(theme.ornament_b)),
            ],
            gift_mesh: meshes.add(Cuboid::from_length(decorations::GIFT_SIZE)),
            gift_material: materials.add(StandardMaterial {
                base_color_texture: Some(images.add(textures::gift_wrap())),
                ..default()
            }),
            cane_mesh: meshes.add(meshes::candy_cane(20, decorations::CANE_RADIUS, 8)),
            cane_material: materials.add(StandardMaterial {
                base_color_texture: Some(images.add(textures::candy_cane())),
                ..default()
            }),
            photo_frame_material: materials.add(StandardMaterial {
                base_color: colors::PHOTO_FRAME,
                perceptual_roughness: 0.4,
                ..default()
            }),
            default_photo: images.add(textures::photo_card()),
            flake_mesh: meshes.add(Rectangle::from_length(snow::FLAKE_SIZE)),
            flake_material: materials.add(StandardMaterial {
                base_color: colors::SNOW,
                base_color_texture: Some(images.add(textures::snowflake())),
                alpha_mode: AlphaMode::Add,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
            backdrop_mesh: meshes.add(Rectangle::new(35.0, 25.0)),
            backdrop_material: materials.add(StandardMaterial {
                base_color: colors::BACKDROP,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
        }
    }

    /// Recolor foliage and ornaments in place.
    pub fn apply_theme(&self, theme: &ThemeColors, materials: &mut Assets<StandardMaterial>) {
        let recolor = [
            (&self.foliage_material, theme.foliage),
            (&self.ornament_materials[0], theme.ornament_a),
            (&self.ornament_materials[1], theme.ornament_b),
        ];
        for (handle, color) in recolor {
            if let Some(mut material) = materials.get_mut(handle) {
                material.base_color = color;
            }
        }
    }

    pub fn ornament_material(&self, palette: usize) -> Handle<StandardMaterial> {
        self.ornament_materials[palette % 2].clone()
    }
}

/// Build [`TreeAssets`] for the active theme.
pub fn create_tree_assets(
    mut commands: Commands,
    theme: Res<ActiveTheme>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    let assets = TreeAssets::new(&theme.0.colors(), &mut meshes, &mut materials, &mut images);
    commands.insert_resource(assets);
}
