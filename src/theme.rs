use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::TreeAssets;
use crate::frame::FrameSet;

/// Named color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Classic,
    Frozen,
    Midnight,
}

/// Colors a theme swaps in together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub foliage: Color,
    pub ornament_a: Color,
    pub ornament_b: Color,
    pub light: Color,
}

const fn hex(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 3] = [ThemeKey::Classic, ThemeKey::Frozen, ThemeKey::Midnight];

    pub fn key(&self) -> &'static str {
        match self {
            ThemeKey::Classic => "classic",
            ThemeKey::Frozen => "frozen",
            ThemeKey::Midnight => "midnight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeKey::Classic => "Classic",
            ThemeKey::Frozen => "Frozen",
            ThemeKey::Midnight => "Midnight",
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            ThemeKey::Classic => ThemeColors {
                foliage: hex(0x0f3315),
                ornament_a: hex(0xffd700),
                ornament_b: hex(0xcc0000),
                light: hex(0xffaa33),
            },
            ThemeKey::Frozen => ThemeColors {
                foliage: hex(0xaaddff),
                ornament_a: hex(0xc0c0c0),
                ornament_b: hex(0x00ffff),
                light: hex(0x88ccff),
            },
            ThemeKey::Midnight => ThemeColors {
                foliage: hex(0x050505),
                ornament_a: hex(0xd4af37),
                ornament_b: hex(0x333333),
                light: hex(0xffd700),
            },
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeKey {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeKey::ALL
            .into_iter()
            .find(|theme| theme.key() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Theme currently applied to the scene.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTheme(pub ThemeKey);

/// Request a theme switch by key. Unknown keys leave the current theme alone.
#[derive(Message, Debug, Clone)]
pub struct SetTheme {
    pub key: String,
}

impl SetTheme {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Lights whose color follows the theme.
#[derive(Component)]
pub struct ThemedLight;

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SetTheme>()
            .add_systems(Update, apply_theme_requests.in_set(FrameSet::Input));
    }
}

fn apply_theme_requests(
    mut requests: MessageReader<SetTheme>,
    mut active: ResMut<ActiveTheme>,
    assets: Option<Res<TreeAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut point_lights: Query<&mut PointLight, With<ThemedLight>>,
    mut spot_lights: Query<&mut SpotLight, With<ThemedLight>>,
) {
    for request in requests.read() {
        let theme = match request.key.parse::<ThemeKey>() {
            Ok(theme) => theme,
            Err(e) => {
                warn!("Theme switch ignored: {}", e);
                continue;
            }
        };
        if active.0 == theme {
            continue;
        }

        let colors = theme.colors();
        if let Some(assets) = &assets {
            assets.apply_theme(&colors, &mut materials);
        }
        for mut light in &mut point_lights {
            light.color = colors.light;
        }
        for mut light in &mut spot_lights {
            light.color = colors.light;
        }

        active.0 = theme;
        info!("Theme switched to {}", theme.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_parse() {
        for theme in ThemeKey::ALL {
            assert_eq!(theme.key().parse::<ThemeKey>(), Ok(theme));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "aurora".parse::<ThemeKey>(),
            Err(UnknownTheme("aurora".to_string()))
        );
        assert!("Classic".parse::<ThemeKey>().is_err());
    }

    #[test]
    fn classic_palette() {
        let colors = ThemeKey::Classic.colors();
        assert_eq!(colors.ornament_a, Color::srgb_u8(0xff, 0xd7, 0x00));
        assert_eq!(colors.light, Color::srgb_u8(0xff, 0xaa, 0x33));
    }

    #[test]
    fn unknown_theme_request_keeps_current() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(bevy_hand_gesture::HandGesturePlugin)
            .add_plugins(crate::frame::FrameLoopPlugin)
            .add_plugins(ThemePlugin)
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(ActiveTheme(ThemeKey::Classic));
        let light = app
            .world_mut()
            .spawn((PointLight::default(), ThemedLight))
            .id();

        app.world_mut().write_message(SetTheme::new("aurora"));
        app.update();
        assert_eq!(app.world().resource::<ActiveTheme>().0, ThemeKey::Classic);
        let color = app.world().get::<PointLight>(light).unwrap().color;
        assert_eq!(color, PointLight::default().color);
    }

    #[test]
    fn known_theme_recolors_materials_and_lights() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut images = Assets::<Image>::default();
        let assets = TreeAssets::new(
            &ThemeKey::Classic.colors(),
            &mut meshes,
            &mut materials,
            &mut images,
        );

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(bevy_hand_gesture::HandGesturePlugin)
            .add_plugins(crate::frame::FrameLoopPlugin)
            .add_plugins(ThemePlugin)
            .insert_resource(materials)
            .insert_resource(assets.clone())
            .insert_resource(ActiveTheme(ThemeKey::Classic));
        let key_light = app
            .world_mut()
            .spawn((SpotLight::default(), ThemedLight))
            .id();
        let fill_light = app
            .world_mut()
            .spawn((PointLight::default(), ThemedLight))
            .id();
        let star_light = app.world_mut().spawn(PointLight::default()).id();

        app.world_mut().write_message(SetTheme::new("frozen"));
        app.update();

        let frozen = ThemeKey::Frozen.colors();
        assert_eq!(app.world().resource::<ActiveTheme>().0, ThemeKey::Frozen);

        let materials = app.world().resource::<Assets<StandardMaterial>>();
        let color_of = |handle: &Handle<StandardMaterial>| materials.get(handle).map(|m| m.base_color);
        assert_eq!(color_of(&assets.foliage_material), Some(frozen.foliage));
        assert_eq!(color_of(&assets.ornament_materials[0]), Some(frozen.ornament_a));
        assert_eq!(color_of(&assets.ornament_materials[1]), Some(frozen.ornament_b));

        let world = app.world();
        assert_eq!(world.get::<SpotLight>(key_light).unwrap().color, frozen.light);
        assert_eq!(world.get::<PointLight>(fill_light).unwrap().color, frozen.light);
        assert_eq!(
            world.get::<PointLight>(star_light).unwrap().color,
            PointLight::default().color
        );
    }
}
