use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{camera, decorations, foliage, snow};
use crate::theme::ThemeKey;

/// Scene configuration read from disk at startup
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TreeSettings {
    /// Number of foliage needles (fixed for the session)
    #[serde(default = "default_foliage_count")]
    pub foliage_count: usize,
    /// Number of snowflakes
    #[serde(default = "default_snow_count")]
    pub snow_count: usize,
    /// Number of ornaments spiralling around the tree
    #[serde(default = "default_ornament_count")]
    pub ornament_count: usize,
    /// Theme applied at startup
    #[serde(default)]
    pub theme: ThemeKey,
    /// Landmark recording to drive gestures without a live detector
    #[serde(default)]
    pub gesture_replay: Option<PathBuf>,
    /// Camera mouse sensitivity (radians per pixel)
    #[serde(default = "default_orbit_sensitivity")]
    pub orbit_sensitivity: f32,
    /// Farthest the orbit camera may zoom out
    #[serde(default = "default_max_camera_distance")]
    pub max_camera_distance: f32,
}

fn default_foliage_count() -> usize {
    foliage::COUNT
}

fn default_snow_count() -> usize {
    snow::COUNT
}

fn default_ornament_count() -> usize {
    decorations::ORNAMENT_COUNT
}

fn default_orbit_sensitivity() -> f32 {
    0.005
}

fn default_max_camera_distance() -> f32 {
    camera::MAX_DISTANCE
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            foliage_count: default_foliage_count(),
            snow_count: default_snow_count(),
            ornament_count: default_ornament_count(),
            theme: ThemeKey::default(),
            gesture_replay: None,
            orbit_sensitivity: default_orbit_sensitivity(),
            max_camera_distance: default_max_camera_distance(),
        }
    }
}

impl TreeSettings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_holiday_tree");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_ron(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_ron(content: &str) -> Self {
        match ron::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed tree settings: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_constants() {
        let settings = TreeSettings::default();
        assert_eq!(settings.foliage_count, 5000);
        assert_eq!(settings.snow_count, 1500);
        assert_eq!(settings.ornament_count, 120);
        assert_eq!(settings.theme, ThemeKey::Classic);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings = TreeSettings::from_ron("(foliage_count: 200, theme: frozen)");
        assert_eq!(settings.foliage_count, 200);
        assert_eq!(settings.theme, ThemeKey::Frozen);
        assert_eq!(settings.snow_count, 1500);
        assert!(settings.gesture_replay.is_none());
    }

    #[test]
    fn malformed_input_falls_back() {
        assert_eq!(TreeSettings::from_ron("{{{"), TreeSettings::default());
    }

    #[test]
    fn pretty_output_reads_back() {
        let settings = TreeSettings {
            gesture_replay: Some(PathBuf::from("hands.ron")),
            theme: ThemeKey::Midnight,
            ..default()
        };
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(TreeSettings::from_ron(&text), settings);
    }
}
