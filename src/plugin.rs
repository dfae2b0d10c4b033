use avian3d::prelude::PhysicsPlugins;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_hand_gesture::HandGesturePlugin;

use crate::assembly::rotate_assembly;
use crate::assets::create_tree_assets;
use crate::camera::{damp_orbit_camera, orbit_camera_input, reset_orbit_camera};
use crate::capture::CapturePlugin;
use crate::constants::colors;
use crate::decorations::{DecorationsPlugin, advance_decorations};
use crate::foliage::{advance_foliage, sync_foliage_transforms};
use crate::frame::{FrameLoopPlugin, FrameSet, TeardownComplete};
use crate::gesture::{GestureCursor, interpret_hand_frames, mouse_hover, start_gesture_replay};
use crate::scene::{assemble_scene, log_window_resize};
use crate::settings::TreeSettings;
use crate::snow::{advance_snow, sync_snow_flakes};
use crate::state::ModeStatePlugin;
use crate::theme::{ActiveTheme, ThemePlugin};
use crate::ui::UiPlugin;

/// Everything needed to show and drive the tree.
pub struct HolidayTreePlugin {
    /// Use these settings instead of reading the settings file
    pub settings: Option<TreeSettings>,
    /// Quit the app once teardown has finished
    pub exit_on_teardown: bool,
}

impl Default for HolidayTreePlugin {
    fn default() -> Self {
        Self {
            settings: None,
            exit_on_teardown: true,
        }
    }
}

impl Plugin for HolidayTreePlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone().unwrap_or_else(TreeSettings::load);
        info!(
            "Tree settings: {} needles, {} snowflakes, theme {}",
            settings.foliage_count, settings.snow_count, settings.theme
        );

        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        app
            // Third-party plugins
            .add_plugins(PhysicsPlugins::default())
            .add_plugins(HandGesturePlugin)
            // Scene core
            .add_plugins(FrameLoopPlugin)
            .add_plugins(ModeStatePlugin)
            .add_plugins(ThemePlugin)
            .add_plugins(DecorationsPlugin)
            .add_plugins(CapturePlugin)
            .add_plugins(UiPlugin)
            .insert_resource(ActiveTheme(settings.theme))
            .insert_resource(settings)
            .insert_resource(ClearColor(colors::BACKGROUND))
            .init_resource::<GestureCursor>()
            .add_systems(
                Startup,
                ((create_tree_assets, assemble_scene).chain(), start_gesture_replay),
            )
            .add_systems(Update, log_window_resize.in_set(FrameSet::Hook))
            .add_systems(
                Update,
                (
                    (mouse_hover, interpret_hand_frames).chain(),
                    orbit_camera_input,
                    reset_orbit_camera,
                )
                    .in_set(FrameSet::Input),
            )
            .add_systems(
                Update,
                (
                    damp_orbit_camera,
                    advance_foliage,
                    advance_decorations,
                    advance_snow,
                    rotate_assembly,
                )
                    .chain()
                    .in_set(FrameSet::Advance),
            )
            .add_systems(
                Update,
                (sync_foliage_transforms, sync_snow_flakes).in_set(FrameSet::Sync),
            );

        if self.exit_on_teardown {
            app.add_systems(Last, exit_after_teardown);
        }
    }
}

fn exit_after_teardown(mut complete: MessageReader<TeardownComplete>, mut exit: MessageWriter<AppExit>) {
    if complete.read().count() > 0 {
        exit.write(AppExit::Success);
    }
}
