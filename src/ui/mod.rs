mod cursor;
mod style;
mod toolbar;

pub use cursor::*;
pub use style::*;
pub use toolbar::*;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::frame::frame_loop_running;

/// Host shell: toolbar, status bar and the gesture cursor overlay.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhotoPathInput>().add_systems(
            EguiPrimaryContextPass,
            (draw_toolbar, draw_status_bar, draw_gesture_cursor)
                .chain()
                .run_if(frame_loop_running),
        );
    }
}
