//! Standalone holiday tree window.
//!
//! Optional first argument: a photo to hang on the tree at startup.

use bevy::prelude::*;
use bevy_holiday_tree::{AddPhoto, HolidayTreePlugin};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Holiday Tree".to_string(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(HolidayTreePlugin::default());

    if let Some(path) = std::env::args().nth(1) {
        app.world_mut().write_message(AddPhoto::file(path));
    }

    app.run();
}
