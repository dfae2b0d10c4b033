//! # Bevy Holiday Tree
//!
//! An interactive 3D holiday tree: thousands of foliage needles, ornaments,
//! gifts, candy canes and photo cards that flow between an assembled tree,
//! a scattered cloud and a single focused photo. The layout is driven from
//! an egui control panel, the mouse, or tracked hand landmarks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_holiday_tree::HolidayTreePlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(HolidayTreePlugin::default())
//!         .run();
//! }
//! ```
//!
//! ## Per-frame hooks
//!
//! Systems added to [`FrameSet::Hook`] run every frame right after the scene
//! clock ticks, before input is applied, and stop with the rest of the scene once
//! [`TeardownRequested`] has been handled:
//!
//! ```ignore
//! app.add_systems(Update, my_hook.in_set(FrameSet::Hook));
//! ```
//!
//! ## Hand input
//!
//! Connect a detector to [`bevy_hand_gesture::LandmarkFeed`] and send it
//! landmark frames, or point `gesture_replay` in the settings file at a RON
//! recording. A fist assembles the tree, an open hand scatters it, and a
//! pinch over a photo focuses that photo.

pub mod assembly;
pub mod assets;
pub mod camera;
pub mod capture;
pub mod constants;
pub mod decorations;
pub mod foliage;
pub mod frame;
pub mod gesture;
pub mod meshes;
pub mod plugin;
pub mod scene;
pub mod settings;
pub mod snow;
pub mod state;
pub mod textures;
pub mod theme;
pub mod ui;

pub use plugin::HolidayTreePlugin;

// Host operations
pub use capture::{CaptureStillFrame, LastStillFrame, StillFrameCaptured};
pub use decorations::{AddPhoto, PhotoSource};
pub use frame::{FrameLoop, FrameSet, TeardownComplete, TeardownRequested};
pub use state::{ModeState, ResetView, SceneMode, SelectHovered, SetSceneMode};
pub use theme::{SetTheme, ThemeKey};

pub use settings::TreeSettings;
