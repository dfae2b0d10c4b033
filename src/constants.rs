//! Centralized constants for the tree scene
//!
//! Layout dimensions, damping rates and animation speeds shared across the
//! crate. Rates are per frame, not per second: motion speed follows the
//! display refresh rate.

use bevy::prelude::*;

/// Exponential smoothing fractions applied once per frame
pub mod damping {
    /// Ambient convergence for foliage, decorations and scale
    pub const AMBIENT: f32 = 0.05;
    /// Faster approach for the focused photo
    pub const FOCUS: f32 = 0.1;
    /// Assembly rotation toward the gesture target
    pub const ROTATION: f32 = 0.05;
    /// Orbit camera smoothing
    pub const CAMERA: f32 = 0.05;
}

/// Foliage layout
pub mod foliage {
    /// Default instance count
    pub const COUNT: usize = 5000;
    /// Tree spans `[-HALF_HEIGHT, HALF_HEIGHT]`
    pub const HALF_HEIGHT: f32 = 16.0;
    /// Cone radius at the base
    pub const BASE_RADIUS: f32 = 14.0;
    /// Fraction of the cone radius an instance may sit at
    pub const MIN_RADIUS_FRACTION: f32 = 0.4;
    /// Angular sweep across the whole instance range (radians)
    pub const ANGLE_SWEEP: f32 = 150.0;
    /// Tilt of each needle in the assembled tree
    pub const TREE_PITCH: f32 = -0.5;
    pub const SCATTER_MIN_RADIUS: f32 = 20.0;
    pub const SCATTER_RADIUS_SPREAD: f32 = 15.0;
    pub const MIN_SCALE: f32 = 0.5;
    pub const SCALE_SPREAD: f32 = 0.8;
    /// Amplitude of the idle sway in the assembled tree
    pub const SWAY: f32 = 0.05;
    /// Tumble per frame while scattered
    pub const SPIN_STEP: f32 = 0.01;
    /// Needle size
    pub const NEEDLE_RADIUS: f32 = 0.4;
}

/// Decoration placement and motion
pub mod decorations {
    use super::*;

    pub const ORNAMENT_COUNT: usize = 120;
    pub const STAR_POSITION: Vec3 = Vec3::new(0.0, 16.5, 0.0);
    pub const STAR_SIZE: f32 = 1.5;
    pub const STAR_SPIN_RATE: f32 = 0.5;
    pub const ORNAMENT_RADIUS: f32 = 0.35;
    pub const ORNAMENT_TOP: f32 = 15.0;
    pub const ORNAMENT_SPAN: f32 = 30.0;
    pub const ORNAMENT_TURNS: f32 = 20.0;
    /// Ornament spiral radius is `(16 - h) / 32 * ORNAMENT_SPREAD + ORNAMENT_PAD`
    pub const ORNAMENT_SPREAD: f32 = 15.0;
    pub const ORNAMENT_PAD: f32 = 0.5;
    pub const GIFT_SIZE: f32 = 1.5;
    pub const GIFT_POSITIONS: [Vec3; 3] = [
        Vec3::new(4.0, -8.0, 5.0),
        Vec3::new(-5.0, -5.0, 4.0),
        Vec3::new(0.0, -10.0, -6.0),
    ];
    pub const CANE_POSITIONS: [Vec3; 2] = [Vec3::new(-3.0, 2.0, 5.0), Vec3::new(3.0, 5.0, -3.0)];
    pub const CANE_RADIUS: f32 = 0.15;
    /// Rest positions are pushed out by this factor when scattered
    pub const SCATTER_SPREAD: f32 = 2.0;
    pub const SCATTER_SPIN: f32 = 0.02;
    pub const GIFT_SPIN: f32 = 0.01;
}

/// Photo card placement
pub mod photos {
    /// Angular spacing never divides by fewer slots than this
    pub const MIN_SLOTS: usize = 12;
    pub const WIDTH: f32 = 3.0;
    pub const DEFAULT_ASPECT: f32 = 1.5;
    pub const FRAME_MARGIN_X: f32 = 0.4;
    pub const FRAME_MARGIN_Y: f32 = 1.2;
    pub const FRAME_DEPTH: f32 = 0.05;
    pub const PICTURE_OFFSET_Y: f32 = 0.3;
    pub const PICTURE_OFFSET_Z: f32 = 0.04;
    /// Tree spiral: base height, height span, extra radius and turns (in half-turns)
    pub const SPIRAL_BOTTOM: f32 = -15.0;
    pub const SPIRAL_SPAN: f32 = 28.0;
    pub const SPIRAL_RADIUS_PAD: f32 = 4.0;
    pub const SPIRAL_HALF_TURNS: f32 = 7.0;
    /// Scattered ring
    pub const RING_RADIUS: f32 = 25.0;
    pub const RING_WAVE_HEIGHT: f32 = 8.0;
    pub const RING_WAVE_FREQUENCY: f32 = 3.0;
    /// Scale is `SCALE_DISTANCE / distance` clamped to `[MIN_SCALE, MAX_SCALE]`
    pub const SCALE_DISTANCE: f32 = 40.0;
    pub const MIN_SCALE: f32 = 0.6;
    pub const MAX_SCALE: f32 = 1.8;
    /// Focused photo sits this far in front of the camera
    pub const FOCUS_DISTANCE: f32 = 8.0;
    pub const FOCUS_SCALE: f32 = 1.2;
}

/// Snowfall
pub mod snow {
    pub const COUNT: usize = 1500;
    /// Horizontal extent of the snow box
    pub const SPREAD: f32 = 100.0;
    /// Flakes below this height recycle
    pub const FLOOR: f32 = -20.0;
    /// Recycled flakes restart here
    pub const CEILING: f32 = 40.0;
    pub const FALL_STEP: f32 = 0.1;
    pub const SPIN_RATE: f32 = 0.05;
    pub const FLAKE_SIZE: f32 = 0.3;
}

/// Light rig, intensities in lumens
pub mod lights {
    use super::*;

    pub const TOP_POSITION: Vec3 = Vec3::new(0.0, 50.0, 0.0);
    pub const TOP_INTENSITY: f32 = 2_000_000.0;
    pub const TOP_ANGLE: f32 = 0.3;
    pub const KEY_POSITION: Vec3 = Vec3::new(30.0, 20.0, 30.0);
    pub const KEY_INTENSITY: f32 = 1_000_000.0;
    pub const KEY_ANGLE: f32 = 0.6;
    pub const RIM_POSITION: Vec3 = Vec3::new(-30.0, 10.0, -30.0);
    pub const RIM_INTENSITY: f32 = 800_000.0;
    pub const FILL_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);
    pub const FILL_INTENSITY: f32 = 50_000.0;
    pub const FILL_RANGE: f32 = 20.0;
    pub const STAR_INTENSITY: f32 = 50_000.0;
    pub const STAR_RANGE: f32 = 10.0;
    pub const AMBIENT_BRIGHTNESS: f32 = 300.0;
    pub const FOG_DENSITY: f32 = 0.012;
}

/// Whole-assembly motion
pub mod assembly {
    /// Constant yaw added every frame outside focus
    pub const AUTO_SPIN: f32 = 0.003;
}

/// Orbit camera defaults
pub mod camera {
    use super::*;

    pub const START_POSITION: Vec3 = Vec3::new(0.0, 5.0, 50.0);
    pub const MIN_DISTANCE: f32 = 5.0;
    pub const MAX_DISTANCE: f32 = 80.0;
    pub const FOV_DEGREES: f32 = 45.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 200.0;
    /// Zoom factor per scroll unit
    pub const ZOOM_STEP: f32 = 0.1;
}

/// Scene colors that do not change with the theme
pub mod colors {
    use super::*;

    pub const BACKGROUND: Color = Color::srgb(0.02, 0.02, 0.02);
    pub const STAR: Color = Color::srgb(1.0, 1.0, 0.933);
    pub const TOP_LIGHT: Color = Color::srgb(1.0, 0.98, 0.93);
    pub const RIM_LIGHT: Color = Color::srgb(0.267, 0.333, 1.0);
    pub const PHOTO_FRAME: Color = Color::WHITE;
    pub const BACKDROP: Color = Color::srgba(0.067, 0.067, 0.067, 0.4);
    pub const SNOW: Color = Color::WHITE;
    pub const FOG: Color = Color::srgb(0.02, 0.02, 0.02);
}
