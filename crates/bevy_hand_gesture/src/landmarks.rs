//! Geometric interpretation of a single hand's landmarks.
//!
//! Landmarks arrive in normalized camera space: `x` and `y` in `[0, 1]` with
//! the origin at the top-left of the (unmirrored) camera image. Everything in
//! here is pure math so it can be exercised without an `App`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of keypoints reported per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices used by the interpreter.
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    /// Middle finger knuckle, used as the palm center.
    pub const PALM: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    /// Fingertips averaged for the openness measure.
    pub const OPENNESS_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// Thumb/index tip distance below which the hand counts as pinching.
pub const PINCH_THRESHOLD: f32 = 0.05;
/// Openness strictly below this reads as a closed fist.
pub const FIST_THRESHOLD: f32 = 0.2;
/// Openness strictly above this reads as an open hand.
pub const OPEN_THRESHOLD: f32 = 0.4;

/// Horizontal palm offset to yaw gain.
const PALM_YAW_GAIN: f32 = 3.0;
/// Vertical palm offset to pitch gain.
const PALM_PITCH_GAIN: f32 = 1.0;

/// A single tracked keypoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance; depth is too noisy to be useful for gestures.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The 21 keypoints of one detected hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks(pub [Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn get(&self, index: usize) -> Landmark {
        self.0[index]
    }

    /// Index fingertip mirrored horizontally so the cursor follows the hand
    /// the way a selfie view does. `(0, 0)` is the top-left of the viewport.
    pub fn cursor(&self) -> Vec2 {
        let tip = self.get(index::INDEX_TIP);
        Vec2::new(1.0 - tip.x, tip.y)
    }

    /// Rotation target derived from the palm position: `x` is pitch, `y` is yaw.
    pub fn palm_rotation(&self) -> Vec2 {
        let palm = self.get(index::PALM);
        Vec2::new(
            (palm.y - 0.5) * PALM_PITCH_GAIN,
            (0.5 - palm.x) * PALM_YAW_GAIN,
        )
    }

    pub fn pinch_distance(&self) -> f32 {
        self.get(index::THUMB_TIP)
            .planar_distance(&self.get(index::INDEX_TIP))
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_distance() < PINCH_THRESHOLD
    }

    /// Average fingertip-to-wrist distance.
    pub fn openness(&self) -> f32 {
        let wrist = self.get(index::WRIST);
        let total: f32 = index::OPENNESS_TIPS
            .iter()
            .map(|&i| self.get(i).planar_distance(&wrist))
            .sum();
        total / index::OPENNESS_TIPS.len() as f32
    }

    /// Collapse a landmark set into what the scene cares about.
    pub fn read(&self) -> GestureReading {
        let pinching = self.is_pinching();
        GestureReading {
            cursor: self.cursor(),
            palm_rotation: self.palm_rotation(),
            pinching,
            openness: (!pinching).then(|| self.openness()),
        }
    }
}

/// Coarse hand shape used to switch between assembled and scattered layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandShape {
    Fist,
    Open,
}

impl HandShape {
    /// Classify an openness measure. Values inside
    /// `[FIST_THRESHOLD, OPEN_THRESHOLD]` are deliberately ambiguous so the
    /// layout does not flicker while the hand is half open.
    pub fn classify(openness: f32) -> Option<Self> {
        if openness < FIST_THRESHOLD {
            Some(Self::Fist)
        } else if openness > OPEN_THRESHOLD {
            Some(Self::Open)
        } else {
            None
        }
    }
}

/// Interpreted view of one hand frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureReading {
    /// Mirrored fingertip position, normalized to the viewport.
    pub cursor: Vec2,
    /// Target assembly rotation (`x` pitch, `y` yaw). Unsmoothed.
    pub palm_rotation: Vec2,
    pub pinching: bool,
    /// Only measured while not pinching.
    pub openness: Option<f32>,
}

impl GestureReading {
    /// Cursor in normalized device coordinates (`[-1, 1]`, y up).
    pub fn pointer_ndc(&self) -> Vec2 {
        Vec2::new(self.cursor.x * 2.0 - 1.0, -(self.cursor.y * 2.0) + 1.0)
    }

    pub fn hand_shape(&self) -> Option<HandShape> {
        self.openness.and_then(HandShape::classify)
    }
}
